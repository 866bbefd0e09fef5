//! Mapping from schema column types and names to Rust source fragments.

use dalgen_core::{ColumnKind, ColumnType};

/// Keywords that need the `r#` prefix to be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Rust identifier for a column: the column name itself, escaped when it is
/// a keyword.
pub fn rust_ident(column: &str) -> String {
    if KEYWORDS.contains(&column) {
        format!("r#{column}")
    } else {
        column.to_string()
    }
}

fn owned_type(kind: ColumnKind, rt: &str) -> String {
    match kind {
        ColumnKind::Int => "i64".to_string(),
        ColumnKind::Text => "String".to_string(),
        ColumnKind::Bool => "bool".to_string(),
        ColumnKind::Float => "f64".to_string(),
        ColumnKind::Timestamp => format!("{rt}::chrono::DateTime<{rt}::chrono::Utc>"),
        ColumnKind::Blob => "Vec<u8>".to_string(),
    }
}

fn borrowed_type(kind: ColumnKind, rt: &str) -> String {
    match kind {
        ColumnKind::Text => "&str".to_string(),
        ColumnKind::Blob => "&[u8]".to_string(),
        other => owned_type(other, rt),
    }
}

fn optional(ty: String, nullable: bool) -> String {
    if nullable { format!("Option<{ty}>") } else { ty }
}

/// Type of the record field holding a column.
///
/// `rt` is the path of the runtime crate, used for re-exported types.
pub fn field_type(ty: ColumnType, rt: &str) -> String {
    optional(owned_type(ty.kind, rt), ty.nullable)
}

/// Type of an accessor parameter bound to a column.
///
/// Text and blob columns are taken by reference.
pub fn parameter_type(ty: ColumnType, rt: &str) -> String {
    optional(borrowed_type(ty.kind, rt), ty.nullable)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RT: &str = "dalgen_runtime";

    #[test]
    fn test_field_types() {
        assert_eq!(field_type(ColumnType::new(ColumnKind::Int), RT), "i64");
        assert_eq!(
            field_type(ColumnType::nullable(ColumnKind::Text), RT),
            "Option<String>"
        );
        assert_eq!(
            field_type(ColumnType::new(ColumnKind::Timestamp), RT),
            "dalgen_runtime::chrono::DateTime<dalgen_runtime::chrono::Utc>"
        );
        assert_eq!(field_type(ColumnType::new(ColumnKind::Blob), RT), "Vec<u8>");
    }

    #[test]
    fn test_parameter_types_borrow_text_and_blob() {
        assert_eq!(parameter_type(ColumnType::new(ColumnKind::Text), RT), "&str");
        assert_eq!(
            parameter_type(ColumnType::nullable(ColumnKind::Blob), RT),
            "Option<&[u8]>"
        );
        assert_eq!(
            parameter_type(ColumnType::nullable(ColumnKind::Int), RT),
            "Option<i64>"
        );
        assert_eq!(parameter_type(ColumnType::new(ColumnKind::Bool), "rt"), "bool");
    }

    #[test]
    fn test_keywords_become_raw_identifiers() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("gen"), "r#gen");
        assert_eq!(rust_ident("title"), "title");
    }
}
