//! Identifier casing rules for generated code.
//!
//! Schema identifiers are snake case. Generated code needs two other forms:
//! the exported form (`contest_id` → `ContestID`) for type and accessor
//! names, and the parameter form (`contest_id` → `contestID`) for external
//! field names. The segment `id` always renders as the acronym `ID`.
//!
//! # Examples
//!
//! ```
//! use dalgen_core::naming::{Case, struct_name, transform};
//!
//! assert_eq!(transform("contest_id", Case::Exported), "ContestID");
//! assert_eq!(transform("contest_id", Case::Parameter), "contestID");
//! assert_eq!(struct_name("contest_problems"), "ContestProblem");
//! ```

use heck::ToSnakeCase;

/// Name of the column that, when present, is the whole primary key.
pub const ID_COLUMN: &str = "id";

/// Suffix marking a column as a candidate foreign key.
pub const FOREIGN_KEY_SUFFIX: &str = "_id";

/// Target casing of [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Every segment title-cased (type and accessor names).
    Exported,
    /// First segment kept as-is, the rest title-cased (parameter names).
    Parameter,
}

/// Converts a snake-case identifier to `case`.
///
/// # Examples
///
/// ```
/// use dalgen_core::naming::{Case, transform};
///
/// assert_eq!(transform("user_name", Case::Exported), "UserName");
/// assert_eq!(transform("user_name", Case::Parameter), "userName");
/// assert_eq!(transform("name", Case::Exported), "Name");
/// assert_eq!(transform("id", Case::Parameter), "ID");
/// ```
pub fn transform(identifier: &str, case: Case) -> String {
    let mut result = String::with_capacity(identifier.len());
    for (index, segment) in identifier.split('_').enumerate() {
        if segment == "id" {
            result.push_str("ID");
        } else if index == 0 && case == Case::Parameter {
            result.push_str(segment);
        } else {
            push_title(&mut result, segment);
        }
    }
    result
}

fn push_title(out: &mut String, segment: &str) {
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

/// Record type name for a table.
///
/// Drops exactly one trailing character, assuming the table name is the
/// naive plural of the entity name. `categories` becomes `Categorie`.
pub fn struct_name(table: &str) -> String {
    let mut singular = table.chars();
    singular.next_back();
    transform(singular.as_str(), Case::Exported)
}

/// Entity name of a foreign-key column (`user_id` → `User`).
pub fn foreign_key_entity(column: &str) -> String {
    let entity = column.strip_suffix(FOREIGN_KEY_SUFFIX).unwrap_or(column);
    transform(entity, Case::Exported)
}

/// Table a `_id`-suffixed column would reference (`user_id` → `users`).
///
/// Returns `None` for columns without the suffix.
pub fn referenced_table(column: &str) -> Option<String> {
    column
        .strip_suffix(FOREIGN_KEY_SUFFIX)
        .map(|entity| format!("{entity}s"))
}

/// Exported name of the get-by-primary-key accessor (`posts` → `GetPost`).
pub fn primary_accessor(table: &str) -> String {
    format!("Get{}", struct_name(table))
}

/// Exported name of a get-by-relation accessor
/// (`user_id` on `posts` → `GetByUserPosts`).
pub fn relation_accessor(column: &str, table: &str) -> String {
    format!(
        "GetBy{}{}s",
        foreign_key_entity(column),
        struct_name(table)
    )
}

/// Snake-case function name for an exported accessor name.
///
/// # Examples
///
/// ```
/// use dalgen_core::naming::{function_name, relation_accessor};
///
/// assert_eq!(function_name(&relation_accessor("user_id", "posts")), "get_by_user_posts");
/// ```
pub fn function_name(accessor: &str) -> String {
    accessor.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_renders_id_segment_as_acronym() {
        assert_eq!(transform("contest_id", Case::Exported), "ContestID");
        assert_eq!(transform("contest_id", Case::Parameter), "contestID");
        assert_eq!(transform("id", Case::Exported), "ID");
        assert_eq!(transform("id_token", Case::Parameter), "IDToken");
        assert_eq!(transform("user_id_hash", Case::Exported), "UserIDHash");
    }

    #[test]
    fn test_transform_keeps_first_parameter_segment() {
        assert_eq!(transform("name", Case::Parameter), "name");
        assert_eq!(transform("display_name", Case::Parameter), "displayName");
        assert_eq!(transform("name", Case::Exported), "Name");
    }

    #[test]
    fn test_transform_tolerates_empty_segments() {
        assert_eq!(transform("a__b", Case::Exported), "AB");
        assert_eq!(transform("", Case::Exported), "");
    }

    #[test]
    fn test_struct_name_strips_single_character() {
        assert_eq!(struct_name("users"), "User");
        assert_eq!(struct_name("test_groups"), "TestGroup");
        assert_eq!(struct_name("categories"), "Categorie");
    }

    #[test]
    fn test_foreign_key_helpers() {
        assert_eq!(foreign_key_entity("user_id"), "User");
        assert_eq!(foreign_key_entity("test_group_id"), "TestGroup");
        assert_eq!(referenced_table("contest_id").as_deref(), Some("contests"));
        assert_eq!(referenced_table("contest"), None);
    }

    #[test]
    fn test_accessor_names() {
        assert_eq!(primary_accessor("posts"), "GetPost");
        assert_eq!(relation_accessor("user_id", "posts"), "GetByUserPosts");
        assert_eq!(function_name("GetPost"), "get_post");
        assert_eq!(
            function_name(&relation_accessor("test_group_id", "tests")),
            "get_by_test_group_tests"
        );
    }
}
