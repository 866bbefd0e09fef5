//! Source templates for generated modules.
//!
//! Each template is a function from its inputs to unformatted Rust source.
//! Layout does not matter here: the renderer parses and pretty-prints the
//! assembled file.

use dalgen_core::naming::{self, Case};
use dalgen_core::{Columns, Table, WriteStrategy, sorted_names};

use crate::clause::{Receiver, equality_clause, join_arguments, placeholders};
use crate::rust_type::{field_type, parameter_type, rust_ident};

/// Inputs shared by every template of one table.
pub(crate) struct TableContext<'a> {
    pub table: &'a Table,
    /// Path of the runtime crate (`dalgen_runtime`).
    pub rt: &'a str,
    /// Record type name.
    pub record: String,
}

impl<'a> TableContext<'a> {
    pub fn new(table: &'a Table, rt: &'a str) -> Self {
        Self {
            table,
            rt,
            record: table.struct_name(),
        }
    }

    fn storage_error(&self, context: &str) -> String {
        format!("|err| {}::Error::storage({context:?}, err)", self.rt)
    }

    fn params(&self, arguments: &str) -> String {
        format!("{}::rusqlite::params![{arguments}]", self.rt)
    }
}

/// First line of every generated file.
pub(crate) fn header(table: &str) -> String {
    format!("// Generated by dalgen from table {table:?}. DO NOT EDIT.")
}

/// The whole module for one table.
pub(crate) fn file(ctx: &TableContext<'_>) -> String {
    let mut out = record_struct(ctx);
    out.push_str(&from_row_impl(ctx));
    out.push_str(&primary_getter(ctx));
    for column in sorted_names(&ctx.table.foreign_keys) {
        out.push_str(&relation_getter(ctx, column));
    }
    let write = match &ctx.table.write {
        WriteStrategy::Upsert { conflict_keys } => write_upsert(ctx, conflict_keys),
        WriteStrategy::InsertOrUpdate { auto_key } => write_insert_or_update(ctx, auto_key),
    };
    out.push_str(&format!(
        "impl {record} {{\n{write}\n{delete}\n}}\n",
        record = ctx.record,
        delete = delete(ctx),
    ));
    out
}

fn record_struct(ctx: &TableContext<'_>) -> String {
    let rt = ctx.rt;
    let fields: String = sorted_names(&ctx.table.fields)
        .into_iter()
        .map(|column| {
            let ty = ctx.table.fields[column];
            format!(
                "#[serde(rename = {external:?})]\npub {ident}: {ty},\n",
                external = naming::transform(column, Case::Parameter),
                ident = rust_ident(column),
                ty = field_type(ty, rt),
            )
        })
        .collect();

    format!(
        r#"/// A row of the `{table}` table.
#[derive(Debug, Clone, Default, PartialEq, {rt}::serde::Serialize, {rt}::serde::Deserialize)]
#[serde(crate = "{rt}::serde")]
pub struct {record} {{
{fields}}}
"#,
        table = ctx.table.name,
        record = ctx.record,
    )
}

fn from_row_impl(ctx: &TableContext<'_>) -> String {
    let rt = ctx.rt;
    let reads: String = sorted_names(&ctx.table.fields)
        .into_iter()
        .map(|column| format!("{}: row.get({column:?})?,\n", rust_ident(column)))
        .collect();

    format!(
        r#"impl {rt}::FromRow for {record} {{
fn from_row(row: &{rt}::rusqlite::Row<'_>) -> {rt}::rusqlite::Result<Self> {{
Ok(Self {{
{reads}}})
}}
}}
"#,
        record = ctx.record,
    )
}

fn parameters(ctx: &TableContext<'_>, columns: &Columns) -> String {
    sorted_names(columns)
        .into_iter()
        .map(|column| {
            format!(
                ", {}: {}",
                rust_ident(column),
                parameter_type(columns[column], ctx.rt)
            )
        })
        .collect()
}

fn primary_getter(ctx: &TableContext<'_>) -> String {
    let function = naming::function_name(&naming::primary_accessor(&ctx.table.name));
    let keys = &ctx.table.primary_keys;
    let sql = format!(
        "SELECT * FROM {} WHERE {}",
        ctx.table.name,
        equality_clause(keys, " AND ")
    );

    format!(
        r#"/// Fetches the `{table}` row with the given primary key.
pub fn {function}(db: &impl {rt}::DbContext{params}) -> {rt}::Result<{record}> {{
db.get::<{record}>({sql:?}, {args}).map_err({error})
}}
"#,
        table = ctx.table.name,
        rt = ctx.rt,
        record = ctx.record,
        params = parameters(ctx, keys),
        args = ctx.params(&join_arguments(keys, Receiver::Parameter)),
        error = ctx.storage_error(&function),
    )
}

fn relation_getter(ctx: &TableContext<'_>, column: &str) -> String {
    let function =
        naming::function_name(&naming::relation_accessor(column, &ctx.table.name));
    let mut key = Columns::new();
    key.insert(column.to_string(), ctx.table.foreign_keys[column]);
    let sql = format!(
        "SELECT * FROM {} WHERE {} ORDER BY {}",
        ctx.table.name,
        equality_clause(&key, " AND "),
        join_arguments(&ctx.table.primary_keys, Receiver::Raw),
    );

    format!(
        r#"/// Fetches every `{table}` row whose `{column}` matches.
pub fn {function}(db: &impl {rt}::DbContext{params}) -> {rt}::Result<Vec<{record}>> {{
db.select::<{record}>({sql:?}, {args}).map_err({error})
}}
"#,
        table = ctx.table.name,
        rt = ctx.rt,
        record = ctx.record,
        params = parameters(ctx, &key),
        args = ctx.params(&join_arguments(&key, Receiver::Parameter)),
        error = ctx.storage_error(&function),
    )
}

fn write_upsert(ctx: &TableContext<'_>, conflict_keys: &[String]) -> String {
    let fields = &ctx.table.fields;
    let sql = format!(
        "INSERT INTO {table}({columns}) VALUES ({marks}) ON CONFLICT ({keys}) DO UPDATE SET {set}",
        table = ctx.table.name,
        columns = join_arguments(fields, Receiver::Raw),
        marks = placeholders(fields),
        keys = conflict_keys.join(", "),
        set = equality_clause(fields, ", "),
    );
    let values = join_arguments(fields, Receiver::Field("self"));

    format!(
        r#"/// Validates the record, then inserts it or replaces the row with the same key.
pub fn write(&mut self, db: &impl {rt}::DbContext) -> {rt}::Result<()> {{
{rt}::Verify::verify(self)?;
db.exec({sql:?}, {args}).map_err({error})?;
Ok(())
}}
"#,
        rt = ctx.rt,
        args = ctx.params(&format!("{values}, {values}")),
        error = ctx.storage_error(&format!("{}::write", ctx.record)),
    )
}

fn write_insert_or_update(ctx: &TableContext<'_>, auto_key: &str) -> String {
    let fields = &ctx.table.fields;
    let inserted = ctx.table.fields_without(auto_key);
    let insert_sql = if inserted.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", ctx.table.name)
    } else {
        format!(
            "INSERT INTO {}({}) VALUES ({})",
            ctx.table.name,
            join_arguments(&inserted, Receiver::Raw),
            placeholders(&inserted),
        )
    };
    let keys = &ctx.table.primary_keys;
    let update_sql = format!(
        "UPDATE {} SET {} WHERE {}",
        ctx.table.name,
        equality_clause(fields, ", "),
        equality_clause(keys, " AND "),
    );
    let update_args = format!(
        "{}, {}",
        join_arguments(fields, Receiver::Field("self")),
        join_arguments(keys, Receiver::Field("self")),
    );
    let key = rust_ident(auto_key);

    format!(
        r#"/// Validates the record, then inserts it when `{auto_key}` is zero and
/// updates the existing row otherwise. An insert stores the assigned key in
/// `{auto_key}`.
pub fn write(&mut self, db: &impl {rt}::DbContext) -> {rt}::Result<()> {{
{rt}::Verify::verify(self)?;
if self.{key} == 0 {{
let done = db.exec({insert_sql:?}, {insert_args}).map_err({error})?;
self.{key} = done.last_insert_id;
}} else {{
db.exec({update_sql:?}, {update_args}).map_err({error})?;
}}
Ok(())
}}
"#,
        rt = ctx.rt,
        insert_args = ctx.params(&join_arguments(&inserted, Receiver::Field("self"))),
        update_args = ctx.params(&update_args),
        error = ctx.storage_error(&format!("{}::write", ctx.record)),
    )
}

fn delete(ctx: &TableContext<'_>) -> String {
    let keys = &ctx.table.primary_keys;
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        ctx.table.name,
        equality_clause(keys, " AND ")
    );

    format!(
        r#"/// Deletes the row with this record's primary key.
pub fn delete(&self, db: &impl {rt}::DbContext) -> {rt}::Result<()> {{
db.exec({sql:?}, {args}).map_err({error})?;
Ok(())
}}
"#,
        rt = ctx.rt,
        args = ctx.params(&join_arguments(keys, Receiver::Field("self"))),
        error = ctx.storage_error(&format!("{}::delete", ctx.record)),
    )
}

/// Module index re-exporting every generated module.
pub(crate) fn module_index(modules: &[&str]) -> String {
    let mut out = String::from("// Generated by dalgen. DO NOT EDIT.\n\n");
    for module in modules {
        out.push_str(&format!("pub mod {module};\npub use {module}::*;\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use dalgen_core::{ColumnKind, ColumnType, Schema, derive_tables};

    use super::*;

    fn posts() -> Table {
        let int = ColumnType::new(ColumnKind::Int);
        let schema = Schema::new()
            .with_table("users", [("id", int)])
            .with_table(
                "posts",
                [
                    ("id", int),
                    ("user_id", int),
                    ("title", ColumnType::new(ColumnKind::Text)),
                ],
            );
        derive_tables(&schema)
            .unwrap()
            .into_iter()
            .find(|t| t.name == "posts")
            .unwrap()
    }

    #[test]
    fn test_header_quotes_table() {
        assert_eq!(
            header("posts"),
            "// Generated by dalgen from table \"posts\". DO NOT EDIT."
        );
    }

    #[test]
    fn test_insert_skips_auto_key() {
        let table = posts();
        let ctx = TableContext::new(&table, "rt");
        let body = write_insert_or_update(&ctx, "id");
        assert!(body.contains(r#""INSERT INTO posts(title, user_id) VALUES (?, ?)""#));
        assert!(body.contains(
            r#""UPDATE posts SET id = ?, title = ?, user_id = ? WHERE id = ?""#
        ));
        assert!(body.contains("rt::rusqlite::params![self.id, self.title, self.user_id, self.id]"));
        assert!(body.contains("self.id = done.last_insert_id;"));
    }

    #[test]
    fn test_relation_getter_orders_by_primary_key() {
        let table = posts();
        let ctx = TableContext::new(&table, "rt");
        let body = relation_getter(&ctx, "user_id");
        assert!(body.contains("pub fn get_by_user_posts(db: &impl rt::DbContext, user_id: i64)"));
        assert!(body.contains(r#""SELECT * FROM posts WHERE user_id = ? ORDER BY id""#));
        assert!(body.contains(r#"rt::Error::storage("get_by_user_posts", err)"#));
    }

    #[test]
    fn test_module_index_lists_modules_in_order() {
        assert_eq!(
            module_index(&["posts_generated", "users_generated"]),
            "// Generated by dalgen. DO NOT EDIT.\n\n\
             pub mod posts_generated;\npub use posts_generated::*;\n\
             pub mod users_generated;\npub use users_generated::*;\n"
        );
    }
}
