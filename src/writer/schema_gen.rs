use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", quote_ident(schema.name));
    let mut columns = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        columns.push(format!(
            "    {} {}{}",
            quote_ident(col.name),
            col.col_type.sql_type(),
            null_constraint
        ));
    }

    if !schema.primary_key.is_empty() {
        columns.push(format!(
            "    PRIMARY KEY ({})",
            join_idents(schema.primary_key)
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            join_idents(fk.columns),
            quote_ident(fk.references_table),
            join_idents(fk.references_columns)
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns and explicit indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let fk_indexes = schema
        .foreign_keys
        .iter()
        // the event_id FK on subtype tables is already the primary key
        .filter(|fk| fk.columns != schema.primary_key)
        .map(|fk| fk.columns);
    let explicit = schema.indexes.iter().map(|idx| idx.columns);

    fk_indexes
        .chain(explicit)
        .map(|columns| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name,
                columns.join("_"),
                quote_ident(schema.name),
                join_idents(columns)
            )
        })
        .collect()
}

/// Full bootstrap script: drops then recreates every given table.
/// Tables must be passed parents-first.
pub fn generate_schema_script(tables: &[&TableSchema]) -> String {
    let mut script = String::new();

    for schema in tables.iter().rev() {
        script.push_str(&format!("DROP TABLE IF EXISTS {};\n", quote_ident(schema.name)));
    }

    for schema in tables {
        script.push('\n');
        script.push_str(&generate_create_table(schema));
        script.push_str(";\n");
        for index_sql in generate_indexes(schema) {
            script.push_str(&index_sql);
            script.push_str(";\n");
        }
    }

    script
}

/// Some column and table names (`type`, `timestamp`, `pass`, `switch`) are
/// keywords, so identifiers are always quoted.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}

fn join_idents(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}
