use crate::schema::{TableSchema, ViewSchema, ALL_TABLES, ALL_VIEWS};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let check = col
            .check
            .map(|expr| format!(" CHECK ({})", expr))
            .unwrap_or_default();

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql(),
            null_constraint,
            check
        ));
    }

    columns.push(format!("    PRIMARY KEY ({})", schema.primary_key.join(", ")));

    for check in schema.checks {
        columns.push(format!("    CHECK ({})", check));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
            fk.column, fk.references_table, fk.references_column, fk.on_delete
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for a table's declared indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .indexes
        .iter()
        .map(|index| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name,
                index.columns.join("_"),
                schema.name,
                index.columns.join(", ")
            )
        })
        .collect()
}

pub fn generate_create_view(view: &ViewSchema) -> String {
    format!("CREATE VIEW {} AS\n{}", view.name, view.select)
}

/// Full DDL script for the dataset, in creation order
pub fn generate_schema() -> Vec<String> {
    let mut statements = Vec::new();
    for table in ALL_TABLES {
        statements.push(generate_create_table(table));
        statements.extend(generate_indexes(table));
    }
    for view in ALL_VIEWS {
        statements.push(generate_create_view(view));
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{LINES, LINE_STOPS, LINE_STOPS_ENRICHED, STATIONS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&LINE_STOPS);
        assert!(sql.starts_with("CREATE TABLE line_stops"));
        assert!(sql.contains("stop_index INTEGER NOT NULL CHECK (stop_index >= 0)"));
        assert!(sql.contains("PRIMARY KEY (line_id, stop_index)"));
        assert!(sql.contains("CHECK (departure_s >= arrival_s)"));
        assert!(sql.contains("FOREIGN KEY (line_id) REFERENCES lines(line_id) ON DELETE CASCADE"));
        assert!(sql.contains(
            "FOREIGN KEY (station_id) REFERENCES stations(station_id) ON DELETE RESTRICT"
        ));
    }

    #[test]
    fn test_nullable_color() {
        let sql = generate_create_table(&LINES);
        assert!(sql.contains("    color TEXT,"));
        assert!(sql.contains("code TEXT NOT NULL"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&LINE_STOPS);
        assert_eq!(
            indexes,
            [
                "CREATE INDEX idx_line_stops_station_id ON line_stops(station_id)",
                "CREATE INDEX idx_line_stops_line_id ON line_stops(line_id)",
            ]
        );
        assert!(generate_indexes(&STATIONS).is_empty());
    }

    #[test]
    fn test_generate_schema_order() {
        let ddl = generate_schema();
        assert!(ddl[0].starts_with("CREATE TABLE stations"));
        assert_eq!(ddl.last().unwrap(), &generate_create_view(&LINE_STOPS_ENRICHED));
        assert_eq!(ddl.len(), 3 + 2 + 1);
    }
}
