//! Table and view definitions for the rail network dataset

use super::types::*;

pub static STATIONS: TableSchema = TableSchema {
    name: "stations",
    columns: &[
        Column::required("station_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("lon", ColumnType::Real),
        Column::required("lat", ColumnType::Real),
    ],
    primary_key: &["station_id"],
    foreign_keys: &[],
    checks: &[],
    indexes: &[],
};

pub static LINES: TableSchema = TableSchema {
    name: "lines",
    columns: &[
        Column::required("line_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("code", ColumnType::Text),
        Column::new("color", ColumnType::Text),
    ],
    primary_key: &["line_id"],
    foreign_keys: &[],
    checks: &[],
    indexes: &[],
};

pub static LINE_STOPS: TableSchema = TableSchema {
    name: "line_stops",
    columns: &[
        Column::required("line_id", ColumnType::Text),
        Column::required("stop_index", ColumnType::Integer).check("stop_index >= 0"),
        Column::required("station_id", ColumnType::Text),
        Column::required("arrival_s", ColumnType::Integer).check("arrival_s >= 0"),
        Column::required("departure_s", ColumnType::Integer).check("departure_s >= 0"),
        Column::required("leg_distance_m", ColumnType::Real).check("leg_distance_m >= 0"),
    ],
    primary_key: &["line_id", "stop_index"],
    foreign_keys: &[
        ForeignKey::new("line_id", "lines", OnDelete::Cascade),
        ForeignKey::new("station_id", "stations", OnDelete::Restrict),
    ],
    checks: &["departure_s >= arrival_s"],
    indexes: &[Index::on(&["station_id"]), Index::on(&["line_id"])],
};

/// Stops joined with their line and station attributes
pub static LINE_STOPS_ENRICHED: ViewSchema = ViewSchema {
    name: "line_stops_enriched",
    select: "SELECT
    ls.line_id,
    l.name AS line_name,
    l.code AS line_code,
    l.color AS line_color,
    ls.stop_index,
    ls.station_id,
    s.name AS station_name,
    s.lon,
    s.lat,
    ls.arrival_s,
    ls.departure_s,
    ls.leg_distance_m
FROM line_stops ls
JOIN lines l ON l.line_id = ls.line_id
JOIN stations s ON s.station_id = ls.station_id",
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&STATIONS, &LINES, &LINE_STOPS];

pub static ALL_VIEWS: &[&ViewSchema] = &[&LINE_STOPS_ENRICHED];

pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}

pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_precede_children() {
        for (pos, table) in ALL_TABLES.iter().enumerate() {
            for parent in table.dependencies() {
                let parent_pos = ALL_TABLES
                    .iter()
                    .position(|t| t.name == parent)
                    .expect("FK parent must be a known table");
                assert!(parent_pos < pos, "{} must precede {}", parent, table.name);
            }
        }
    }

    #[test]
    fn test_foreign_keys_reference_primary_keys() {
        for table in ALL_TABLES {
            for fk in table.foreign_keys {
                let parent = get_table(fk.references_table).unwrap();
                assert_eq!(parent.primary_key, &[fk.references_column]);
                assert!(table.column_names().contains(&fk.column));
            }
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(table_names(), ["stations", "lines", "line_stops"]);
        assert!(get_table("line_stops").is_some());
        assert!(get_table("routes").is_none());
    }
}
