//! Post-load checks over a dataset.

use std::io;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, ForeignKeyViolation, Result};
use crate::schema::{get_table, ALL_TABLES, LINES, LINE_STOPS, LINE_STOPS_ENRICHED, STATIONS};

/// Row counts of a built dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub stations: u64,
    pub lines: u64,
    pub line_stops: u64,
    pub line_stops_enriched: u64,
}

/// Check an existing dataset file without modifying it.
///
/// Fails when a dataset table is absent or any foreign key dangles;
/// otherwise returns the row counts.
pub fn inspect(db_path: &Path) -> Result<DatasetCounts> {
    if !db_path.is_file() {
        return Err(Error::io(db_path, io::Error::from(io::ErrorKind::NotFound)));
    }
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let missing = missing_tables(&conn)?;
    if !missing.is_empty() {
        return Err(Error::IncompleteDataset(missing));
    }

    let counts = dataset_counts(&conn)?;
    debug!(?counts, db = ?db_path, "dataset counted");
    verify_integrity(&conn)?;
    Ok(counts)
}

/// Full foreign-key scan of the database.
pub fn verify_integrity(conn: &Connection) -> Result<()> {
    let violations = foreign_key_violations(conn)?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::ReferentialIntegrityViolation(violations))
    }
}

pub fn foreign_key_violations(conn: &Connection) -> Result<Vec<ForeignKeyViolation>> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut violations = Vec::new();
    for row in rows {
        let (table, rowid, parent) = row?;
        let key = match rowid {
            Some(rowid) => row_key(conn, &table, rowid)?,
            None => None,
        };
        violations.push(ForeignKeyViolation {
            table,
            rowid,
            key,
            parent,
        });
    }

    Ok(violations)
}

/// Primary-key values of a row, rendered as `col=value, ...`
fn row_key(conn: &Connection, table: &str, rowid: i64) -> Result<Option<String>> {
    let Some(schema) = get_table(table) else {
        return Ok(None);
    };

    let sql = format!(
        "SELECT {} FROM {} WHERE rowid = ?1",
        schema.primary_key.join(", "),
        schema.name
    );
    let values = conn
        .query_row(&sql, [rowid], |row| {
            (0..schema.primary_key.len())
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .optional()?;

    Ok(values.map(|values| {
        schema
            .primary_key
            .iter()
            .zip(values)
            .map(|(column, value)| format!("{}={}", column, render(&value)))
            .collect::<Vec<_>>()
            .join(", ")
    }))
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Names of dataset tables absent from the database
pub fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ALL_TABLES
        .iter()
        .map(|t| t.name)
        .filter(|name| !existing.iter().any(|e| e == name))
        .collect())
}

pub fn dataset_counts(conn: &Connection) -> Result<DatasetCounts> {
    let count = |name: &str| -> Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", name), [], |r| r.get(0))?;
        Ok(n as u64)
    };

    Ok(DatasetCounts {
        stations: count(STATIONS.name)?,
        lines: count(LINES.name)?,
        line_stops: count(LINE_STOPS.name)?,
        line_stops_enriched: count(LINE_STOPS_ENRICHED.name)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::generate_schema;

    fn dataset() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        // same import mode as SqliteWriter::create, so orphans can be planted
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        for sql in generate_schema() {
            conn.execute(&sql, []).unwrap();
        }
        conn.execute_batch(
            "INSERT INTO stations VALUES ('0x1', 'Central', 10.0, 20.0);
             INSERT INTO lines VALUES ('0x10', 'Harbour Line', 'H', NULL);
             INSERT INTO line_stops VALUES ('0x10', 0, '0x1', 0, 30, 0.0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_clean_dataset_passes() {
        let conn = dataset();
        verify_integrity(&conn).unwrap();
        assert_eq!(
            dataset_counts(&conn).unwrap(),
            DatasetCounts {
                stations: 1,
                lines: 1,
                line_stops: 1,
                line_stops_enriched: 1
            }
        );
    }

    #[test]
    fn test_orphans_are_reported_with_keys() {
        let conn = dataset();
        conn.execute_batch(
            "INSERT INTO line_stops VALUES ('0x10', 1, '0x99', 60, 90, 500.0);
             INSERT INTO line_stops VALUES ('0x77', 0, '0x1', 0, 0, 0.0);",
        )
        .unwrap();

        match verify_integrity(&conn).unwrap_err() {
            Error::ReferentialIntegrityViolation(violations) => {
                assert_eq!(violations.len(), 2);
                let rendered: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                assert!(rendered.contains(
                    &"line_stops (line_id=0x10, stop_index=1) -> missing stations".to_string()
                ));
                assert!(rendered.contains(
                    &"line_stops (line_id=0x77, stop_index=0) -> missing lines".to_string()
                ));
            }
            other => panic!("unexpected error: {other}"),
        }

        // the enriched view only exposes resolvable stops
        assert_eq!(dataset_counts(&conn).unwrap().line_stops_enriched, 1);
    }

    #[test]
    fn test_missing_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE stations (station_id TEXT PRIMARY KEY);")
            .unwrap();
        assert_eq!(missing_tables(&conn).unwrap(), ["lines", "line_stops"]);
        assert!(missing_tables(&dataset()).unwrap().is_empty());
    }
}
