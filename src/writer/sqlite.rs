use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, ErrorCode, Transaction};
use serde::Serialize;
use tracing::{debug, trace};

use super::row::ToRow;
use super::schema_gen::generate_schema;
use crate::error::{Error, Result};
use crate::extract::Timetable;
use crate::ident::{CanonicalId, Identifier};

/// Rows between trace events while inserting
const PROGRESS_EVERY: usize = 1000;

/// Rows written per table by one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadCounts {
    pub stations: usize,
    pub lines: usize,
    pub line_stops: usize,
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open a fresh database file for bulk loading.
    ///
    /// Foreign keys are not enforced while importing; run
    /// [`crate::verify::verify_integrity`] on the connection afterwards.
    pub fn create(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // MEMORY keeps ROLLBACK working without a journal file beside the staging db
        conn.pragma_update_and_check(None, "journal_mode", "MEMORY", |row| {
            row.get::<_, String>(0)
        })?;
        conn.execute_batch(
            "PRAGMA foreign_keys = OFF;
             PRAGMA synchronous = OFF;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables, indexes and views
    pub fn create_schema(&self) -> Result<()> {
        for sql in generate_schema() {
            self.conn.execute(&sql, [])?;
        }
        Ok(())
    }

    /// Insert every extracted record in a single transaction.
    ///
    /// The first rejected row aborts the load and nothing is kept.
    pub fn load(&mut self, timetable: &Timetable) -> Result<LoadCounts> {
        check_canonical_unique(&timetable.stations, |s| &s.id)?;
        check_canonical_unique(&timetable.lines, |l| &l.id)?;

        let tx = self.conn.transaction()?;
        let counts = LoadCounts {
            stations: insert_rows(&tx, &timetable.stations)?,
            lines: insert_rows(&tx, &timetable.lines)?,
            line_stops: insert_rows(&tx, &timetable.stops)?,
        };
        tx.commit()?;

        debug!(?counts, "load committed");
        Ok(counts)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Finalize and close the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        self.conn.close().map_err(|(_, err)| Error::Storage(err))
    }
}

/// Reject two records whose ids differ only in encoding.
fn check_canonical_unique<T: ToRow>(rows: &[T], id: impl Fn(&T) -> &Identifier) -> Result<()> {
    let mut seen: HashMap<CanonicalId, &Identifier> = HashMap::with_capacity(rows.len());

    for row in rows {
        let current = id(row);
        if let Some(previous) = seen.insert(current.canonical().clone(), current) {
            let schema = T::schema();
            return Err(Error::LoadConstraintViolation {
                table: schema.name,
                row: row.describe(),
                detail: format!(
                    "UNIQUE constraint failed: {}.{} ({} {} and {} {} are the same identifier)",
                    schema.name,
                    schema.primary_key[0],
                    previous.encoding(),
                    previous,
                    current.encoding(),
                    current
                ),
            });
        }
    }

    Ok(())
}

/// Insert rows into their table, returning how many were written
fn insert_rows<T: ToRow>(tx: &Transaction, rows: &[T]) -> Result<usize> {
    let schema = T::schema();
    let columns = schema.column_names();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut stmt = tx.prepare_cached(&insert_sql)?;

    for (count, row) in rows.iter().enumerate() {
        for (idx, value) in row.values().iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute().map_err(|err| match err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                Error::LoadConstraintViolation {
                    table: schema.name,
                    row: row.describe(),
                    detail: message.unwrap_or_else(|| code.to_string()),
                }
            }
            other => Error::Storage(other),
        })?;

        if (count + 1) % PROGRESS_EVERY == 0 {
            trace!(table = schema.name, rows = count + 1, "inserted");
        }
    }

    Ok(rows.len())
}
