//! Conversion of extracted records into bindable rows.

use crate::extract::{Line, LineStop, Station};
use crate::schema::{TableSchema, LINES, LINE_STOPS, STATIONS};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| SqlValue::Text(s.to_string()))
            .unwrap_or(SqlValue::Null)
    }
}

/// A record that maps onto one row of a table
pub trait ToRow {
    fn schema() -> &'static TableSchema;

    /// Short description used when a row is rejected
    fn describe(&self) -> String;

    /// Values in the order of the schema's columns
    fn values(&self) -> Vec<SqlValue>;
}

impl ToRow for Station {
    fn schema() -> &'static TableSchema {
        &STATIONS
    }

    fn describe(&self) -> String {
        format!("station {}", self.id)
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.original().to_string()),
            SqlValue::Text(self.name.clone()),
            SqlValue::Real(self.lon),
            SqlValue::Real(self.lat),
        ]
    }
}

impl ToRow for Line {
    fn schema() -> &'static TableSchema {
        &LINES
    }

    fn describe(&self) -> String {
        format!("line {}", self.id)
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.original().to_string()),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.code.clone()),
            self.color.as_deref().into(),
        ]
    }
}

impl ToRow for LineStop {
    fn schema() -> &'static TableSchema {
        &LINE_STOPS
    }

    fn describe(&self) -> String {
        format!("line {} stop {}", self.line_id, self.stop_index)
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.line_id.original().to_string()),
            SqlValue::Integer(self.stop_index),
            SqlValue::Text(self.station_id.original().to_string()),
            SqlValue::Integer(self.arrival_s),
            SqlValue::Integer(self.departure_s),
            SqlValue::Real(self.leg_distance_m),
        ]
    }
}
