//! Error types for the dataset pipeline.
//!
//! Every variant is fatal to a run. The CLI layer wraps these in `anyhow`.

use std::fmt;
use std::path::PathBuf;

use crate::ident::{CanonicalId, UnsupportedIdentifierFormat};

/// How many offending entries a mismatch message lists before eliding the rest.
const SAMPLE_LIMIT: usize = 5;

pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two source exports a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Geo,
    Timetable,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Geo => write!(f, "geo"),
            Document::Timetable => write!(f, "timetable"),
        }
    }
}

/// Station identifiers present in one export but not the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMismatch {
    pub missing_in_geo: Vec<CanonicalId>,
    pub missing_in_timetable: Vec<CanonicalId>,
}

impl fmt::Display for IdentifierMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing_in_geo={} {}, missing_in_timetable={} {}",
            self.missing_in_geo.len(),
            Sample(&self.missing_in_geo),
            self.missing_in_timetable.len(),
            Sample(&self.missing_in_timetable),
        )
    }
}

/// A station known to both exports under different names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    pub station_id: CanonicalId,
    pub timetable_name: String,
    pub geo_name: String,
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} vs {:?}",
            self.station_id, self.timetable_name, self.geo_name
        )
    }
}

/// One row reported by the foreign-key scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyViolation {
    pub table: String,
    pub rowid: Option<i64>,
    /// Primary-key columns of the offending row, when it could be looked up
    pub key: Option<String>,
    pub parent: String,
}

impl fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.key, self.rowid) {
            (Some(key), _) => write!(f, "{} ({}) -> missing {}", self.table, key, self.parent),
            (None, Some(rowid)) => write!(f, "{} row {} -> missing {}", self.table, rowid, self.parent),
            (None, None) => write!(f, "{} -> missing {}", self.table, self.parent),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source document is not JSON or not of the expected top-level shape
    #[error("malformed {document} document: {reason}")]
    MalformedInput { document: Document, reason: String },

    /// A record lacks a required field (or carries it with the wrong type)
    #[error("malformed record {record}: field `{field}` is missing or not {expected}")]
    MalformedRecord {
        record: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("station {station_id}: invalid geometry ({reason})")]
    InvalidStationGeometry { station_id: String, reason: String },

    #[error(transparent)]
    UnsupportedIdentifierFormat(#[from] UnsupportedIdentifierFormat),

    #[error("station identifiers differ between exports: {0}")]
    StationIdentifierMismatch(IdentifierMismatch),

    #[error("{} station name(s) differ between exports {}", .0.len(), Sample(.0))]
    StationNameMismatch(Vec<NameConflict>),

    #[error("constraint violation loading {table} ({row}): {detail}")]
    LoadConstraintViolation {
        table: &'static str,
        row: String,
        detail: String,
    },

    #[error("{} referential integrity violation(s) {}", .0.len(), Sample(.0))]
    ReferentialIntegrityViolation(Vec<ForeignKeyViolation>),

    #[error("database missing required tables: {}", .0.join(", "))]
    IncompleteDataset(Vec<&'static str>),

    #[error("destination already holds data: {0:?}")]
    DestinationExists(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Renders the first few entries of a list as `[a, b, ... +n more]`.
struct Sample<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for Sample<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.iter().take(SAMPLE_LIMIT).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        if self.0.len() > SAMPLE_LIMIT {
            write!(f, ", ... +{} more", self.0.len() - SAMPLE_LIMIT)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_mismatch_display() {
        let err = Error::StationIdentifierMismatch(IdentifierMismatch {
            missing_in_geo: vec![CanonicalId::from(26)],
            missing_in_timetable: vec![],
        });
        assert_eq!(
            err.to_string(),
            "station identifiers differ between exports: missing_in_geo=1 [26], missing_in_timetable=0 []"
        );
    }

    #[test]
    fn test_sample_elides_long_lists() {
        let ids: Vec<CanonicalId> = (1..=8u64).map(CanonicalId::from).collect();
        let err = Error::StationIdentifierMismatch(IdentifierMismatch {
            missing_in_geo: vec![],
            missing_in_timetable: ids,
        });
        assert!(err.to_string().ends_with("missing_in_timetable=8 [1, 2, 3, 4, 5, ... +3 more]"));
    }

    #[test]
    fn test_name_mismatch_display() {
        let err = Error::StationNameMismatch(vec![NameConflict {
            station_id: CanonicalId::from(1),
            timetable_name: "Central".into(),
            geo_name: "central".into(),
        }]);
        assert_eq!(
            err.to_string(),
            "1 station name(s) differ between exports [1: \"Central\" vs \"central\"]"
        );
    }

    #[test]
    fn test_malformed_record_display() {
        let err = Error::MalformedRecord {
            record: "Line 0x2".into(),
            field: "code",
            expected: "a string",
        };
        assert_eq!(
            err.to_string(),
            "malformed record Line 0x2: field `code` is missing or not a string"
        );
    }
}
