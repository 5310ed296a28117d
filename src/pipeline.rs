//! The end-to-end build: read, extract, reconcile, load, verify, publish.
//!
//! Stages run strictly in order and each consumes the full output of the one
//! before it. Nothing reaches the destination unless every stage succeeds.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::error::{Document, Error, Result};
use crate::extract::{extract_geo_stations, extract_timetable, geo_station_keys};
use crate::reconcile::reconcile;
use crate::verify::verify_integrity;
use crate::writer::{SqliteWriter, Staging};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Extracting,
    Reconciling,
    Loading,
    Verifying,
    Publishing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Reading => write!(f, "Reading exports"),
            Phase::Extracting => write!(f, "Extracting records"),
            Phase::Reconciling => write!(f, "Reconciling stations"),
            Phase::Loading => write!(f, "Loading SQLite"),
            Phase::Verifying => write!(f, "Verifying integrity"),
            Phase::Publishing => write!(f, "Publishing dataset"),
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub stations: usize,
    pub lines: usize,
    pub line_stops: usize,
    pub waypoints_excluded: usize,
}

/// Build the dataset described by `config`.
pub fn build_dataset(config: &BuildConfig) -> Result<BuildSummary> {
    if !config.destination_clear() {
        return Err(Error::DestinationExists(config.output_db.clone()));
    }

    info!("{}", Phase::Reading);
    let geo = read_document(&config.geo_path, Document::Geo)?;
    let timetable = read_document(&config.timetable_path, Document::Timetable)?;

    build_from_documents(&geo, &timetable, &config.output_db, config.overwrite)
}

/// Build a dataset from already-parsed exports.
pub fn build_from_documents(
    geo: &Value,
    timetable: &Value,
    output_db: &Path,
    overwrite: bool,
) -> Result<BuildSummary> {
    info!("{}", Phase::Extracting);
    let timetable = extract_timetable(timetable)?;
    let geo_stations = extract_geo_stations(geo)?;
    if timetable.waypoints_excluded > 0 {
        info!(
            waypoints = timetable.waypoints_excluded,
            "excluded waypoint stops"
        );
    }

    info!("{}", Phase::Reconciling);
    let reconciliation = reconcile(&timetable.station_keys(), &geo_station_keys(&geo_stations))?;
    debug!(matched = reconciliation.matched, "exports agree");

    info!("{}", Phase::Loading);
    let staging = Staging::beside(output_db)?;
    let mut writer = SqliteWriter::create(staging.path())?;
    writer.create_schema()?;
    let counts = writer.load(&timetable)?;

    info!("{}", Phase::Verifying);
    verify_integrity(writer.connection())?;
    writer.finalize()?;

    info!(output = ?output_db, "{}", Phase::Publishing);
    staging.publish(output_db, overwrite)?;

    Ok(BuildSummary {
        output: output_db.to_path_buf(),
        stations: counts.stations,
        lines: counts.lines,
        line_stops: counts.line_stops,
        waypoints_excluded: timetable.waypoints_excluded,
    })
}

/// Read and parse one export file
pub fn read_document(path: &Path, document: Document) -> Result<Value> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            Error::io(path, e.into())
        } else {
            Error::MalformedInput {
                document,
                reason: e.to_string(),
            }
        }
    })
}
