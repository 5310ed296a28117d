//! Flat record sets produced by extraction.

use crate::ident::{CanonicalId, Identifier};

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: Identifier,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: Identifier,
    pub name: String,
    pub code: String,
    pub color: Option<String>,
}

/// One scheduled call of a line at a station.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStop {
    pub line_id: Identifier,
    pub stop_index: i64,
    pub station_id: Identifier,
    pub arrival_s: i64,
    pub departure_s: i64,
    pub leg_distance_m: f64,
}

/// A station preview feature from the geo export. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoStation {
    pub id: Identifier,
    pub name: String,
}

/// Everything extracted from the timetable export.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
    pub stops: Vec<LineStop>,
    /// Stop entries dropped because they point at the waypoint sentinel
    pub waypoints_excluded: usize,
}

impl Timetable {
    /// `(canonical id, name)` pairs for reconciliation
    pub fn station_keys(&self) -> Vec<(CanonicalId, &str)> {
        self.stations
            .iter()
            .map(|s| (s.id.canonical().clone(), s.name.as_str()))
            .collect()
    }
}

pub fn geo_station_keys(stations: &[GeoStation]) -> Vec<(CanonicalId, &str)> {
    stations
        .iter()
        .map(|s| (s.id.canonical().clone(), s.name.as_str()))
        .collect()
}
