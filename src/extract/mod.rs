//! Projection of the two raw exports into flat record sets.

mod fields;
pub mod geo;
pub mod records;
pub mod timetable;

pub use geo::{extract_geo_stations, STATION_PREVIEW_CLASS};
pub use records::{geo_station_keys, GeoStation, Line, LineStop, Station, Timetable};
pub use timetable::{extract_timetable, WAYPOINT_SENTINEL};
