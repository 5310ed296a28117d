use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::fields::{
    as_record, optional_str, require_array, require_f64, require_i64, require_id, require_str,
    Record,
};
use super::records::{Line, LineStop, Station, Timetable};
use crate::error::{Document, Error, Result};
use crate::ident::{CanonicalId, Identifier};

/// Station reference NIMBY Rails writes for geometry-only waypoints (`0x0`).
///
/// Only this single value is treated as a waypoint. If the game starts using
/// other sentinels they will be loaded as ordinary (and then orphaned) stops.
pub const WAYPOINT_SENTINEL: &str = "0x0";

/// Project the timetable export into stations, lines and line stops.
pub fn extract_timetable(doc: &Value) -> Result<Timetable> {
    let records = doc.as_array().ok_or_else(|| Error::MalformedInput {
        document: Document::Timetable,
        reason: "expected a JSON array of records".to_string(),
    })?;

    let mut stations = Vec::new();
    let mut line_records = Vec::new();
    let mut ignored = 0usize;

    for (pos, value) in records.iter().enumerate() {
        let label = format!("#{}", pos);
        let obj = as_record(value, &label, "class")?;
        match require_str(obj, "class", &label)? {
            "Station" => stations.push(parse_station(obj, pos)?),
            "Line" => line_records.push((pos, obj)),
            _ => ignored += 1,
        }
    }

    let stored_ids: HashMap<CanonicalId, Identifier> = stations
        .iter()
        .map(|s| (s.id.canonical().clone(), s.id.clone()))
        .collect();

    let waypoint = Identifier::parse(WAYPOINT_SENTINEL)?;
    let mut timetable = Timetable::default();
    for (pos, obj) in line_records {
        let line = parse_line(obj, pos)?;
        let stops = require_array(obj, "stops", &format!("Line {}", line.id))?;

        for (stop_pos, value) in stops.iter().enumerate() {
            let label = format!("Line {} stop #{}", line.id, stop_pos);
            let stop = as_record(value, &label, "station_id")?;
            let station_ref = require_id(stop, "station_id", &label)?;
            if station_ref.canonical() == waypoint.canonical() {
                timetable.waypoints_excluded += 1;
                continue;
            }

            // Persist the reference in the encoding the station itself uses.
            let station_id = match stored_ids.get(station_ref.canonical()) {
                Some(stored) => stored.clone(),
                None => station_ref,
            };

            timetable.stops.push(LineStop {
                line_id: line.id.clone(),
                stop_index: require_i64(stop, "idx", &label)?,
                station_id,
                arrival_s: require_i64(stop, "arrival", &label)?,
                departure_s: require_i64(stop, "departure", &label)?,
                leg_distance_m: require_f64(stop, "leg_distance", &label)?,
            });
        }
        timetable.lines.push(line);
    }
    timetable.stations = stations;

    debug!(
        records = records.len(),
        ignored,
        stations = timetable.stations.len(),
        lines = timetable.lines.len(),
        stops = timetable.stops.len(),
        "extracted timetable"
    );
    Ok(timetable)
}

fn parse_station(obj: &Record, pos: usize) -> Result<Station> {
    let id = require_id(obj, "id", &format!("Station #{}", pos))?;
    let label = format!("Station {}", id);
    let name = require_str(obj, "name", &label)?.to_string();
    let (lon, lat) = parse_lonlat(obj.get("lonlat"), &id)?;
    Ok(Station { id, name, lon, lat })
}

fn parse_lonlat(value: Option<&Value>, id: &Identifier) -> Result<(f64, f64)> {
    let invalid = |reason: String| Error::InvalidStationGeometry {
        station_id: id.to_string(),
        reason,
    };

    let pair = match value {
        None | Some(Value::Null) => return Err(invalid("missing lonlat".to_string())),
        Some(Value::Array(pair)) => pair,
        Some(other) => return Err(invalid(format!("lonlat is not an array: {}", other))),
    };
    if pair.len() < 2 {
        return Err(invalid(format!(
            "lonlat has {} element(s), expected 2",
            pair.len()
        )));
    }
    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(invalid("lonlat holds a non-numeric coordinate".to_string())),
    }
}

fn parse_line(obj: &Record, pos: usize) -> Result<Line> {
    let id = require_id(obj, "id", &format!("Line #{}", pos))?;
    let label = format!("Line {}", id);
    Ok(Line {
        name: require_str(obj, "name", &label)?.to_string(),
        code: require_str(obj, "code", &label)?.to_string(),
        color: optional_str(obj, "color", &label)?,
        id,
    })
}
