use serde_json::Value;
use tracing::debug;

use super::fields::{require_id, require_str};
use super::records::GeoStation;
use crate::error::{Document, Error, Result};

/// `properties.class` value that marks a feature as a station preview.
pub const STATION_PREVIEW_CLASS: &str = "StationPreview";

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedInput {
        document: Document::Geo,
        reason: reason.into(),
    }
}

/// Select the station preview features of a geo feature collection.
///
/// Features without properties, or of any other class, are map geometry and
/// are skipped.
pub fn extract_geo_stations(doc: &Value) -> Result<Vec<GeoStation>> {
    let collection = doc
        .as_object()
        .ok_or_else(|| malformed("expected a feature collection object"))?;

    if let Some(kind) = collection.get("type") {
        if kind.as_str() != Some("FeatureCollection") {
            return Err(malformed(format!("unexpected type {}", kind)));
        }
    }

    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing `features` array"))?;

    let mut stations = Vec::new();
    for (pos, feature) in features.iter().enumerate() {
        let Some(props) = feature.get("properties").and_then(Value::as_object) else {
            continue;
        };
        if props.get("class").and_then(Value::as_str) != Some(STATION_PREVIEW_CLASS) {
            continue;
        }

        let label = format!("Feature #{}", pos);
        let id = require_id(props, "id", &label)?;
        let name = require_str(props, "name", &format!("StationPreview {}", id))?.to_string();
        stations.push(GeoStation { id, name });
    }

    debug!(
        features = features.len(),
        stations = stations.len(),
        "selected station previews"
    );
    Ok(stations)
}
