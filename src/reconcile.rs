//! Cross-source reconciliation of station identifiers and names.
//!
//! The geo and timetable exports are written independently and can come from
//! out-of-sync game states. Identifier sets are compared first, in full; names
//! are compared only once both sets are known to be equal.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, IdentifierMismatch, NameConflict, Result};
use crate::ident::CanonicalId;

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Stations present, under the same name, in both exports
    pub matched: usize,
}

/// Compare `(canonical id, name)` pairs from both exports.
///
/// When an id repeats within one source, every name listed for it must match
/// every name the other source lists.
pub fn reconcile(timetable: &[(CanonicalId, &str)], geo: &[(CanonicalId, &str)]) -> Result<Reconciliation> {
    let timetable = index(timetable);
    let geo = index(geo);

    let missing_in_geo: Vec<CanonicalId> = timetable
        .keys()
        .filter(|id| !geo.contains_key(*id))
        .cloned()
        .collect();
    let missing_in_timetable: Vec<CanonicalId> = geo
        .keys()
        .filter(|id| !timetable.contains_key(*id))
        .cloned()
        .collect();

    if !missing_in_geo.is_empty() || !missing_in_timetable.is_empty() {
        return Err(Error::StationIdentifierMismatch(IdentifierMismatch {
            missing_in_geo,
            missing_in_timetable,
        }));
    }

    let mut conflicts = Vec::new();
    for (id, tt_names) in &timetable {
        for tt_name in tt_names {
            for geo_name in &geo[id] {
                if tt_name != geo_name {
                    conflicts.push(NameConflict {
                        station_id: id.clone(),
                        timetable_name: tt_name.to_string(),
                        geo_name: geo_name.to_string(),
                    });
                }
            }
        }
    }

    if !conflicts.is_empty() {
        return Err(Error::StationNameMismatch(conflicts));
    }

    debug!(stations = timetable.len(), "station sets agree");
    Ok(Reconciliation {
        matched: timetable.len(),
    })
}

/// Distinct names per id, in first-seen order
fn index<'a>(pairs: &[(CanonicalId, &'a str)]) -> BTreeMap<CanonicalId, Vec<&'a str>> {
    let mut map: BTreeMap<CanonicalId, Vec<&'a str>> = BTreeMap::new();
    for (id, name) in pairs {
        let names = map.entry(id.clone()).or_default();
        if !names.contains(name) {
            names.push(*name);
        }
    }
    map
}
