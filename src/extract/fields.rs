//! Typed access to required fields of a JSON record.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ident::Identifier;

pub(crate) type Record = Map<String, Value>;

fn malformed(record: &str, field: &'static str, expected: &'static str) -> Error {
    Error::MalformedRecord {
        record: record.to_string(),
        field,
        expected,
    }
}

pub(crate) fn require_str<'a>(obj: &'a Record, field: &'static str, record: &str) -> Result<&'a str> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(record, field, "a string"))
}

/// A string field that may be absent or `null`.
pub(crate) fn optional_str(obj: &Record, field: &'static str, record: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(record, field, "a string or null")),
    }
}

pub(crate) fn require_i64(obj: &Record, field: &'static str, record: &str) -> Result<i64> {
    obj.get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed(record, field, "an integer"))
}

pub(crate) fn require_f64(obj: &Record, field: &'static str, record: &str) -> Result<f64> {
    obj.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed(record, field, "a number"))
}

pub(crate) fn require_array<'a>(
    obj: &'a Record,
    field: &'static str,
    record: &str,
) -> Result<&'a Vec<Value>> {
    obj.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(record, field, "an array"))
}

/// An identifier field, written either as text or as a non-negative integer.
pub(crate) fn require_id(obj: &Record, field: &'static str, record: &str) -> Result<Identifier> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(Identifier::parse(s)?),
        Some(Value::Number(n)) if n.is_u64() => Ok(Identifier::parse(&n.to_string())?),
        _ => Err(malformed(record, field, "an identifier")),
    }
}

pub(crate) fn as_record<'a>(
    value: &'a Value,
    record: &str,
    field: &'static str,
) -> Result<&'a Record> {
    value
        .as_object()
        .ok_or_else(|| malformed(record, field, "an object"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_require_id_accepts_numbers() {
        let obj = record(json!({ "id": 26 }));
        let id = require_id(&obj, "id", "Station #0").unwrap();
        assert_eq!(id.original(), "26");
    }

    #[test]
    fn test_require_id_rejects_negative_numbers() {
        let obj = record(json!({ "id": -1 }));
        let err = require_id(&obj, "id", "Station #0").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "id", .. }));
    }

    #[test]
    fn test_require_id_surfaces_bad_encoding() {
        let obj = record(json!({ "id": "station-1" }));
        let err = require_id(&obj, "id", "Station #0").unwrap_err();
        assert!(matches!(err, Error::UnsupportedIdentifierFormat(_)));
    }

    #[test]
    fn test_optional_str() {
        let obj = record(json!({ "color": null, "code": 3 }));
        assert_eq!(optional_str(&obj, "color", "Line").unwrap(), None);
        assert_eq!(optional_str(&obj, "missing", "Line").unwrap(), None);
        assert!(optional_str(&obj, "code", "Line").is_err());
    }

    #[test]
    fn test_require_i64_rejects_fractions() {
        let obj = record(json!({ "arrival": 1.5 }));
        let err = require_i64(&obj, "arrival", "Line 0x1 stop #0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed record Line 0x1 stop #0: field `arrival` is missing or not an integer"
        );
    }
}
