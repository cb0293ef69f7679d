//! The row-mapping seam between typed entities and raw column values.
//!
//! Only table creation and statement generation are generic; the mapping
//! itself is intentionally concrete. Each entity type supplies one
//! [`RecordMapper`] implementation, and the storage engine is handed that
//! capability rather than inheriting from a base type.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::{Error, Result};
use crate::schema::EntityDescriptor;

/// Raw row values keyed by column name.
///
/// Timestamps travel as RFC 3339 strings, UUIDs as strings, JSON attributes
/// as their document value.
pub type RowValues = Map<String, Value>;

/// Bidirectional mapping for one concrete entity type.
pub trait RecordMapper<T>: Send + Sync {
    fn descriptor(&self) -> &'static EntityDescriptor;

    fn from_row(&self, row: &RowValues) -> Result<T>;

    fn to_row(&self, entity: &T) -> Result<RowValues>;
}

/// Required text column; missing or non-text is a mapping failure.
pub fn str_field(row: &RowValues, name: &str) -> Result<String> {
    row.get(name)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::Mapping(format!("Missing required column: {}", name)))
}

/// Optional text column.
pub fn opt_str_field(row: &RowValues, name: &str) -> Option<String> {
    row.get(name).and_then(Value::as_str).map(str::to_owned)
}

pub fn int_field(row: &RowValues, name: &str) -> i64 {
    row.get(name).and_then(Value::as_i64).unwrap_or(0)
}

pub fn float_field(row: &RowValues, name: &str) -> f64 {
    row.get(name).and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn bool_field(row: &RowValues, name: &str) -> bool {
    row.get(name).and_then(Value::as_bool).unwrap_or(false)
}

/// Required timestamp; a null column becomes the current instant.
pub fn timestamp_field(row: &RowValues, name: &str) -> DateTime<Utc> {
    opt_timestamp_field(row, name).unwrap_or_else(Utc::now)
}

/// Optional timestamp; a null column stays `None`.
pub fn opt_timestamp_field(row: &RowValues, name: &str) -> Option<DateTime<Utc>> {
    row.get(name)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// JSON list column; null or missing deserializes to `[]`.
pub fn json_array_field(row: &RowValues, name: &str) -> Value {
    match row.get(name) {
        Some(v) if v.is_array() => v.clone(),
        _ => Value::Array(Vec::new()),
    }
}

/// JSON object column; null or missing deserializes to `{}`.
pub fn json_object_field(row: &RowValues, name: &str) -> Value {
    match row.get(name) {
        Some(v) if v.is_object() => v.clone(),
        _ => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> RowValues {
        let mut row = RowValues::new();
        row.insert("name".into(), json!("Gran Sala"));
        row.insert("capacity".into(), json!(120));
        row.insert("amenities".into(), Value::Null);
        row.insert("createdat".into(), json!("2024-03-01T10:00:00Z"));
        row
    }

    #[test]
    fn null_json_defaults_to_empty_collections() {
        assert_eq!(json_array_field(&row(), "amenities"), json!([]));
        assert_eq!(json_object_field(&row(), "amenities"), json!({}));
    }

    #[test]
    fn missing_required_text_is_a_mapping_error() {
        assert!(matches!(
            str_field(&row(), "missing"),
            Err(Error::Mapping(_))
        ));
    }

    #[test]
    fn null_timestamp_falls_back_to_now() {
        let parsed = opt_timestamp_field(&row(), "createdat").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        assert_eq!(opt_timestamp_field(&row(), "missing"), None);
        let fallback = timestamp_field(&row(), "missing");
        assert!(fallback <= Utc::now());
    }
}
