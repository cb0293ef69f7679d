//! Kind-driven conversion between Postgres rows and raw column values.
//!
//! The engine never knows a concrete entity type; it reads and binds every
//! column through the attribute kinds in the descriptor. Timestamps travel
//! through [`RowValues`] as RFC 3339 strings and UUIDs as strings, matching
//! what the mappers in `plaza-core` expect.

use chrono::{DateTime, Utc};
use plaza_core::{AttributeDescriptor, AttributeKind, EntityDescriptor, Error, Result, RowValues};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use uuid::Uuid;

/// SELECT list for the descriptor.
///
/// Decimal columns are cast to double precision for reading, which keeps
/// row decoding free of a numeric-crate binding; amounts are still stored
/// at two fractional digits.
pub fn select_list(descriptor: &EntityDescriptor) -> String {
    descriptor
        .attributes
        .iter()
        .map(|a| match a.kind {
            AttributeKind::Decimal => format!("CAST({0} AS DOUBLE PRECISION) AS {0}", a.name),
            _ => a.name.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode one row into raw column values keyed by column name.
pub fn decode_row(descriptor: &EntityDescriptor, row: &PgRow) -> Result<RowValues> {
    let mut values = RowValues::new();
    for attr in descriptor.attributes {
        let value = match attr.kind {
            AttributeKind::Text => row
                .try_get::<Option<String>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .map(Value::String),
            AttributeKind::Integer => row
                .try_get::<Option<i64>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .map(|v| Value::Number(v.into())),
            AttributeKind::Decimal => row
                .try_get::<Option<f64>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            AttributeKind::Boolean => row
                .try_get::<Option<bool>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .map(Value::Bool),
            AttributeKind::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .map(|dt| Value::String(dt.to_rfc3339())),
            AttributeKind::Uuid => row
                .try_get::<Option<Uuid>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?
                .map(|u| Value::String(u.to_string())),
            AttributeKind::Json => row
                .try_get::<Option<Value>, _>(attr.name)
                .map_err(|e| decode_err(attr, e))?,
        };
        values.insert(attr.name.to_string(), value.unwrap_or(Value::Null));
    }
    Ok(values)
}

/// Bind one attribute's value onto the query, converting per kind.
pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    attr: &AttributeDescriptor,
    value: Option<&Value>,
) -> Result<Query<'q, Postgres, PgArguments>> {
    let value = value.filter(|v| !v.is_null());
    Ok(match attr.kind {
        AttributeKind::Text => query.bind(value.and_then(Value::as_str).map(str::to_owned)),
        AttributeKind::Integer => query.bind(value.and_then(Value::as_i64)),
        AttributeKind::Decimal => query.bind(value.and_then(Value::as_f64)),
        AttributeKind::Boolean => query.bind(value.and_then(Value::as_bool)),
        AttributeKind::Timestamp => query.bind(parse_timestamp(attr, value)?),
        AttributeKind::Uuid => query.bind(parse_uuid(attr, value)?),
        AttributeKind::Json => query.bind(value.cloned()),
    })
}

/// Bind a primary-key value, honoring the key's attribute kind.
pub fn bind_id<'q>(
    query: Query<'q, Postgres, PgArguments>,
    descriptor: &EntityDescriptor,
    id: &str,
) -> Result<Query<'q, Postgres, PgArguments>> {
    let pk = descriptor
        .primary_key()
        .ok_or_else(|| Error::Mapping(format!("{} has no primary key", descriptor.entity)))?;
    Ok(match pk.kind {
        AttributeKind::Uuid => query.bind(
            Uuid::parse_str(id)
                .map_err(|e| Error::Mapping(format!("Invalid {} id '{}': {}", descriptor.entity, id, e)))?,
        ),
        _ => query.bind(id.to_owned()),
    })
}

fn parse_timestamp(
    attr: &AttributeDescriptor,
    value: Option<&Value>,
) -> Result<Option<DateTime<Utc>>> {
    match value.and_then(Value::as_str) {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::Mapping(format!("Invalid timestamp in {}: {}", attr.name, e))),
        None => Ok(None),
    }
}

fn parse_uuid(attr: &AttributeDescriptor, value: Option<&Value>) -> Result<Option<Uuid>> {
    match value.and_then(Value::as_str) {
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|e| Error::Mapping(format!("Invalid UUID in {}: {}", attr.name, e))),
        None => Ok(None),
    }
}

fn decode_err(attr: &AttributeDescriptor, e: sqlx::Error) -> Error {
    Error::Store(format!("Failed to read column {}: {}", attr.name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaza_core::AttributeKind;

    const HALL: EntityDescriptor = EntityDescriptor::new(
        "Hall",
        "hall",
        &[
            AttributeDescriptor::required("id", AttributeKind::Uuid),
            AttributeDescriptor::required("name", AttributeKind::Text),
            AttributeDescriptor::new("dayprice", AttributeKind::Decimal),
        ],
    );

    #[test]
    fn select_list_casts_decimal_columns() {
        assert_eq!(
            select_list(&HALL),
            "id, name, CAST(dayprice AS DOUBLE PRECISION) AS dayprice"
        );
    }

    #[test]
    fn invalid_timestamp_strings_are_mapping_errors() {
        let attr = AttributeDescriptor::new("createdat", AttributeKind::Timestamp);
        let bad = Value::String("yesterday".to_string());
        assert!(parse_timestamp(&attr, Some(&bad)).is_err());
        assert_eq!(parse_timestamp(&attr, None).unwrap(), None);
    }
}
