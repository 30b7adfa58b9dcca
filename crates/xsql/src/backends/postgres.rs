//! PostgreSQL cursor over rows fetched with sqlx
//!
//! Query execution stays with the caller; this adapter only walks the
//! `PgRow`s it was given and decodes each column into a [`Scalar`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{types::Oid, PgRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::config::TimeZoneSetting;
use crate::cursor::Cursor;
use crate::value::Scalar;

/// Cursor over an already fetched PostgreSQL result set
///
/// `TIMESTAMP` and `DATE` columns carry no zone of their own; they are read
/// in the cursor's zone, which defaults to `Local` like textual timestamps.
pub struct PgRowsCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<PgRow>,
    current: Option<PgRow>,
    time_zone: TimeZoneSetting,
}

impl PgRowsCursor {
    pub fn new(rows: Vec<PgRow>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|col| col.name().to_string()).collect())
            .unwrap_or_default();

        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
            time_zone: TimeZoneSetting::default(),
        }
    }

    /// Zone used for timestamp columns without time zone
    pub fn with_time_zone(mut self, zone: TimeZoneSetting) -> Self {
        self.time_zone = zone;
        self
    }
}

impl From<Vec<PgRow>> for PgRowsCursor {
    fn from(rows: Vec<PgRow>) -> Self {
        Self::new(rows)
    }
}

impl Cursor for PgRowsCursor {
    type Error = sqlx::Error;

    fn column_names(&mut self) -> Result<Vec<String>, Self::Error> {
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn scan(&mut self, count: usize) -> Result<Vec<Scalar>, Self::Error> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| sqlx::Error::Protocol("scan called without a current row".to_string()))?;

        (0..count)
            .map(|index| postgres_value_to_scalar(row, index, self.time_zone))
            .collect()
    }
}

/// How a PostgreSQL column type is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PgColumnKind {
    Char,
    Bool,
    Int2,
    Int4,
    Int8,
    Oid,
    Float4,
    Float8,
    Text,
    Bytea,
    TimestampTz,
    Timestamp,
    Date,
    /// Kept as the value's wire bytes
    Raw,
}

impl PgColumnKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "\"CHAR\"" => PgColumnKind::Char,
            "BOOL" => PgColumnKind::Bool,
            "INT2" => PgColumnKind::Int2,
            "INT4" => PgColumnKind::Int4,
            "INT8" => PgColumnKind::Int8,
            "OID" => PgColumnKind::Oid,
            "FLOAT4" => PgColumnKind::Float4,
            "FLOAT8" => PgColumnKind::Float8,
            "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "CITEXT" => PgColumnKind::Text,
            "BYTEA" => PgColumnKind::Bytea,
            "TIMESTAMPTZ" => PgColumnKind::TimestampTz,
            "TIMESTAMP" => PgColumnKind::Timestamp,
            "DATE" => PgColumnKind::Date,
            _ => PgColumnKind::Raw,
        }
    }
}

fn postgres_value_to_scalar(
    row: &PgRow,
    index: usize,
    zone: TimeZoneSetting,
) -> Result<Scalar, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Scalar::Null);
    }

    let column = row.try_column(index)?;
    let scalar = match PgColumnKind::from_type_name(column.type_info().name()) {
        PgColumnKind::Char => Scalar::I8(row.try_get(index)?),
        PgColumnKind::Bool => Scalar::I8(row.try_get::<bool, _>(index)? as i8),
        PgColumnKind::Int2 => Scalar::I16(row.try_get(index)?),
        PgColumnKind::Int4 => Scalar::I32(row.try_get(index)?),
        PgColumnKind::Int8 => Scalar::I64(row.try_get(index)?),
        PgColumnKind::Oid => Scalar::U32(row.try_get::<Oid, _>(index)?.0),
        PgColumnKind::Float4 => Scalar::Text(row.try_get::<f32, _>(index)?.to_string()),
        PgColumnKind::Float8 => Scalar::Text(row.try_get::<f64, _>(index)?.to_string()),
        PgColumnKind::Text => Scalar::Text(row.try_get(index)?),
        PgColumnKind::Bytea => Scalar::Bytes(row.try_get(index)?),
        PgColumnKind::TimestampTz => Scalar::Timestamp(row.try_get::<DateTime<Utc>, _>(index)?),
        PgColumnKind::Timestamp => local_timestamp(row.try_get::<NaiveDateTime, _>(index)?, zone),
        PgColumnKind::Date => match row.try_get::<NaiveDate, _>(index)?.and_hms_opt(0, 0, 0) {
            Some(midnight) => local_timestamp(midnight, zone),
            None => Scalar::Null,
        },
        PgColumnKind::Raw => {
            let bytes = raw.as_bytes().map_err(sqlx::Error::Decode)?;
            Scalar::Bytes(bytes.to_vec())
        }
    };

    Ok(scalar)
}

fn local_timestamp(naive: NaiveDateTime, zone: TimeZoneSetting) -> Scalar {
    match zone.resolve(&naive) {
        Some(instant) => Scalar::Timestamp(instant),
        None => Scalar::Null,
    }
}
