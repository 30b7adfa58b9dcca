//! Column values
//!
//! `Scalar` is the closed set of representations a cursor can hand back for
//! one column of one row. NULL is a variant of its own so cursors can report
//! it positionally; rows never store it.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// A single dynamically typed column value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bytes(Vec<u8>),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Name of the representation, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::I8(_) => "i8",
            Scalar::I16(_) => "i16",
            Scalar::I32(_) => "i32",
            Scalar::I64(_) => "i64",
            Scalar::U8(_) => "u8",
            Scalar::U16(_) => "u16",
            Scalar::U32(_) => "u32",
            Scalar::U64(_) => "u64",
            Scalar::Bytes(_) => "bytes",
            Scalar::Text(_) => "text",
            Scalar::Timestamp(_) => "timestamp",
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Null => JsonValue::Null,
            Scalar::I8(i) => JsonValue::from(*i),
            Scalar::I16(i) => JsonValue::from(*i),
            Scalar::I32(i) => JsonValue::from(*i),
            Scalar::I64(i) => JsonValue::from(*i),
            Scalar::U8(u) => JsonValue::from(*u),
            Scalar::U16(u) => JsonValue::from(*u),
            Scalar::U32(u) => JsonValue::from(*u),
            Scalar::U64(u) => JsonValue::from(*u),
            Scalar::Bytes(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
            Scalar::Text(s) => JsonValue::String(s.clone()),
            Scalar::Timestamp(dt) => JsonValue::String(dt.to_rfc3339()),
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

impl_from_native! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    Vec<u8> => Bytes,
    String => Text,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<&[u8]> for Scalar {
    fn from(value: &[u8]) -> Self {
        Scalar::Bytes(value.to_vec())
    }
}

impl<T> From<Option<T>> for Scalar
where
    T: Into<Scalar>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}
