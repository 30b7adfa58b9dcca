//! Row snapshots and row collection

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::coerce::TypedValue;
use crate::config::CoercionConfig;
use crate::cursor::Cursor;
use crate::error::{FetchError, FetchResult};
use crate::value::Scalar;

static NULL_SCALAR: Scalar = Scalar::Null;

/// One row of a result set. NULL columns are absent, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Scalar>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the column was present and non-NULL
    pub fn exist(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Typed view over a column; a missing column reads as NULL
    pub fn get(&self, column: &str) -> TypedValue<'_> {
        TypedValue::new(self.raw(column))
    }

    pub fn get_with<'a>(&'a self, column: &str, config: &'a CoercionConfig) -> TypedValue<'a> {
        TypedValue::with_config(self.raw(column), config)
    }

    fn raw(&self, column: &str) -> &Scalar {
        self.values.get(column).unwrap_or(&NULL_SCALAR)
    }

    pub fn value(&self) -> &HashMap<String, Scalar> {
        &self.values
    }

    pub fn into_value(self) -> HashMap<String, Scalar> {
        self.values
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert row to a JSON object
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Build a row from column/value pairs, dropping NULLs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Scalar)>,
        K: Into<String>,
    {
        let values = pairs
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.into(), v))
            .collect();
        Self { values }
    }
}

/// Drain `cursor` into row snapshots, in cursor order.
///
/// Any cursor failure fails the whole call; rows read before it are dropped.
pub fn collect_rows<C: Cursor>(mut cursor: C) -> FetchResult<Vec<Row>> {
    let columns = cursor.column_names().map_err(FetchError::io)?;

    let mut rows = Vec::new();
    while cursor.advance() {
        let values = cursor.scan(columns.len()).map_err(FetchError::io)?;
        if values.len() != columns.len() {
            return Err(FetchError::Io(
                format!(
                    "scan returned {} values for {} columns",
                    values.len(),
                    columns.len()
                )
                .into(),
            ));
        }

        rows.push(Row::from_pairs(columns.iter().cloned().zip(values)));
    }

    tracing::debug!("Collected {} rows over {} columns", rows.len(), columns.len());
    Ok(rows)
}
