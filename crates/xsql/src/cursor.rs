//! Cursor capability consumed from the query layer

use std::collections::VecDeque;
use std::convert::Infallible;

use crate::value::Scalar;

/// A positioned result set that can be walked row by row.
///
/// The cursor is handed over already positioned before its first row.
/// `scan` reads the current row and must return values aligned with
/// `column_names`, reporting NULL as [`Scalar::Null`].
pub trait Cursor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Names of the result set columns, in scan order
    fn column_names(&mut self) -> Result<Vec<String>, Self::Error>;

    /// Move to the next row; false once the result set is exhausted
    fn advance(&mut self) -> bool;

    /// Read `count` values of the current row
    fn scan(&mut self, count: usize) -> Result<Vec<Scalar>, Self::Error>;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Error = C::Error;

    fn column_names(&mut self) -> Result<Vec<String>, Self::Error> {
        (**self).column_names()
    }

    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn scan(&mut self, count: usize) -> Result<Vec<Scalar>, Self::Error> {
        (**self).scan(count)
    }
}

/// In-memory cursor over rows that are already materialized
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    pending: VecDeque<Vec<Scalar>>,
    current: Option<Vec<Scalar>>,
}

impl MemoryCursor {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            pending: VecDeque::new(),
            current: None,
        }
    }

    /// Append a row. Short rows are padded with NULL when scanned.
    pub fn with_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.pending.push_back(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn push_row(&mut self, values: Vec<Scalar>) {
        self.pending.push_back(values);
    }

    /// Rows not yet advanced over
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Cursor for MemoryCursor {
    type Error = Infallible;

    fn column_names(&mut self) -> Result<Vec<String>, Self::Error> {
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> bool {
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    fn scan(&mut self, count: usize) -> Result<Vec<Scalar>, Self::Error> {
        let mut values = self.current.clone().unwrap_or_default();
        values.resize(count, Scalar::Null);
        Ok(values)
    }
}
