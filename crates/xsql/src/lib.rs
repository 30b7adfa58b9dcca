//! # xsql: typed hydration of untyped result sets
//!
//! Drains a query cursor into NULL-omitting row snapshots and maps them onto
//! application records through tagged fields:
//!
//! ```ignore
//! #[derive(Debug, Default, xsql::Record)]
//! struct User {
//!     #[xsql("id")]
//!     id: i64,
//!     #[xsql("name")]
//!     name: String,
//!     #[xsql("-")]
//!     cache_key: String,
//! }
//!
//! let users: Vec<User> = Fetcher::new(cursor).all()?;
//! ```
//!
//! Column values are coerced best-effort: a value that cannot be read as the
//! field's type falls back to that type's default instead of failing the row.

pub mod backends;
pub mod coerce;
pub mod config;
pub mod cursor;
pub mod error;
pub mod fetcher;
pub mod record;
pub mod row;
pub mod value;

pub use coerce::{zero_timestamp, TypedValue};
pub use config::{CoercionConfig, TimeZoneSetting, DEFAULT_TIME_LAYOUT};
pub use cursor::{Cursor, MemoryCursor};
pub use error::{ConfigError, CursorError, FetchError, FetchResult};
pub use fetcher::Fetcher;
pub use record::{map_row, Coerce, FieldDescriptor, FieldSetter, FieldTag, Record, RecordDescriptor};
pub use row::{collect_rows, Row};
pub use value::Scalar;

#[cfg(feature = "derive")]
pub use xsql_derive::Record;
