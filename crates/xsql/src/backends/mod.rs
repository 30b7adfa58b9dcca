//! Cursor adapters for concrete database drivers

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PgRowsCursor;
