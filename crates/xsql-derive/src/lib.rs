//! # xsql-derive
//!
//! Derive macros for xsql record mapping.
//!
//! - `#[derive(Record)]`: describe a struct's fields and their source columns
//!   so rows can be hydrated into it

use proc_macro::TokenStream;

mod record;

/// Record derive macro.
///
/// Field attributes:
/// - `#[xsql("column")]` or `#[xsql(column = "column")]`: read the field from
///   `column`
/// - `#[xsql("-")]` or `#[xsql("_")]`: never write the field
///
/// Fields without an attribute are not mapped.
#[proc_macro_derive(Record, attributes(xsql))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::record_impl(input)
}
