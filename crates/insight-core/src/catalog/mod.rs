//! Field schema registry.
//!
//! Each dataset kind has a fixed schema: a set of numeric fields and a set of
//! string fields. Validity checks throughout the query pipeline go through
//! these values rather than through the row types themselves.

mod kind;
mod schema;

pub use kind::DatasetKind;
pub use schema::{fields_for, is_numeric, is_string, FieldClass, FieldSchema};

/// Separator between a dataset id and a field name in a qualified reference.
pub const FIELD_SEPARATOR: char = '_';
