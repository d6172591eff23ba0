//! Insight Core - Field schemas, dataset store, and query execution.
//!
//! This crate evaluates JSON query documents (`WHERE`, `OPTIONS`,
//! `TRANSFORMATIONS`) against named, schema-typed, in-memory datasets of
//! course sections or campus rooms.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod query;

pub use catalog::{fields_for, is_numeric, is_string, DatasetKind, FieldClass, FieldSchema};
pub use config::EngineConfig;
pub use dataset::{
    Dataset, DatasetInfo, DatasetStore, InMemoryStore, Room, Row, Section, Value,
};
pub use error::{Error, ErrorKind, Result};
pub use query::{QueryContext, QueryEngine, ResultBudget, ResultRow};
