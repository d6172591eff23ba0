//! Datasets, rows, and the dataset store.

mod dataset;
mod row;
mod store;
mod value;

pub use dataset::{validate_id, Dataset, DatasetInfo};
pub use row::{Room, Row, Section, OVERALL_SECTION_YEAR};
pub use store::{DatasetStore, InMemoryStore};
pub use value::Value;
