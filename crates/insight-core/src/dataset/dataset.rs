//! Named, kind-typed datasets.

use std::sync::Arc;

use serde::Serialize;

use super::row::Row;
use crate::catalog::{DatasetKind, FIELD_SEPARATOR};
use crate::error::{Error, Result};

/// Summary of a dataset held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub id: String,
    pub kind: DatasetKind,
    pub num_rows: usize,
}

/// An immutable dataset: an id, a kind, and rows of that kind.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: String,
    kind: DatasetKind,
    rows: Arc<[Row]>,
}

impl Dataset {
    /// Create a dataset, validating its id and that every row matches `kind`.
    pub fn new(id: impl Into<String>, kind: DatasetKind, rows: Vec<Row>) -> Result<Self> {
        let id = id.into();
        validate_id(&id)?;

        if let Some(pos) = rows.iter().position(|row| row.kind() != kind) {
            return Err(Error::InvalidDataset(format!(
                "row {} of dataset '{}' is not a {} row",
                pos, id, kind
            )));
        }

        Ok(Self {
            id,
            kind,
            rows: rows.into(),
        })
    }

    /// Dataset id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dataset kind.
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Shared handle to the rows.
    pub fn rows(&self) -> Arc<[Row]> {
        Arc::clone(&self.rows)
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Summary of this dataset.
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            kind: self.kind,
            num_rows: self.rows.len(),
        }
    }
}

/// Check that `id` is usable as a dataset id.
///
/// Ids must be non-empty, not whitespace-only, and must not contain the
/// qualifier separator, since `<id>_<field>` has to split unambiguously.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidDataset("dataset id is empty".into()));
    }
    if id.trim().is_empty() {
        return Err(Error::InvalidDataset(
            "dataset id is only whitespace".into(),
        ));
    }
    if id.contains(FIELD_SEPARATOR) {
        return Err(Error::InvalidDataset(format!(
            "dataset id '{}' contains '{}'",
            id, FIELD_SEPARATOR
        )));
    }
    Ok(())
}
