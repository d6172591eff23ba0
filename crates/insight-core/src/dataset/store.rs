//! Dataset store interface and the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use super::dataset::{validate_id, Dataset, DatasetInfo};
use super::row::Row;
use crate::error::{Error, Result};

/// Source of datasets for the query engine.
///
/// The engine resolves a dataset once per query and awaits its rows once
/// before evaluation starts. Rows handed out must not change for the duration
/// of a query.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Look up a dataset's id, kind, and row count.
    fn resolve(&self, id: &str) -> Result<DatasetInfo>;

    /// Fetch a dataset's rows in stored order.
    async fn get_rows(&self, id: &str) -> Result<Arc<[Row]>>;
}

/// Concurrent in-memory dataset store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    datasets: DashMap<String, Arc<Dataset>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset, returning the ids of all datasets now in the store.
    ///
    /// Fails if the id is already taken.
    pub fn add_dataset(&self, dataset: Dataset) -> Result<Vec<String>> {
        match self.datasets.entry(dataset.id().to_string()) {
            Entry::Occupied(entry) => {
                return Err(Error::InvalidDataset(format!(
                    "dataset id '{}' is already taken",
                    entry.key()
                )));
            }
            Entry::Vacant(entry) => {
                info!(
                    dataset = dataset.id(),
                    kind = %dataset.kind(),
                    rows = dataset.num_rows(),
                    "Dataset added"
                );
                entry.insert(Arc::new(dataset));
            }
        }
        Ok(self.ids())
    }

    /// Remove a dataset, returning its id.
    pub fn remove_dataset(&self, id: &str) -> Result<String> {
        validate_id(id)?;
        match self.datasets.remove(id) {
            Some((id, _)) => {
                info!(dataset = %id, "Dataset removed");
                Ok(id)
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    /// Summaries of every dataset, ordered by id.
    pub fn list_datasets(&self) -> Vec<DatasetInfo> {
        let mut infos: Vec<DatasetInfo> = self
            .datasets
            .iter()
            .map(|entry| entry.value().info())
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Get a dataset by id.
    pub fn get(&self, id: &str) -> Option<Arc<Dataset>> {
        self.datasets.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of datasets in the store.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Check if the store holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.datasets.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DatasetStore for InMemoryStore {
    fn resolve(&self, id: &str) -> Result<DatasetInfo> {
        self.get(id)
            .map(|dataset| dataset.info())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn get_rows(&self, id: &str) -> Result<Arc<[Row]>> {
        let dataset = self.get(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        debug!(dataset = id, rows = dataset.num_rows(), "Fetched dataset rows");
        Ok(dataset.rows())
    }
}
