//! Per-query dataset context.

use crate::catalog::{fields_for, DatasetKind, FieldClass, FieldSchema, FIELD_SEPARATOR};
use crate::error::{Error, Result};

/// The dataset a query runs against, fixed once resolution succeeds.
///
/// Every qualified field reference in the query is checked against this
/// context: the prefix must be the dataset id and the bare field must belong
/// to the dataset's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    dataset_id: String,
    kind: DatasetKind,
    schema: FieldSchema,
}

impl QueryContext {
    /// Create a context for a dataset of the given kind.
    pub fn new(dataset_id: impl Into<String>, kind: DatasetKind) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            kind,
            schema: fields_for(kind),
        }
    }

    /// Id of the resolved dataset.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Kind of the resolved dataset.
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Schema of the resolved dataset.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Resolve a qualified reference to its bare field name and class.
    pub fn field<'q>(&self, qualified: &'q str) -> Result<(&'q str, FieldClass)> {
        let (prefix, field) = qualified.split_once(FIELD_SEPARATOR).ok_or_else(|| {
            Error::semantic(format!("'{}' is not a qualified field", qualified))
        })?;

        if prefix != self.dataset_id {
            return Err(Error::semantic(format!(
                "'{}' references dataset '{}' but the query runs on '{}'",
                qualified, prefix, self.dataset_id
            )));
        }

        let class = self.schema.class_of(field).ok_or_else(|| {
            Error::semantic(format!("'{}' has no field '{}'", self.kind, field))
        })?;

        Ok((field, class))
    }

    /// Resolve a qualified reference that must name a numeric field.
    pub fn numeric_field<'q>(&self, qualified: &'q str) -> Result<&'q str> {
        match self.field(qualified)? {
            (field, FieldClass::Numeric) => Ok(field),
            (_, FieldClass::String) => Err(Error::semantic(format!(
                "'{}' is not a numeric field",
                qualified
            ))),
        }
    }

    /// Resolve a qualified reference that must name a string field.
    pub fn string_field<'q>(&self, qualified: &'q str) -> Result<&'q str> {
        match self.field(qualified)? {
            (field, FieldClass::String) => Ok(field),
            (_, FieldClass::Numeric) => Err(Error::semantic(format!(
                "'{}' is not a string field",
                qualified
            ))),
        }
    }
}
