//! Column projection into result rows.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::aggregate::GroupRecord;
use super::validator::{Column, ColumnSource};
use crate::dataset::{Row, Value};
use crate::error::{Error, Result};

/// One output record: column names and values in COLUMNS order.
///
/// Serializes as a JSON object whose keys follow the column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    fields: Vec<(String, Value)>,
}

impl ResultRow {
    /// Create a row from ordered name/value pairs.
    pub fn from_pairs(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Name/value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the first `len` columns.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.fields.truncate(len);
    }

    fn push(&mut self, name: &str, value: Value) {
        self.fields.push((name.to_string(), value));
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Builds result rows from dataset rows or aggregated groups.
pub struct Projector;

impl Projector {
    /// Project filtered dataset rows.
    pub fn project_rows(
        columns: &[Column],
        rows: &[Row],
        selected: &[usize],
    ) -> Result<Vec<ResultRow>> {
        selected
            .iter()
            .map(|&idx| {
                let row = &rows[idx];
                let mut out = ResultRow::default();
                for column in columns {
                    let value = match &column.source {
                        ColumnSource::Field(field) => Self::field_value(row, field)?,
                        ColumnSource::Aggregate(_) => {
                            return Err(Error::semantic(format!(
                                "'{}' is only available with TRANSFORMATIONS",
                                column.name
                            )));
                        }
                    };
                    out.push(&column.name, value);
                }
                Ok(out)
            })
            .collect()
    }

    /// Project aggregated groups. Field columns read the group's
    /// representative row; aggregate columns read the computed values.
    pub fn project_groups(
        columns: &[Column],
        rows: &[Row],
        groups: &[GroupRecord],
    ) -> Result<Vec<ResultRow>> {
        groups
            .iter()
            .map(|group| {
                let representative = &rows[group.representative];
                let mut out = ResultRow::default();
                for column in columns {
                    let value = match &column.source {
                        ColumnSource::Field(field) => Self::field_value(representative, field)?,
                        ColumnSource::Aggregate(pos) => {
                            group.values.get(*pos).cloned().ok_or_else(|| {
                                Error::semantic(format!("no aggregate for '{}'", column.name))
                            })?
                        }
                    };
                    out.push(&column.name, value);
                }
                Ok(out)
            })
            .collect()
    }

    fn field_value(row: &Row, field: &str) -> Result<Value> {
        row.value(field)
            .ok_or_else(|| Error::semantic(format!("row has no field '{}'", field)))
    }
}
