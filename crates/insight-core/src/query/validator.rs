//! Semantic validation and planning.
//!
//! Checks a parsed [`Query`] against the resolved dataset's schema and turns
//! it into a [`QueryPlan`] whose field references are bare field names, apply
//! tokens are typed and ORDER is a checked [`SortSpec`]. Nothing past this
//! point needs to re-check names.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::ast::{FilterNode, OrderSpec, Query, Transformations};
use super::context::QueryContext;
use super::filter::FilterEvaluator;
use super::sort::{Direction, SortSpec};
use crate::catalog::{FieldClass, FIELD_SEPARATOR};
use crate::error::{Error, Result};

/// Aggregate function of an APPLY rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyToken {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyToken {
    /// Query keyword for this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyToken::Max => "MAX",
            ApplyToken::Min => "MIN",
            ApplyToken::Avg => "AVG",
            ApplyToken::Count => "COUNT",
            ApplyToken::Sum => "SUM",
        }
    }

    /// Check if the token only accepts numeric fields.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ApplyToken::Count)
    }
}

impl FromStr for ApplyToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MAX" => Ok(ApplyToken::Max),
            "MIN" => Ok(ApplyToken::Min),
            "AVG" => Ok(ApplyToken::Avg),
            "COUNT" => Ok(ApplyToken::Count),
            "SUM" => Ok(ApplyToken::Sum),
            other => Err(Error::semantic(format!("unknown apply token '{}'", other))),
        }
    }
}

impl fmt::Display for ApplyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checked APPLY rule over a bare field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub key: String,
    pub token: ApplyToken,
    pub field: String,
}

/// Checked TRANSFORMATIONS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    /// Bare field names forming the group key, in GROUP order.
    pub group_fields: Vec<String>,
    /// Aggregates in APPLY order.
    pub aggregates: Vec<Aggregate>,
}

/// Where an output column's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// A bare dataset field.
    Field(String),
    /// Index into [`GroupPlan::aggregates`].
    Aggregate(usize),
}

/// An output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Name as written in COLUMNS; used as the output key.
    pub name: String,
    pub source: ColumnSource,
}

/// A query checked against its dataset and ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub context: QueryContext,
    pub filter: FilterNode,
    pub columns: Vec<Column>,
    pub transformations: Option<GroupPlan>,
    pub order: Option<SortSpec>,
    /// APPLY keys ORDER sorts on without projecting them. They are appended
    /// after `columns` during evaluation and dropped once sorted.
    pub sort_only: Vec<Column>,
}

impl QueryPlan {
    /// Validate `query` against `context` and build the plan.
    pub fn build(query: &Query, context: QueryContext) -> Result<Self> {
        FilterEvaluator::validate(&query.filter, &context)?;

        let transformations = query
            .transformations
            .as_ref()
            .map(|t| Self::plan_transformations(t, &context))
            .transpose()?;

        let columns = Self::plan_columns(
            &query.options.columns,
            query.transformations.as_ref(),
            transformations.as_ref(),
            &context,
        )?;

        let (order, sort_only) = match &query.options.order {
            Some(order) => {
                let (spec, sort_only) =
                    Self::plan_order(order, &columns, transformations.as_ref())?;
                (Some(spec), sort_only)
            }
            None => (None, Vec::new()),
        };

        Ok(Self {
            context,
            filter: query.filter.clone(),
            columns,
            transformations,
            order,
            sort_only,
        })
    }

    fn plan_transformations(
        transformations: &Transformations,
        ctx: &QueryContext,
    ) -> Result<GroupPlan> {
        let group_fields = transformations
            .group
            .iter()
            .map(|qualified| ctx.field(qualified).map(|(field, _)| field.to_string()))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut aggregates = Vec::with_capacity(transformations.apply.len());

        for rule in &transformations.apply {
            if rule.key.is_empty() {
                return Err(Error::semantic("apply key must not be empty"));
            }
            if rule.key.contains(FIELD_SEPARATOR) {
                return Err(Error::semantic(format!(
                    "apply key '{}' must not contain '{}'",
                    rule.key, FIELD_SEPARATOR
                )));
            }
            if !seen.insert(rule.key.as_str()) {
                return Err(Error::semantic(format!(
                    "duplicate apply key '{}'",
                    rule.key
                )));
            }

            let token: ApplyToken = rule.token.parse()?;
            let (field, class) = ctx.field(&rule.field)?;
            if token.requires_numeric() && class != FieldClass::Numeric {
                return Err(Error::semantic(format!(
                    "{} of '{}' requires a numeric field",
                    token, rule.field
                )));
            }

            aggregates.push(Aggregate {
                key: rule.key.clone(),
                token,
                field: field.to_string(),
            });
        }

        Ok(GroupPlan {
            group_fields,
            aggregates,
        })
    }

    fn plan_columns(
        names: &[String],
        written: Option<&Transformations>,
        planned: Option<&GroupPlan>,
        ctx: &QueryContext,
    ) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = Vec::with_capacity(names.len());

        for name in names {
            // Repeated columns collapse onto the first occurrence.
            if columns.iter().any(|c| &c.name == name) {
                continue;
            }

            let source = match (written, planned) {
                (Some(written), Some(planned)) => {
                    if let Some(pos) = planned.aggregates.iter().position(|a| &a.key == name) {
                        ColumnSource::Aggregate(pos)
                    } else if written.group.contains(name) {
                        let (field, _) = ctx.field(name)?;
                        ColumnSource::Field(field.to_string())
                    } else {
                        return Err(Error::semantic(format!(
                            "column '{}' must be a GROUP field or an APPLY key",
                            name
                        )));
                    }
                }
                _ => {
                    let (field, _) = ctx.field(name)?;
                    ColumnSource::Field(field.to_string())
                }
            };

            columns.push(Column {
                name: name.clone(),
                source,
            });
        }

        Ok(columns)
    }

    /// Check ORDER keys. The single-key form must name a column; the object
    /// form may also name an APPLY key that COLUMNS leaves out.
    fn plan_order(
        order: &OrderSpec,
        columns: &[Column],
        group_plan: Option<&GroupPlan>,
    ) -> Result<(SortSpec, Vec<Column>)> {
        let direction = match order {
            OrderSpec::Field(_) => Direction::Up,
            OrderSpec::Keys { dir, .. } => dir.parse()?,
        };

        let mut sort_only: Vec<Column> = Vec::new();
        let mut keys = Vec::new();

        for key in order.keys() {
            if columns.iter().any(|c| c.name == key) {
                keys.push(key.to_string());
                continue;
            }

            let aggregate = match (order, group_plan) {
                (OrderSpec::Keys { .. }, Some(group_plan)) => {
                    group_plan.aggregates.iter().position(|a| a.key == key)
                }
                _ => None,
            };

            match aggregate {
                Some(pos) => {
                    if !sort_only.iter().any(|c| c.name == key) {
                        sort_only.push(Column {
                            name: key.to_string(),
                            source: ColumnSource::Aggregate(pos),
                        });
                    }
                    keys.push(key.to_string());
                }
                None => {
                    return Err(Error::semantic(format!(
                        "ORDER key '{}' is not in COLUMNS or APPLY",
                        key
                    )));
                }
            }
        }

        Ok((SortSpec { keys, direction }, sort_only))
    }
}
