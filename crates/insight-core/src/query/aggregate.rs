//! GROUP and APPLY evaluation.

use std::collections::{HashMap, HashSet};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::budget::ResultBudget;
use super::validator::{Aggregate, ApplyToken};
use crate::dataset::{Row, Value};
use crate::error::{Error, Result};

/// Decimal places kept by SUM and AVG.
const AGGREGATE_SCALE: u32 = 2;

/// Hashable form of a field value, used for group keys and COUNT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    Number(u64),
    String(String),
    Missing,
}

impl ValueKey {
    fn of(row: &Row, field: &str) -> Self {
        if let Some(n) = row.number(field) {
            // 0.0 and -0.0 compare equal and must land in the same group.
            let n = if n == 0.0 { 0.0 } else { n };
            ValueKey::Number(n.to_bits())
        } else if let Some(s) = row.string(field) {
            ValueKey::String(s.to_string())
        } else {
            ValueKey::Missing
        }
    }
}

/// Rows sharing one group key. Only [`AggregateEngine::group`] builds
/// groups, so every group has at least one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Member row positions in input order; the first is the representative.
    members: Vec<usize>,
}

impl Group {
    /// Member row positions in input order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Position of the group's representative row.
    pub fn representative(&self) -> usize {
        self.members[0]
    }
}

/// One aggregated group: its representative and computed APPLY values.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    /// Position of the representative row.
    pub representative: usize,
    /// Number of rows in the group.
    pub size: usize,
    /// Aggregate values in APPLY order.
    pub values: Vec<Value>,
}

/// Groups filtered rows and computes aggregates.
pub struct AggregateEngine;

impl AggregateEngine {
    /// Partition `selected` by the values of `group_fields`.
    ///
    /// Groups come out in order of first appearance; members keep input order.
    pub fn group(rows: &[Row], selected: &[usize], group_fields: &[String]) -> Vec<Group> {
        let mut index: HashMap<Vec<ValueKey>, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for &idx in selected {
            let key: Vec<ValueKey> = group_fields
                .iter()
                .map(|field| ValueKey::of(&rows[idx], field))
                .collect();

            match index.get(&key) {
                Some(&pos) => groups[pos].members.push(idx),
                None => {
                    index.insert(key, groups.len());
                    groups.push(Group { members: vec![idx] });
                }
            }
        }

        groups
    }

    /// Compute every aggregate for every group.
    ///
    /// Fails with `ResultTooLarge` if any group exceeds the budget's group
    /// ceiling.
    pub fn aggregate(
        rows: &[Row],
        groups: &[Group],
        aggregates: &[Aggregate],
        budget: &ResultBudget,
    ) -> Result<Vec<GroupRecord>> {
        let mut records = Vec::with_capacity(groups.len());

        for group in groups {
            budget.check_group(group.members.len())?;

            let values = aggregates
                .iter()
                .map(|agg| Self::compute(rows, &group.members, agg))
                .collect::<Result<Vec<_>>>()?;

            records.push(GroupRecord {
                representative: group.representative(),
                size: group.members.len(),
                values,
            });
        }

        debug!(
            groups = records.len(),
            aggregates = aggregates.len(),
            "Computed aggregates"
        );
        Ok(records)
    }

    /// Compute one aggregate over a group's members.
    pub fn compute(rows: &[Row], members: &[usize], agg: &Aggregate) -> Result<Value> {
        let field = agg.field.as_str();

        let value = match agg.token {
            ApplyToken::Count => {
                let distinct: HashSet<ValueKey> = members
                    .iter()
                    .map(|&idx| ValueKey::of(&rows[idx], field))
                    .collect();
                distinct.len() as f64
            }
            ApplyToken::Max => Self::numbers(rows, members, field)
                .fold(f64::NEG_INFINITY, f64::max),
            ApplyToken::Min => Self::numbers(rows, members, field)
                .fold(f64::INFINITY, f64::min),
            ApplyToken::Sum => {
                let total = Self::decimal_sum(rows, members, field)?;
                Self::rounded(total)?
            }
            ApplyToken::Avg => {
                let total = Self::decimal_sum(rows, members, field)?;
                let mean = total
                    .checked_div(Decimal::from(members.len()))
                    .ok_or_else(|| Self::overflow(agg))?;
                Self::rounded(mean)?
            }
        };

        Ok(Value::Number(value))
    }

    fn numbers<'r>(
        rows: &'r [Row],
        members: &'r [usize],
        field: &'r str,
    ) -> impl Iterator<Item = f64> + 'r {
        members.iter().filter_map(move |&idx| rows[idx].number(field))
    }

    fn decimal_sum(rows: &[Row], members: &[usize], field: &str) -> Result<Decimal> {
        Self::numbers(rows, members, field).try_fold(Decimal::ZERO, |acc, n| {
            let n = Decimal::from_f64(n).ok_or_else(|| {
                Error::semantic(format!("value {} of '{}' is not a finite decimal", n, field))
            })?;
            acc.checked_add(n)
                .ok_or_else(|| Error::semantic(format!("sum of '{}' overflows", field)))
        })
    }

    /// Round to two places and convert through the decimal text, so the
    /// result is the f64 nearest to the rounded decimal.
    fn rounded(value: Decimal) -> Result<f64> {
        value
            .round_dp_with_strategy(AGGREGATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
            .parse::<f64>()
            .map_err(|e| Error::semantic(format!("aggregate {} is out of range: {}", value, e)))
    }

    fn overflow(agg: &Aggregate) -> Error {
        Error::semantic(format!("{} of '{}' overflows", agg.token, agg.field))
    }
}
