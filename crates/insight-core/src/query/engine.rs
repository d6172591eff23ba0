//! Query execution entry point.

use serde_json::Value as Json;
use tracing::{debug, instrument};

use super::aggregate::AggregateEngine;
use super::ast::Query;
use super::budget::ResultBudget;
use super::filter::FilterEvaluator;
use super::parser::{parse_query, parse_query_str};
use super::projection::{Projector, ResultRow};
use super::resolver;
use super::sort::ResultSorter;
use super::validator::QueryPlan;
use crate::config::EngineConfig;
use crate::dataset::{DatasetStore, Row};
use crate::error::Result;

/// Runs query documents against a dataset store.
///
/// The engine holds no per-query state; one engine may serve concurrent
/// queries.
pub struct QueryEngine<'a, S: DatasetStore + ?Sized> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: DatasetStore + ?Sized> QueryEngine<'a, S> {
    /// Create an engine with the default configuration.
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute a query document.
    ///
    /// The document is validated structurally, its dataset resolved, and the
    /// query checked against that dataset's schema before any row is read.
    #[instrument(skip_all)]
    pub async fn execute(&self, document: &Json) -> Result<Vec<ResultRow>> {
        let query = parse_query(document)?;
        self.run(&query).await
    }

    /// Execute a query given as JSON text.
    #[instrument(skip_all)]
    pub async fn execute_str(&self, text: &str) -> Result<Vec<ResultRow>> {
        let query = parse_query_str(text)?;
        self.run(&query).await
    }

    async fn run(&self, query: &Query) -> Result<Vec<ResultRow>> {
        let context = resolver::resolve(query, self.store)?;
        let plan = QueryPlan::build(query, context)?;

        let rows = self.store.get_rows(plan.context.dataset_id()).await?;
        evaluate(&plan, &rows, &self.config.budget)
    }
}

/// Evaluate a checked plan over a dataset's rows.
///
/// Synchronous and side-effect free.
pub fn evaluate(plan: &QueryPlan, rows: &[Row], budget: &ResultBudget) -> Result<Vec<ResultRow>> {
    let dataset = plan.context.dataset_id();

    let selected = FilterEvaluator::evaluate_all(&plan.filter, rows, &plan.context)?;
    debug!(dataset = %dataset, rows = rows.len(), matched = selected.len(), "Filtered rows");

    let mut results = match &plan.transformations {
        None => {
            budget.check_rows(selected.len())?;
            Projector::project_rows(&plan.columns, rows, &selected)?
        }
        Some(group_plan) => {
            let groups = AggregateEngine::group(rows, &selected, &group_plan.group_fields);
            let records =
                AggregateEngine::aggregate(rows, &groups, &group_plan.aggregates, budget)?;
            budget.check_rows(records.len())?;
            if plan.sort_only.is_empty() {
                Projector::project_groups(&plan.columns, rows, &records)?
            } else {
                let columns: Vec<_> =
                    plan.columns.iter().chain(&plan.sort_only).cloned().collect();
                Projector::project_groups(&columns, rows, &records)?
            }
        }
    };

    if let Some(order) = &plan.order {
        ResultSorter::sort(&mut results, order);
    }

    if !plan.sort_only.is_empty() {
        for row in &mut results {
            row.truncate(plan.columns.len());
        }
    }

    debug!(dataset = %dataset, results = results.len(), "Query evaluated");
    Ok(results)
}
