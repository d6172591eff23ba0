//! Engine configuration.

use crate::query::ResultBudget;

/// Configuration for a [`QueryEngine`](crate::QueryEngine).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Row ceilings applied to every query.
    pub budget: ResultBudget,
}

impl EngineConfig {
    /// Create a configuration with the default 5000-row ceilings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom budget.
    pub fn with_budget(mut self, budget: ResultBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Set the ceiling on result rows, leaving the group ceiling unchanged.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.budget.max_rows = max_rows;
        self
    }
}
