//! Result size ceilings.

use crate::error::{Error, Result};

/// Default ceiling on returned rows and on rows per group.
pub const DEFAULT_MAX_ROWS: usize = 5000;

/// Row-count limits enforced during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultBudget {
    /// Maximum rows in a result: filtered rows, or groups after transformation.
    pub max_rows: usize,
    /// Maximum rows in a single group.
    pub max_group_rows: usize,
}

impl Default for ResultBudget {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_group_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl ResultBudget {
    /// Create a budget with custom limits.
    pub fn new(max_rows: usize, max_group_rows: usize) -> Self {
        Self {
            max_rows,
            max_group_rows,
        }
    }

    /// Create an unlimited budget (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_rows: usize::MAX,
            max_group_rows: usize::MAX,
        }
    }

    /// Check a result row count.
    pub fn check_rows(&self, count: usize) -> Result<()> {
        Self::check(count, self.max_rows)
    }

    /// Check the row count of one group.
    pub fn check_group(&self, count: usize) -> Result<()> {
        Self::check(count, self.max_group_rows)
    }

    fn check(count: usize, limit: usize) -> Result<()> {
        if count > limit {
            return Err(Error::ResultTooLarge { count, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        let budget = ResultBudget::default();
        assert!(budget.check_rows(5000).is_ok());
        assert_eq!(
            budget.check_rows(5001),
            Err(Error::ResultTooLarge {
                count: 5001,
                limit: 5000
            })
        );
        assert!(budget.check_group(5000).is_ok());
        assert!(budget.check_group(5001).is_err());
    }

    #[test]
    fn test_custom_and_unlimited() {
        let budget = ResultBudget::new(2, 10);
        assert!(budget.check_rows(3).is_err());
        assert!(budget.check_group(3).is_ok());

        let unlimited = ResultBudget::unlimited();
        assert!(unlimited.check_rows(1_000_000).is_ok());
    }
}
