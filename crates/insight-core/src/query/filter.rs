//! WHERE evaluation.
//!
//! The evaluator works on row positions rather than rows: each node takes the
//! positions it is allowed to consider and returns the subset that matches, in
//! input order. Positions are stable identities, so OR can union its
//! children's results without comparing field values, and NOT is the
//! complement within whatever set it was handed.

use std::collections::HashSet;

use super::ast::{FilterNode, LogicOp};
use super::context::QueryContext;
use crate::dataset::Row;
use crate::error::{Error, Result};

const WILDCARD: char = '*';

/// A parsed IS pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl StringPattern {
    /// Parse an IS pattern. `*` is allowed only as the first and/or last
    /// character.
    pub fn parse(pattern: &str) -> Result<Self> {
        let leading = pattern.starts_with(WILDCARD);
        let trailing = pattern.len() > 1 && pattern.ends_with(WILDCARD);

        let start = usize::from(leading);
        let end = pattern.len() - usize::from(trailing);
        let inner = &pattern[start..end.max(start)];

        if inner.contains(WILDCARD) {
            return Err(Error::semantic(format!(
                "unsupported wildcard pattern '{}'",
                pattern
            )));
        }

        let inner = inner.to_string();
        Ok(match (leading, trailing) {
            (false, false) => StringPattern::Exact(inner),
            (true, false) => StringPattern::Suffix(inner),
            (false, true) => StringPattern::Prefix(inner),
            (true, true) => StringPattern::Contains(inner),
        })
    }

    /// Check a value against the pattern.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringPattern::Exact(s) => value == s,
            StringPattern::Prefix(s) => value.starts_with(s.as_str()),
            StringPattern::Suffix(s) => value.ends_with(s.as_str()),
            StringPattern::Contains(s) => value.contains(s.as_str()),
        }
    }
}

/// Evaluates WHERE trees against dataset rows.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Check every leaf of `node` against the schema without touching rows.
    pub fn validate(node: &FilterNode, ctx: &QueryContext) -> Result<()> {
        match node {
            FilterNode::All => Ok(()),
            FilterNode::Logic { children, .. } => children
                .iter()
                .try_for_each(|child| Self::validate(child, ctx)),
            FilterNode::Compare { field, .. } => ctx.numeric_field(field).map(|_| ()),
            FilterNode::Match { field, pattern } => {
                ctx.string_field(field)?;
                StringPattern::parse(pattern).map(|_| ())
            }
            FilterNode::Not(child) => Self::validate(child, ctx),
        }
    }

    /// Evaluate `node` over the rows at positions `input`.
    ///
    /// Returns the matching positions in the order they appear in `input`.
    pub fn evaluate(
        node: &FilterNode,
        rows: &[Row],
        input: &[usize],
        ctx: &QueryContext,
    ) -> Result<Vec<usize>> {
        match node {
            FilterNode::All => Ok(input.to_vec()),

            FilterNode::Logic {
                op: LogicOp::And,
                children,
            } => {
                let mut current = input.to_vec();
                for child in children {
                    current = Self::evaluate(child, rows, &current, ctx)?;
                }
                Ok(current)
            }

            FilterNode::Logic {
                op: LogicOp::Or,
                children,
            } => {
                let mut matched = HashSet::new();
                for child in children {
                    matched.extend(Self::evaluate(child, rows, input, ctx)?);
                }
                Ok(input
                    .iter()
                    .copied()
                    .filter(|idx| matched.contains(idx))
                    .collect())
            }

            FilterNode::Compare { op, field, value } => {
                let field = ctx.numeric_field(field)?;
                Ok(input
                    .iter()
                    .copied()
                    .filter(|&idx| {
                        rows[idx]
                            .number(field)
                            .is_some_and(|actual| op.compare(actual, *value))
                    })
                    .collect())
            }

            FilterNode::Match { field, pattern } => {
                let field = ctx.string_field(field)?;
                let pattern = StringPattern::parse(pattern)?;
                Ok(input
                    .iter()
                    .copied()
                    .filter(|&idx| rows[idx].string(field).is_some_and(|s| pattern.matches(s)))
                    .collect())
            }

            FilterNode::Not(child) => {
                let excluded: HashSet<usize> =
                    Self::evaluate(child, rows, input, ctx)?.into_iter().collect();
                Ok(input
                    .iter()
                    .copied()
                    .filter(|idx| !excluded.contains(idx))
                    .collect())
            }
        }
    }

    /// Evaluate `node` over every row of a dataset.
    pub fn evaluate_all(node: &FilterNode, rows: &[Row], ctx: &QueryContext) -> Result<Vec<usize>> {
        let input: Vec<usize> = (0..rows.len()).collect();
        Self::evaluate(node, rows, &input, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DatasetKind;
    use crate::dataset::Section;
    use crate::error::ErrorKind;
    use crate::query::ast::Comparator;

    fn section(dept: &str, avg: f64) -> Row {
        Row::Section(Section {
            uuid: format!("{}-{}", dept, avg),
            id: "100".into(),
            title: "course".into(),
            instructor: "smith, jane".into(),
            dept: dept.into(),
            year: 2015.0,
            avg,
            pass: 20.0,
            fail: 2.0,
            audit: 0.0,
        })
    }

    fn rows() -> Vec<Row> {
        vec![
            section("cpsc", 95.0),
            section("math", 70.0),
            section("cpsc", 60.0),
            section("adhe", 92.0),
            section("psyc", 85.0),
        ]
    }

    fn ctx() -> QueryContext {
        QueryContext::new("sections", DatasetKind::Sections)
    }

    fn run(node: &FilterNode) -> Vec<usize> {
        FilterEvaluator::evaluate_all(node, &rows(), &ctx()).unwrap()
    }

    fn gt(v: f64) -> FilterNode {
        FilterNode::compare(Comparator::Gt, "sections_avg", v)
    }

    fn dept(pattern: &str) -> FilterNode {
        FilterNode::is("sections_dept", pattern)
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(StringPattern::parse("abc").unwrap(), StringPattern::Exact("abc".into()));
        assert_eq!(StringPattern::parse("*abc").unwrap(), StringPattern::Suffix("abc".into()));
        assert_eq!(StringPattern::parse("abc*").unwrap(), StringPattern::Prefix("abc".into()));
        assert_eq!(StringPattern::parse("*abc*").unwrap(), StringPattern::Contains("abc".into()));
        assert_eq!(StringPattern::parse("").unwrap(), StringPattern::Exact(String::new()));
        assert_eq!(StringPattern::parse("*").unwrap(), StringPattern::Suffix(String::new()));
        assert_eq!(StringPattern::parse("**").unwrap(), StringPattern::Contains(String::new()));

        for bad in ["a*b", "**a", "a**", "*a*b*", "***"] {
            let err = StringPattern::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Semantic, "{}", bad);
        }
    }

    #[test]
    fn test_all() {
        assert_eq!(run(&FilterNode::All), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_compare() {
        assert_eq!(run(&gt(90.0)), vec![0, 3]);
        assert_eq!(
            run(&FilterNode::compare(Comparator::Lt, "sections_avg", 70.0)),
            vec![2]
        );
        assert_eq!(
            run(&FilterNode::compare(Comparator::Eq, "sections_avg", 70.0)),
            vec![1]
        );
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(run(&dept("cpsc")), vec![0, 2]);
        assert_eq!(run(&dept("cp*")), vec![0, 2]);
        assert_eq!(run(&dept("*sc")), vec![0, 2]);
        assert_eq!(run(&dept("*s*")), vec![0, 2, 4]);
        assert_eq!(run(&dept("*")), vec![0, 1, 2, 3, 4]);
        assert!(run(&dept("CPSC")).is_empty());
    }

    #[test]
    fn test_and_narrows() {
        assert_eq!(run(&FilterNode::and(vec![gt(80.0), dept("cpsc")])), vec![0]);
    }

    #[test]
    fn test_or_dedupes_and_keeps_input_order() {
        // Row 0 matches both children and must appear once.
        let node = FilterNode::or(vec![dept("psyc"), gt(90.0), dept("cpsc")]);
        assert_eq!(run(&node), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_or_keeps_rows_with_equal_values() {
        let rows = vec![section("cpsc", 95.0), section("cpsc", 95.0)];
        let node = FilterNode::or(vec![dept("cpsc"), gt(90.0)]);
        assert_eq!(
            FilterEvaluator::evaluate_all(&node, &rows, &ctx()).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_not_is_scoped_to_current_input() {
        assert_eq!(run(&FilterNode::not(gt(90.0))), vec![1, 2, 4]);

        // Inside AND, NOT only sees rows the earlier children kept.
        let node = FilterNode::and(vec![dept("cpsc"), FilterNode::not(gt(90.0))]);
        assert_eq!(run(&node), vec![2]);

        assert_eq!(run(&FilterNode::not(FilterNode::not(dept("math")))), vec![1]);
    }

    #[test]
    fn test_validate() {
        let ctx = ctx();
        assert!(FilterEvaluator::validate(&gt(1.0), &ctx).is_ok());
        assert!(FilterEvaluator::validate(
            &FilterNode::compare(Comparator::Gt, "sections_dept", 1.0),
            &ctx
        )
        .is_err());
        assert!(FilterEvaluator::validate(&FilterNode::is("sections_avg", "x"), &ctx).is_err());
        assert!(FilterEvaluator::validate(
            &FilterNode::and(vec![gt(1.0), FilterNode::not(dept("a*b"))]),
            &ctx
        )
        .is_err());
    }
}
