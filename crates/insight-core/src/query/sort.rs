//! Stable multi-key ordering of result rows.

use std::cmp::Ordering;
use std::str::FromStr;

use super::projection::ResultRow;
use crate::error::{Error, Result};

/// Sort direction shared by every ORDER key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending.
    #[default]
    Up,
    /// Descending.
    Down,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(Error::semantic(format!(
                "unknown ORDER direction '{}'",
                other
            ))),
        }
    }
}

/// Checked ORDER: output column names compared in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub keys: Vec<String>,
    pub direction: Direction,
}

/// Sorts projected rows.
pub struct ResultSorter;

impl ResultSorter {
    /// Sort rows in place. The sort is stable: rows that compare equal on
    /// every key keep their relative order, in both directions.
    pub fn sort(rows: &mut [ResultRow], spec: &SortSpec) {
        if spec.keys.is_empty() {
            return;
        }

        rows.sort_by(|a, b| {
            for key in &spec.keys {
                let cmp = match (a.get(key), b.get(key)) {
                    (Some(av), Some(bv)) => av.sort_cmp(bv),
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                };

                let cmp = match spec.direction {
                    Direction::Up => cmp,
                    Direction::Down => cmp.reverse(),
                };

                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn row(dept: &str, avg: f64, tag: &str) -> ResultRow {
        ResultRow::from_pairs(vec![
            ("sections_dept".to_string(), Value::from(dept)),
            ("sections_avg".to_string(), Value::Number(avg)),
            ("sections_id".to_string(), Value::from(tag)),
        ])
    }

    fn tags(rows: &[ResultRow]) -> Vec<String> {
        rows.iter()
            .map(|r| r.get("sections_id").and_then(Value::as_str).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert!("down".parse::<Direction>().is_err());
        assert!("SIDEWAYS".parse::<Direction>().is_err());
    }

    #[test]
    fn test_single_key_stable() {
        let mut rows = vec![
            row("cpsc", 80.0, "a"),
            row("math", 70.0, "b"),
            row("adhe", 80.0, "c"),
            row("biol", 70.0, "d"),
        ];
        ResultSorter::sort(
            &mut rows,
            &SortSpec {
                keys: vec!["sections_avg".into()],
                direction: Direction::Up,
            },
        );
        assert_eq!(tags(&rows), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_descending_keeps_ties_in_input_order() {
        let mut rows = vec![
            row("cpsc", 80.0, "a"),
            row("math", 70.0, "b"),
            row("adhe", 80.0, "c"),
        ];
        ResultSorter::sort(
            &mut rows,
            &SortSpec {
                keys: vec!["sections_avg".into()],
                direction: Direction::Down,
            },
        );
        assert_eq!(tags(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_multi_key() {
        let mut rows = vec![
            row("math", 70.0, "a"),
            row("cpsc", 90.0, "b"),
            row("cpsc", 70.0, "c"),
            row("math", 90.0, "d"),
        ];
        ResultSorter::sort(
            &mut rows,
            &SortSpec {
                keys: vec!["sections_dept".into(), "sections_avg".into()],
                direction: Direction::Down,
            },
        );
        assert_eq!(tags(&rows), vec!["d", "a", "b", "c"]);
    }
}
