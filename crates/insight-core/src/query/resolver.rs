//! Resolution of the dataset a query targets.

use tracing::debug;

use super::ast::Query;
use super::context::QueryContext;
use crate::catalog::FIELD_SEPARATOR;
use crate::dataset::DatasetStore;
use crate::error::{Error, Result};

/// Derive the single dataset a query references and look it up.
///
/// Every reference containing the separator is treated as qualified and
/// contributes its prefix. Unqualified references (apply keys) are skipped
/// here and checked by the validator.
pub fn resolve<S>(query: &Query, store: &S) -> Result<QueryContext>
where
    S: DatasetStore + ?Sized,
{
    let dataset_id = dataset_id(query)?;
    let info = store.resolve(dataset_id)?;
    debug!(dataset = %info.id, kind = %info.kind, rows = info.num_rows, "Resolved dataset");
    Ok(QueryContext::new(info.id, info.kind))
}

/// The one dataset id shared by every qualified reference.
pub fn dataset_id(query: &Query) -> Result<&str> {
    let mut found: Option<&str> = None;

    for reference in query.references() {
        let Some((prefix, _)) = reference.split_once(FIELD_SEPARATOR) else {
            continue;
        };
        match found {
            None => found = Some(prefix),
            Some(id) if id == prefix => {}
            Some(id) => {
                return Err(Error::semantic(format!(
                    "query references more than one dataset: '{}' and '{}'",
                    id, prefix
                )));
            }
        }
    }

    found.ok_or_else(|| Error::semantic("query does not reference any dataset"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DatasetKind;
    use crate::dataset::{Dataset, InMemoryStore};
    use crate::error::ErrorKind;
    use crate::query::parser::parse_query;
    use serde_json::json;

    #[test]
    fn test_single_dataset() {
        let query = parse_query(&json!({
            "WHERE": {"GT": {"sections_avg": 90}},
            "OPTIONS": {"COLUMNS": ["sections_dept", "overallAvg"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"overallAvg": {"AVG": "sections_avg"}}]
            }
        }))
        .unwrap();
        assert_eq!(dataset_id(&query).unwrap(), "sections");
    }

    #[test]
    fn test_two_datasets() {
        let query = parse_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "rooms_name"]}
        }))
        .unwrap();
        assert_eq!(dataset_id(&query).unwrap_err().kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_mixed_in_where() {
        let query = parse_query(&json!({
            "WHERE": {"NOT": {"GT": {"rooms_seats": 10}}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .unwrap();
        assert!(dataset_id(&query).is_err());
    }

    #[test]
    fn test_no_qualified_reference() {
        let query = parse_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["dept"]}
        }))
        .unwrap();
        assert_eq!(dataset_id(&query).unwrap_err().kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_resolve_against_store() {
        let store = InMemoryStore::new();
        store
            .add_dataset(Dataset::new("rooms", DatasetKind::Rooms, vec![]).unwrap())
            .unwrap();

        let query = parse_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["rooms_name"]}
        }))
        .unwrap();
        let ctx = resolve(&query, &store).unwrap();
        assert_eq!(ctx.dataset_id(), "rooms");
        assert_eq!(ctx.kind(), DatasetKind::Rooms);

        let missing = parse_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["courses_dept"]}
        }))
        .unwrap();
        assert_eq!(
            resolve(&missing, &store).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
