//! Dataset file loading.
//!
//! A dataset file is a JSON object with the dataset kind and its rows:
//!
//! ```json
//! {"kind": "rooms", "rows": [{"fullname": "...", "seats": 120, ...}]}
//! ```
//!
//! Section rows may carry `"overall": true`, which pins their year to 1900.

use std::path::Path;

use insight_core::{Dataset, DatasetKind, InMemoryStore, Room, Row, Section};
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::info;

use crate::config::DatasetSpec;
use crate::error::{CliError, Result};

#[derive(Debug, Deserialize)]
struct DatasetFile {
    kind: DatasetKind,
    rows: Vec<Json>,
}

/// Load one dataset file under the given id.
pub fn load_dataset(id: &str, path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let file: DatasetFile = serde_json::from_str(&text)?;

    let rows = file
        .rows
        .into_iter()
        .enumerate()
        .map(|(pos, row)| {
            parse_row(file.kind, row).map_err(|e| {
                CliError::Config(format!(
                    "{}: row {} is not a valid {} row: {}",
                    path.display(),
                    pos,
                    file.kind,
                    e
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(id, file.kind, rows)?)
}

fn parse_row(kind: DatasetKind, row: Json) -> serde_json::Result<Row> {
    match kind {
        DatasetKind::Sections => serde_json::from_value::<Section>(row).map(Row::from),
        DatasetKind::Rooms => serde_json::from_value::<Room>(row).map(Row::from),
    }
}

/// Load every dataset into the store, in order.
pub fn load_all(store: &InMemoryStore, specs: &[DatasetSpec]) -> Result<()> {
    for spec in specs {
        let dataset = load_dataset(&spec.id, &spec.path)?;
        info!(
            dataset = %spec.id,
            path = %spec.path.display(),
            rows = dataset.num_rows(),
            "loaded dataset file"
        );
        store.add_dataset(dataset)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::ErrorKind;
    use serde_json::json;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, name: &str, content: &Json) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content.to_string()).unwrap();
        path
    }

    fn section_rows() -> Json {
        json!({
            "kind": "sections",
            "rows": [
                {
                    "uuid": "1", "id": "310", "title": "sw eng", "instructor": "holmes",
                    "dept": "cpsc", "year": 2015, "avg": 80.5, "pass": 100, "fail": 2, "audit": 0
                },
                {
                    "uuid": "2", "id": "310", "title": "sw eng", "instructor": "",
                    "dept": "cpsc", "year": 2015, "avg": 81, "pass": 300, "fail": 9, "audit": 1,
                    "overall": true
                }
            ]
        })
    }

    #[test]
    fn test_load_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "sections.json", &section_rows());

        let dataset = load_dataset("sections", &path).unwrap();
        assert_eq!(dataset.kind(), DatasetKind::Sections);
        assert_eq!(dataset.num_rows(), 2);

        let rows = dataset.rows();
        assert_eq!(rows[0].number("year"), Some(2015.0));
        assert_eq!(rows[1].number("year"), Some(1900.0));
    }

    #[test]
    fn test_load_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "rooms.json",
            &json!({
                "kind": "rooms",
                "rows": [{
                    "fullname": "Hebb", "shortname": "HEBB", "number": "100", "name": "HEBB_100",
                    "address": "2045 East Mall", "lat": 49.2661, "lon": -123.25165, "seats": 375,
                    "type": "Tiered Large Group", "furniture": "Fixed Tables", "href": "http://x"
                }]
            }),
        );

        let dataset = load_dataset("rooms", &path).unwrap();
        assert_eq!(dataset.rows()[0].string("type"), Some("Tiered Large Group"));
    }

    #[test]
    fn test_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_dataset("x", &missing), Err(CliError::Io(_))));

        let bad_kind = write(&dir, "kind.json", &json!({"kind": "courses", "rows": []}));
        assert!(matches!(load_dataset("x", &bad_kind), Err(CliError::Json(_))));

        let bad_row = write(
            &dir,
            "row.json",
            &json!({"kind": "rooms", "rows": [{"shortname": "DMP"}]}),
        );
        assert!(matches!(load_dataset("x", &bad_row), Err(CliError::Config(_))));

        let path = write(&dir, "ok.json", &section_rows());
        match load_dataset("bad_id", &path) {
            Err(CliError::Core(e)) => assert_eq!(e.kind(), ErrorKind::InvalidDataset),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_all_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "sections.json", &section_rows());
        let spec = DatasetSpec {
            id: "sections".into(),
            path,
        };

        let store = InMemoryStore::new();
        load_all(&store, std::slice::from_ref(&spec)).unwrap();
        assert_eq!(store.len(), 1);

        let err = load_all(&store, &[spec]).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
    }
}
