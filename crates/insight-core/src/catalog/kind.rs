//! Dataset kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The kind of a dataset, which fixes its field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Course sections.
    Sections,
    /// Campus rooms.
    Rooms,
}

impl DatasetKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Rooms => "rooms",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sections" => Ok(DatasetKind::Sections),
            "rooms" => Ok(DatasetKind::Rooms),
            other => Err(Error::InvalidDataset(format!(
                "unknown dataset kind '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("sections".parse::<DatasetKind>().unwrap(), DatasetKind::Sections);
        assert_eq!("Rooms".parse::<DatasetKind>().unwrap(), DatasetKind::Rooms);
        assert!("courses".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let kind: DatasetKind = serde_json::from_str("\"rooms\"").unwrap();
        assert_eq!(kind, DatasetKind::Rooms);
        assert_eq!(
            serde_json::to_string(&DatasetKind::Sections).unwrap(),
            "\"sections\""
        );
    }
}
