//! CLI configuration.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use insight_core::query::{ResultBudget, DEFAULT_MAX_ROWS};
use insight_core::EngineConfig;

use crate::error::{CliError, Result};
use crate::formatter::OutputFormat;

/// A dataset to load: `ID=PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    pub id: String,
    pub path: PathBuf,
}

impl FromStr for DatasetSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((id, path)) if !id.is_empty() && !path.is_empty() => Ok(Self {
                id: id.to_string(),
                path: PathBuf::from(path),
            }),
            _ => Err(format!("expected ID=PATH, got '{}'", s)),
        }
    }
}

/// Where the query document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Query text given on the command line.
    Inline(String),
    /// Path to a file holding one query document.
    File(PathBuf),
}

impl QuerySource {
    /// Read the query text.
    pub fn read(&self) -> Result<String> {
        match self {
            QuerySource::Inline(text) => Ok(text.clone()),
            QuerySource::File(path) => Ok(std::fs::read_to_string(path)?),
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Datasets to load, in command-line order.
    pub datasets: Vec<DatasetSpec>,
    /// Query to run, if any.
    pub query: Option<QuerySource>,
    /// Print the loaded datasets.
    pub list: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Engine configuration.
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Check that there is something to do.
    pub fn validate(&self) -> Result<()> {
        if self.query.is_none() && !self.list {
            return Err(CliError::Config(
                "nothing to do: pass a query with -c or -f, or use --list".into(),
            ));
        }
        if self.engine.budget.max_rows == 0 || self.engine.budget.max_group_rows == 0 {
            return Err(CliError::Config("row limits must be at least 1".into()));
        }
        Ok(())
    }
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "insight")]
#[command(version, about = "Run JSON analytic queries over section and room datasets")]
pub struct Args {
    /// Dataset to load, as ID=PATH (repeatable). The file holds
    /// {"kind": "sections"|"rooms", "rows": [...]}.
    #[arg(short, long = "dataset", value_name = "ID=PATH")]
    pub datasets: Vec<DatasetSpec>,

    /// Execute a single query given inline
    #[arg(short = 'c', long, conflicts_with = "file")]
    pub command: Option<String>,

    /// Execute the query document in a file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// List loaded datasets
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Maximum rows in a result
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Maximum rows in one group
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_group_rows: usize,
}

impl Args {
    /// Convert command-line arguments to CLI configuration.
    pub fn into_config(self) -> CliConfig {
        let query = match (self.command, self.file) {
            (Some(text), _) => Some(QuerySource::Inline(text)),
            (None, Some(path)) => Some(QuerySource::File(path)),
            (None, None) => None,
        };

        CliConfig {
            datasets: self.datasets,
            query,
            list: self.list,
            format: self.format,
            engine: EngineConfig::new()
                .with_budget(ResultBudget::new(self.max_rows, self.max_group_rows)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("insight").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_dataset_spec() {
        let spec: DatasetSpec = "rooms=data/rooms.json".parse().unwrap();
        assert_eq!(spec.id, "rooms");
        assert_eq!(spec.path, PathBuf::from("data/rooms.json"));

        assert!("rooms".parse::<DatasetSpec>().is_err());
        assert!("=x.json".parse::<DatasetSpec>().is_err());
        assert!("rooms=".parse::<DatasetSpec>().is_err());
    }

    #[test]
    fn test_into_config() {
        let config = parse(&[
            "-d",
            "sections=s.json",
            "--dataset",
            "rooms=r.json",
            "-c",
            "{}",
            "--format",
            "json",
            "--max-rows",
            "10",
        ])
        .into_config();

        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.datasets[1].id, "rooms");
        assert_eq!(config.query, Some(QuerySource::Inline("{}".into())));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.engine.budget, ResultBudget::new(10, DEFAULT_MAX_ROWS));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--list"]).into_config();
        assert!(config.query.is_none());
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nothing_to_do() {
        let config = parse(&["-d", "rooms=r.json"]).into_config();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = parse(&["--list", "--max-rows", "0"]).into_config();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_and_file_conflict() {
        assert!(Args::try_parse_from(["insight", "-c", "{}", "-f", "q.json"]).is_err());
    }

    #[test]
    fn test_query_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{"WHERE": {}}"#).unwrap();

        let source = QuerySource::File(path);
        assert_eq!(source.read().unwrap(), r#"{"WHERE": {}}"#);

        let missing = QuerySource::File(dir.path().join("missing.json"));
        assert!(matches!(missing.read(), Err(CliError::Io(_))));
    }
}
