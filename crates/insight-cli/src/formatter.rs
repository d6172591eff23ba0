//! Output formatters for query results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use insight_core::{DatasetInfo, ResultRow, Value};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format query results.
    fn format_results(&self, rows: &[ResultRow]) -> String;

    /// Format the list of loaded datasets.
    fn format_datasets(&self, datasets: &[DatasetInfo]) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_results(&self, rows: &[ResultRow]) -> String {
        let Some(first) = rows.first() else {
            return "No results".to_string();
        };

        let mut table = Table::new();
        table.set_header(first.columns().map(Cell::new).collect::<Vec<_>>());
        for row in rows {
            table.add_row(row.iter().map(|(_, v)| Cell::new(v)).collect::<Vec<_>>());
        }

        format!("{}\n{} row(s)", table, rows.len())
    }

    fn format_datasets(&self, datasets: &[DatasetInfo]) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Dataset", "Kind", "Rows"]);
        for info in datasets {
            table.add_row(vec![
                Cell::new(&info.id),
                Cell::new(info.kind),
                Cell::new(info.num_rows),
            ]);
        }
        table.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_results(&self, rows: &[ResultRow]) -> String {
        serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_datasets(&self, datasets: &[DatasetInfo]) -> String {
        serde_json::to_string_pretty(datasets).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({
            "error": error
        })
        .to_string()
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_results(&self, rows: &[ResultRow]) -> String {
        let Some(first) = rows.first() else {
            return String::new();
        };

        let mut output = first.columns().collect::<Vec<_>>().join(",");
        output.push('\n');
        for row in rows {
            let cells: Vec<String> = row.iter().map(|(_, v)| format_value_csv(v)).collect();
            output.push_str(&cells.join(","));
            output.push('\n');
        }
        output
    }

    fn format_datasets(&self, datasets: &[DatasetInfo]) -> String {
        let mut output = String::from("id,kind,num_rows\n");
        for info in datasets {
            output.push_str(&format!("{},{},{}\n", info.id, info.kind, info.num_rows));
        }
        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("error\n\"{}\"", escape_csv(error))
    }
}

/// Format a Value for CSV output.
fn format_value_csv(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", escape_csv(s)),
        Value::Number(n) => n.to_string(),
    }
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}
