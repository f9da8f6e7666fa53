//! Output formatters for extracted records

use anyhow::Result;
use colored::*;
use serde_json::json;
use sheetread_core::{Record, SheetRecords};
use std::path::PathBuf;

/// Result of reading one file
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: sheetread_core::Result<SheetRecords>,
}

/// JSON document for all files, in input order
pub fn to_json(outcomes: &[FileOutcome]) -> serde_json::Value {
    let files: Vec<_> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(sheets) => json!({
                "file": outcome.path.display().to_string(),
                "sheets": sheets,
            }),
            Err(e) => json!({
                "file": outcome.path.display().to_string(),
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::Value::Array(files)
}

/// Print records in JSON format
pub fn print_json(outcomes: &[FileOutcome], pretty: bool) -> Result<()> {
    let output = to_json(outcomes);
    if pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}

/// Print records in human-readable format with colors
pub fn print_human(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        println!("{}", format!("File: {}", outcome.path.display()).bold());

        let sheets = match &outcome.result {
            Ok(sheets) => sheets,
            Err(e) => {
                println!("  {} {}", "ERROR".red().bold(), e);
                println!();
                continue;
            }
        };

        if sheets.is_empty() {
            println!("  {}", "No records found".yellow());
        }

        for (sheet_name, records) in sheets {
            println!(
                "  {} {} {}",
                "Sheet:".bold(),
                sheet_name.cyan().bold(),
                format!("({} records)", records.len()).bright_black()
            );
            for (index, record) in records.iter().enumerate() {
                println!(
                    "    {} {}",
                    format!("[{}]", index + 1).bright_black(),
                    format_record(record)
                );
            }
        }
        println!();
    }
}

fn format_record(record: &Record) -> String {
    record
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
