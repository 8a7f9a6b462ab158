use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde_json::json;
use thermoflux_parser::parse_log_file;

pub fn handle_inspect(file: &Path, as_json: bool) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = parse_log_file(&content)
        .with_context(|| format!("no known format matched {}", file.display()))?;

    if as_json {
        let body = json!({
            "instrument": parsed.instrument.as_str(),
            "format": parsed.format,
            "rows": parsed.table.height(),
            "columns": parsed.table.get_column_names_str(),
            "skipped_rows": parsed.skipped_rows.len(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["property", "value"]);
    table.add_row(vec!["instrument".to_string(), parsed.instrument.to_string()]);
    table.add_row(vec!["format".to_string(), parsed.format.to_string()]);
    table.add_row(vec!["rows".to_string(), parsed.table.height().to_string()]);
    table.add_row(vec![
        "columns".to_string(),
        parsed.table.get_column_names_str().join(", "),
    ]);
    table.add_row(vec![
        "skipped rows".to_string(),
        parsed.skipped_rows.len().to_string(),
    ]);
    println!("{table}");

    for skipped in &parsed.skipped_rows {
        println!("  line {}: {}", skipped.line_index, skipped.reason);
    }
    Ok(())
}
