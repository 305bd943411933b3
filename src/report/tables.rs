//! Record tables and detail cards for backend data

use chrono::{DateTime, Local};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde_json::Value;

use crate::bridge::Data;

/// Column order for a set of records: `id` first, then every other key in
/// the order it is first seen.
pub fn columns(rows: &[Data]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    if rows.iter().any(|row| row.contains_key("id")) {
        columns.push("id".to_string());
    }
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Format a field value for display.
///
/// Strings are shown bare, `*_at` timestamps in RFC 3339 are converted to
/// local time, nested values fall back to compact JSON.
pub fn format_value(key: &str, value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => {
            if key.ends_with("_at") {
                if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                    return ts
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string();
                }
            }
            s.clone()
        }
        Value::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Build the comfy table for a list of records
pub fn records_table(rows: &[Data]) -> Table {
    let columns = columns(rows);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|c| match row.get(c) {
                    Some(Value::Bool(true)) => Cell::new("yes").fg(Color::Green),
                    Some(Value::Bool(false)) => Cell::new("no").fg(Color::Red),
                    Some(v) => Cell::new(format_value(c, v)),
                    None => Cell::new("-").fg(Color::DarkGrey),
                })
                .collect::<Vec<_>>(),
        );
    }

    table
}

/// Print a list of records as an indented table
pub fn print_records(title: &str, rows: &[Data]) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style(title.to_uppercase()).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    if rows.is_empty() {
        println!("      {}", style("(none)").dim());
        return;
    }

    for line in records_table(rows).to_string().lines() {
        println!("    {}", line);
    }
    println!("      {}", style(format!("{} record(s)", rows.len())).dim());
}

/// Print a single record as a key/value card
pub fn print_detail(title: &str, data: &Data) {
    println!();
    println!(
        "    {} {}",
        style("📝").cyan(),
        style(title.to_uppercase()).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    let width = data.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, value) in data {
        println!(
            "      {:<width$}  {}",
            style(key).dim(),
            format_value(key, value),
            width = width
        );
    }
}
