//! Logs command - view recent application events

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use colored::Colorize;

use super::get_logger;
use crate::output;

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(limit: usize, json: bool) -> Result<()> {
    let logger = get_logger().context("Failed to open the event log")?;
    let records = logger.recent(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No events logged yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Error"]);
    for record in &records {
        table.add_row(vec![
            format_timestamp(record.timestamp),
            record.event.clone(),
            record.command.clone().unwrap_or_default(),
            record
                .error_message
                .as_deref()
                .map(|m| m.red().to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}
