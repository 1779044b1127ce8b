//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use skillet_core::Advisory;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print an advisory in the color matching its severity
pub fn advisory(advisory: &Advisory) {
    if advisory.is_warning() {
        warning(advisory.text());
    } else {
        info(advisory.text());
    }
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Heart marker for favorited rows
pub fn favorite_marker(favorited: bool) -> String {
    if favorited {
        "♥".red().to_string()
    } else {
        String::new()
    }
}

/// Format an average rating with its vote count
pub fn format_rating(average: f64, count: i64) -> String {
    if count == 0 {
        "unrated".to_string()
    } else {
        format!("{:.1} ({})", average, count)
    }
}
