//! CLI command implementations

pub mod auth;
pub mod demo;
pub mod favorite;
pub mod logs;
pub mod new;
pub mod plan;
pub mod recipes;
pub mod refresh;
pub mod status;
pub mod theme;
pub mod users;

use std::path::PathBuf;

use anyhow::{Context, Result};
use skillet_core::services::{AppEvent, EventLog};
use skillet_core::SkilletContext;

/// Get the skillet directory from environment or default
pub fn get_skillet_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SKILLET_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".skillet")
    }
}

/// Get or create the skillet context
pub fn get_context() -> Result<SkilletContext> {
    let skillet_dir = get_skillet_dir();

    std::fs::create_dir_all(&skillet_dir)
        .with_context(|| format!("Failed to create skillet directory: {:?}", skillet_dir))?;

    SkilletContext::new(&skillet_dir).context("Failed to initialize skillet context")
}

/// Get the event log for CLI operations
///
/// Returns None if it fails to initialize (logging never blocks a command)
pub fn get_logger() -> Option<EventLog> {
    let skillet_dir = get_skillet_dir();
    std::fs::create_dir_all(&skillet_dir).ok()?;
    EventLog::open(&skillet_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<EventLog>, event: AppEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}
