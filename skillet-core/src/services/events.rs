//! Event log - local application event history
//!
//! Events go to a dedicated logs.duckdb next to the cache so that a busy
//! cache database never blocks logging. Writing an event is best effort;
//! callers ignore the result.

use std::path::Path;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use chrono::Utc;
use duckdb::Connection;
use serde::Serialize;

const LOG_DB_FILE: &str = "logs.duckdb";

static ID_COUNTER: AtomicU16 = AtomicU16::new(0);

/// An event about to be logged. Built incrementally so call sites only
/// name the fields they have.
#[derive(Debug, Clone)]
pub struct AppEvent {
    pub event: String,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl AppEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A logged event as read back from the database.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: i64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub error_message: Option<String>,
}

pub struct EventLog {
    conn: Mutex<Connection>,
    app_version: String,
    platform: String,
}

impl EventLog {
    /// Open (creating if needed) the log database inside the app dir.
    pub fn open(app_dir: &Path, app_version: &str) -> Result<Self> {
        let conn = Connection::open(app_dir.join(LOG_DB_FILE))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sys_events (
                event_id BIGINT PRIMARY KEY,
                timestamp BIGINT NOT NULL,
                app_version TEXT,
                platform TEXT,
                event TEXT NOT NULL,
                command TEXT,
                error_message TEXT,
                error_details TEXT
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            app_version: app_version.to_string(),
            platform: detect_platform(),
        })
    }

    /// Write one event.
    pub fn log(&self, event: AppEvent) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO sys_events
             (event_id, timestamp, app_version, platform, event, command, error_message, error_details)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            duckdb::params![
                generate_id(),
                Utc::now().timestamp_millis(),
                self.app_version,
                self.platform,
                event.event,
                event.command,
                event.error_message,
                event.error_details,
            ],
        )?;
        Ok(())
    }

    /// The most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<EventRecord>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT event_id, timestamp, app_version, platform, event, command, error_message
             FROM sys_events ORDER BY timestamp DESC, event_id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(EventRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                app_version: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                platform: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                event: row.get(4)?,
                command: row.get(5)?,
                error_message: row.get(6)?,
            })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

/// Millisecond timestamp shifted left 16 bits plus a wrapping counter,
/// unique enough for events written from a single process.
fn generate_id() -> i64 {
    let millis = Utc::now().timestamp_millis();
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) as i64;
    (millis << 16) | (counter & 0xFFFF)
}

fn detect_platform() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_and_read_back() {
        let dir = TempDir::new().unwrap();
        let log = EventLog::open(dir.path(), "0.1.0-test").unwrap();

        log.log(AppEvent::new("command_start").with_command("recipes"))
            .unwrap();
        log.log(
            AppEvent::new("command_error")
                .with_command("favorite")
                .with_error("could not reach server")
                .with_error_details("connect timeout"),
        )
        .unwrap();

        let records = log.recent(10).unwrap();
        assert_eq!(records.len(), 2);
        // Newest first
        assert_eq!(records[0].event, "command_error");
        assert_eq!(
            records[0].error_message.as_deref(),
            Some("could not reach server")
        );
        assert_eq!(records[1].command.as_deref(), Some("recipes"));
    }

    #[test]
    fn test_recent_respects_limit() {
        let dir = TempDir::new().unwrap();
        let log = EventLog::open(dir.path(), "0.1.0-test").unwrap();

        for i in 0..5 {
            log.log(AppEvent::new(format!("event_{i}"))).unwrap();
        }
        assert_eq!(log.recent(3).unwrap().len(), 3);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
