//! Migration service - manages cache database schema migrations
//!
//! Migrations are SQL files embedded at compile time. Each applied
//! migration is recorded in the sys_migrations table so reruns are
//! idempotent.

use std::collections::HashSet;

use anyhow::Result;
use duckdb::Connection;

use crate::migrations::MIGRATIONS;

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for managing database migrations
pub struct MigrationService<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run all pending migrations in order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        // The ledger migration is IF NOT EXISTS, so running it up front
        // makes get_applied safe on a fresh database.
        self.conn.execute_batch(MIGRATIONS[0].1)?;

        let applied_set = self.get_applied()?;
        let mut newly_applied = Vec::new();

        for (name, sql) in MIGRATIONS.iter() {
            if applied_set.contains(*name) {
                continue;
            }
            // The ledger table itself was already created above
            if *name != MIGRATIONS[0].0 {
                self.conn.execute_batch(sql)?;
            }
            self.record_migration(name)?;
            newly_applied.push(name.to_string());
        }

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied: applied_set.len(),
        })
    }

    /// Names of migrations already recorded in the ledger
    pub fn get_applied(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = HashSet::new();
        for name in names {
            result.insert(name?);
        }
        Ok(result)
    }

    /// Names of migrations not yet applied, in order
    pub fn get_pending(&self) -> Result<Vec<String>> {
        let applied = self.get_applied()?;
        Ok(MIGRATIONS
            .iter()
            .filter(|(name, _)| !applied.contains(*name))
            .map(|(name, _)| name.to_string())
            .collect())
    }

    fn record_migration(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdb::Connection;

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn);

        let result = service.run_pending().unwrap();
        assert_eq!(result.applied.len(), MIGRATIONS.len());
        assert_eq!(result.already_applied, 0);

        // Running again should apply nothing
        let result2 = service.run_pending().unwrap();
        assert_eq!(result2.applied.len(), 0);
        assert_eq!(result2.already_applied, MIGRATIONS.len());
    }

    #[test]
    fn test_get_pending_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn);

        // Nothing recorded yet, so everything is pending
        conn.execute_batch(MIGRATIONS[0].1).unwrap();
        let pending = service.get_pending().unwrap();
        assert_eq!(pending.len(), MIGRATIONS.len());
    }
}
