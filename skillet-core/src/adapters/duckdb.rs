//! DuckDB cache implementation
//!
//! Local cache database: recipe cards for offline browsing and the meal
//! planner table. Not authoritative for anything the backend owns.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, Connection};
use uuid::Uuid;

use crate::domain::{MealSlot, PlannedMeal, RecipeCard};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB cache repository
pub struct DuckDbCache {
    conn: Mutex<Connection>,
}

impl DuckDbCache {
    /// Open the cache database
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when two commands hit the same cache file
    /// at once.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[skillet] Cache database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock();
        MigrationService::new(&conn).run_pending()?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // === Recipe cache ===

    /// Insert or update a cached recipe card. Returns true when the card
    /// was not cached before.
    pub fn upsert_recipe(&self, card: &RecipeCard) -> Result<bool> {
        let conn = self.lock();
        let existed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_recipes WHERE recipe_id = ?",
            [card.id],
            |row| row.get(0),
        )?;

        let now = Utc::now().to_rfc3339();
        let image_urls = serde_json::to_string(&card.image_urls)?;
        let tags = serde_json::to_string(&card.tags)?;

        conn.execute(
            "INSERT OR REPLACE INTO sys_recipes
                 (recipe_id, title, description, image_urls, average_rating,
                  rating_count, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?,
                     COALESCE((SELECT created_at FROM sys_recipes WHERE recipe_id = ?), ?),
                     ?)",
            params![
                card.id,
                card.title,
                card.description,
                image_urls,
                card.average_rating,
                card.rating_count,
                tags,
                card.id,
                now,
                now,
            ],
        )?;

        Ok(existed == 0)
    }

    /// Cached cards, optionally filtered by a case-insensitive search over
    /// title, description and tags
    pub fn get_recipes(&self, search: Option<&str>) -> Result<Vec<RecipeCard>> {
        let conn = self.lock();
        let mut stmt;
        fn map_card(row: &duckdb::Row) -> duckdb::Result<RecipeCard> {
            Ok(row_to_card(row))
        }
        let rows = match search {
            Some(q) => {
                stmt = conn.prepare(
                    "SELECT recipe_id, title, description, image_urls,
                            average_rating, rating_count, tags
                     FROM sys_recipes
                     WHERE lower(title) LIKE ? OR lower(description) LIKE ? OR lower(tags) LIKE ?
                     ORDER BY recipe_id",
                )?;
                let pattern = format!("%{}%", q.to_lowercase());
                stmt.query_map(params![pattern, pattern, pattern], map_card)?
            }
            None => {
                stmt = conn.prepare(
                    "SELECT recipe_id, title, description, image_urls,
                            average_rating, rating_count, tags
                     FROM sys_recipes ORDER BY recipe_id",
                )?;
                stmt.query_map([], map_card)?
            }
        };

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_recipe(&self, id: i64) -> Result<Option<RecipeCard>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT recipe_id, title, description, image_urls,
                    average_rating, rating_count, tags
             FROM sys_recipes WHERE recipe_id = ?",
        )?;

        let card = stmt.query_row([id], |row| Ok(row_to_card(row))).ok();
        Ok(card)
    }

    pub fn recipe_count(&self) -> Result<i64> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Meal plan ===

    /// Plan a meal into a date/slot, replacing whatever was there
    pub fn upsert_meal(&self, meal: &PlannedMeal) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM sys_meal_plan WHERE plan_date = ? AND slot = ?",
            params![meal.date.format("%Y-%m-%d").to_string(), meal.slot.as_str()],
        )?;
        conn.execute(
            "INSERT INTO sys_meal_plan
                 (meal_id, plan_date, slot, recipe_id, recipe_title, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                meal.id.to_string(),
                meal.date.format("%Y-%m-%d").to_string(),
                meal.slot.as_str(),
                meal.recipe_id,
                meal.recipe_title,
                meal.created_at.to_rfc3339(),
                meal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Planned meals between two dates (inclusive)
    pub fn get_meals_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PlannedMeal>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT meal_id, plan_date, slot, recipe_id, recipe_title, created_at, updated_at
             FROM sys_meal_plan
             WHERE plan_date >= ? AND plan_date <= ?
             ORDER BY plan_date, slot",
        )?;

        let meals = stmt
            .query_map(
                params![
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                |row| Ok(row_to_meal(row)),
            )?
            .filter_map(|r| r.ok())
            .flatten()
            .collect();

        Ok(meals)
    }

    /// Remove a planned meal. Returns false when the slot was empty.
    pub fn delete_meal(&self, date: NaiveDate, slot: MealSlot) -> Result<bool> {
        let conn = self.lock();
        let changed = conn.execute(
            "DELETE FROM sys_meal_plan WHERE plan_date = ? AND slot = ?",
            params![date.format("%Y-%m-%d").to_string(), slot.as_str()],
        )?;
        Ok(changed > 0)
    }

    pub fn meal_count(&self) -> Result<i64> {
        let conn = self.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_meal_plan", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_card(row: &duckdb::Row) -> RecipeCard {
    // Column indices from SELECT:
    // 0: recipe_id, 1: title, 2: description, 3: image_urls,
    // 4: average_rating, 5: rating_count, 6: tags
    let image_urls_json: String = row.get(3).unwrap_or_default();
    let tags_json: String = row.get(6).unwrap_or_default();

    RecipeCard {
        id: row.get(0).unwrap_or_default(),
        title: row.get(1).unwrap_or_default(),
        description: row.get(2).unwrap_or_default(),
        image_urls: serde_json::from_str(&image_urls_json).unwrap_or_default(),
        average_rating: row.get(4).unwrap_or_default(),
        rating_count: row.get(5).unwrap_or_default(),
        tags: serde_json::from_str::<BTreeSet<String>>(&tags_json).unwrap_or_default(),
        is_favorited: false,
    }
}

fn row_to_meal(row: &duckdb::Row) -> Option<PlannedMeal> {
    // 0: meal_id, 1: plan_date, 2: slot, 3: recipe_id, 4: recipe_title,
    // 5: created_at, 6: updated_at
    let id_str: String = row.get(0).unwrap_or_default();
    let date_str: String = row.get(1).unwrap_or_default();
    let slot_str: String = row.get(2).unwrap_or_default();
    let created_str: String = row.get(5).unwrap_or_default();
    let updated_str: String = row.get(6).unwrap_or_default();

    Some(PlannedMeal {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").ok()?,
        slot: slot_str.parse().ok()?,
        recipe_id: row.get(3).unwrap_or_default(),
        recipe_title: row.get(4).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
        updated_at: parse_timestamp(&updated_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache(dir: &TempDir) -> DuckDbCache {
        let cache = DuckDbCache::new(&dir.path().join("test.duckdb")).unwrap();
        cache.ensure_schema().unwrap();
        cache
    }

    fn card(id: i64, title: &str) -> RecipeCard {
        RecipeCard {
            id,
            title: title.to_string(),
            description: format!("{} description", title),
            image_urls: vec!["https://img.test/1.jpg".to_string()],
            average_rating: 4.2,
            rating_count: 11,
            tags: ["dinner".to_string()].into_iter().collect(),
            is_favorited: false,
        }
    }

    #[test]
    fn test_upsert_reports_new_vs_updated() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);

        assert!(cache.upsert_recipe(&card(1, "Ramen")).unwrap());
        assert!(!cache.upsert_recipe(&card(1, "Miso Ramen")).unwrap());

        let cached = cache.get_recipe(1).unwrap().unwrap();
        assert_eq!(cached.title, "Miso Ramen");
        assert_eq!(cache.recipe_count().unwrap(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);
        cache.upsert_recipe(&card(1, "Shakshuka")).unwrap();
        cache.upsert_recipe(&card(2, "Caesar Salad")).unwrap();

        let hits = cache.get_recipes(Some("SHAK")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let all = cache.get_recipes(None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_round_trips_tags_and_images() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);
        let original = card(3, "Chana Masala");
        cache.upsert_recipe(&original).unwrap();

        let cached = cache.get_recipe(3).unwrap().unwrap();
        assert_eq!(cached.tags, original.tags);
        assert_eq!(cached.image_urls, original.image_urls);
    }

    #[test]
    fn test_meal_plan_slot_is_replaced() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        cache
            .upsert_meal(&PlannedMeal::new(date, MealSlot::Dinner, 1, "Ramen"))
            .unwrap();
        cache
            .upsert_meal(&PlannedMeal::new(date, MealSlot::Dinner, 2, "Risotto"))
            .unwrap();

        let meals = cache.get_meals_between(date, date).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].recipe_title, "Risotto");
    }

    #[test]
    fn test_delete_meal() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        cache
            .upsert_meal(&PlannedMeal::new(date, MealSlot::Lunch, 3, "Salad"))
            .unwrap();
        assert!(cache.delete_meal(date, MealSlot::Lunch).unwrap());
        assert!(!cache.delete_meal(date, MealSlot::Lunch).unwrap());
        assert_eq!(cache.meal_count().unwrap(), 0);
    }

    #[test]
    fn test_meals_between_is_inclusive_and_ordered() {
        let dir = TempDir::new().unwrap();
        let cache = test_cache(&dir);
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        cache
            .upsert_meal(&PlannedMeal::new(d2, MealSlot::Dinner, 1, "Ramen"))
            .unwrap();
        cache
            .upsert_meal(&PlannedMeal::new(d1, MealSlot::Breakfast, 5, "Pancakes"))
            .unwrap();
        cache
            .upsert_meal(&PlannedMeal::new(d3, MealSlot::Dinner, 6, "Chana"))
            .unwrap();

        let meals = cache.get_meals_between(d1, d2).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].date, d1);
        assert_eq!(meals[1].date, d2);
    }
}
