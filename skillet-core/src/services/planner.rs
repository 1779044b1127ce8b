//! Planner service - the calendar meal planner
//!
//! Planned meals live only in the local cache database; the backend has
//! no notion of them. The backend is consulted once per unknown recipe
//! to resolve its title for display.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::duckdb::DuckDbCache;
use crate::domain::{Error, MealSlot, MonthGrid, PlannedMeal, Result};
use crate::ports::RecipeBackend;

pub struct PlannerService {
    backend: Arc<dyn RecipeBackend>,
    cache: Arc<DuckDbCache>,
}

impl PlannerService {
    pub fn new(backend: Arc<dyn RecipeBackend>, cache: Arc<DuckDbCache>) -> Self {
        Self { backend, cache }
    }

    /// Build the grid for a month and fill in its planned meals.
    ///
    /// The grid spans full weeks, so the range queried includes the
    /// padding days from the adjacent months.
    pub fn month(&self, year: i32, month: u32) -> Result<MonthGrid> {
        let mut grid = MonthGrid::build(year, month)?;
        let (start, end) = grid.date_range();
        let meals = self
            .cache
            .get_meals_between(start, end)
            .map_err(|e| Error::database(e.to_string()))?;
        grid.populate(meals);
        Ok(grid)
    }

    /// Plan a recipe into a date/slot, replacing whatever was there.
    pub async fn plan_meal(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        recipe_id: i64,
    ) -> Result<PlannedMeal> {
        let title = match self
            .cache
            .get_recipe(recipe_id)
            .map_err(|e| Error::database(e.to_string()))?
        {
            Some(card) => card.title,
            None => {
                // Not cached yet; resolve from the backend and remember it
                let recipe = self.backend.get_recipe(recipe_id).await?;
                let _ = self.cache.upsert_recipe(&recipe.card);
                recipe.card.title
            }
        };

        let meal = PlannedMeal::new(date, slot, recipe_id, title);
        self.cache
            .upsert_meal(&meal)
            .map_err(|e| Error::database(e.to_string()))?;
        Ok(meal)
    }

    /// Remove the meal planned for a date/slot. Returns false when the
    /// slot was already empty.
    pub fn unplan(&self, date: NaiveDate, slot: MealSlot) -> Result<bool> {
        self.cache
            .delete_meal(date, slot)
            .map_err(|e| Error::database(e.to_string()))
    }
}
