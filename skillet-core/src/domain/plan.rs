//! Meal planner domain models and the calendar grid generator

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};

/// A meal slot within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            other => Err(Error::validation(format!(
                "unknown meal slot '{}' (expected breakfast, lunch or dinner)",
                other
            ))),
        }
    }
}

/// A recipe planned into a date/slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub id: Uuid,
    pub date: NaiveDate,
    pub slot: MealSlot,
    pub recipe_id: i64,
    /// Title snapshot so the planner renders without a backend round trip
    pub recipe_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlannedMeal {
    pub fn new(date: NaiveDate, slot: MealSlot, recipe_id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date,
            slot,
            recipe_id,
            recipe_title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One cell of the calendar grid
#[derive(Debug, Clone, Serialize)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for leading/trailing padding days of adjacent months
    pub in_month: bool,
    pub meals: Vec<PlannedMeal>,
}

/// A month rendered as full weeks, Monday through Sunday
///
/// The grid always starts on the Monday on or before the 1st and ends on
/// the Sunday on or after the last day, so every row has exactly 7 cells.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<GridDay>>,
}

impl MonthGrid {
    /// Generate the grid for a month, with empty meal lists
    pub fn build(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::validation(format!("invalid month: {}-{:02}", year, month)))?;
        let last = last_day_of_month(year, month)?;

        let lead = first.weekday().num_days_from_monday() as i64;
        let mut day = first - Duration::days(lead);

        let mut weeks = Vec::new();
        loop {
            let mut week = Vec::with_capacity(7);
            for _ in 0..7 {
                week.push(GridDay {
                    date: day,
                    in_month: day.year() == year && day.month() == month,
                    meals: Vec::new(),
                });
                day = day + Duration::days(1);
            }
            weeks.push(week);
            if day > last {
                break;
            }
        }

        Ok(Self { year, month, weeks })
    }

    /// First and last date shown on the grid (inclusive)
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let first = self.weeks[0][0].date;
        let last = self.weeks[self.weeks.len() - 1][6].date;
        (first, last)
    }

    /// Place planned meals into their grid cells, ordered by slot
    pub fn populate(&mut self, meals: Vec<PlannedMeal>) {
        for meal in meals {
            for week in self.weeks.iter_mut() {
                if let Some(day) = week.iter_mut().find(|d| d.date == meal.date) {
                    day.meals.push(meal);
                    break;
                }
            }
        }
        for week in self.weeks.iter_mut() {
            for day in week.iter_mut() {
                day.meals.sort_by_key(|m| m.slot);
            }
        }
    }
}

/// Last calendar day of a month, computed in Rust (no ICU)
fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::validation(format!("invalid month: {}-{:02}", year, month)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rows_are_full_weeks() {
        for (year, month) in [(2024, 1), (2024, 2), (2025, 8), (1999, 12)] {
            let grid = MonthGrid::build(year, month).unwrap();
            for week in &grid.weeks {
                assert_eq!(week.len(), 7);
                assert_eq!(week[0].date.weekday(), chrono::Weekday::Mon);
                assert_eq!(week[6].date.weekday(), chrono::Weekday::Sun);
            }
        }
    }

    #[test]
    fn test_grid_covers_whole_month() {
        // Feb 2024 is a leap month starting on a Thursday
        let grid = MonthGrid::build(2024, 2).unwrap();
        let in_month: Vec<_> = grid
            .weeks
            .iter()
            .flatten()
            .filter(|d| d.in_month)
            .collect();
        assert_eq!(in_month.len(), 29);
        assert_eq!(in_month[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(
            in_month.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_grid_pads_with_adjacent_months() {
        // Sep 2024 starts on a Sunday: six leading padding days
        let grid = MonthGrid::build(2024, 9).unwrap();
        let first_week = &grid.weeks[0];
        assert!(!first_week[0].in_month);
        assert_eq!(first_week[0].date, NaiveDate::from_ymd_opt(2024, 8, 26).unwrap());
        assert!(first_week[6].in_month);
    }

    #[test]
    fn test_grid_needing_six_weeks() {
        // Jun 2025 starts on a Sunday and has 30 days: 6 rows
        let grid = MonthGrid::build(2025, 6).unwrap();
        assert_eq!(grid.weeks.len(), 6);
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(MonthGrid::build(2024, 13).is_err());
        assert!(MonthGrid::build(2024, 0).is_err());
    }

    #[test]
    fn test_populate_places_and_orders_meals() {
        let mut grid = MonthGrid::build(2024, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let dinner = PlannedMeal::new(date, MealSlot::Dinner, 2, "Ramen");
        let breakfast = PlannedMeal::new(date, MealSlot::Breakfast, 1, "Porridge");
        grid.populate(vec![dinner, breakfast]);

        let day = grid
            .weeks
            .iter()
            .flatten()
            .find(|d| d.date == date)
            .unwrap();
        assert_eq!(day.meals.len(), 2);
        assert_eq!(day.meals[0].slot, MealSlot::Breakfast);
        assert_eq!(day.meals[1].slot, MealSlot::Dinner);
    }

    #[test]
    fn test_meal_slot_parsing() {
        assert_eq!("Dinner".parse::<MealSlot>().unwrap(), MealSlot::Dinner);
        assert!("brunch".parse::<MealSlot>().is_err());
    }
}
