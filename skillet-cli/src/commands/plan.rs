//! Plan command - the calendar meal planner

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;
use skillet_core::{MealSlot, MonthGrid};

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show the calendar for a month
    Show {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plan a recipe into a date and slot
    Set {
        /// Date as YYYY-MM-DD
        date: String,
        /// Meal slot: breakfast, lunch or dinner
        slot: String,
        /// Recipe id
        recipe_id: i64,
    },
    /// Clear a date and slot
    Clear {
        /// Date as YYYY-MM-DD
        date: String,
        /// Meal slot: breakfast, lunch or dinner
        slot: String,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_month(s: Option<&str>) -> Result<(i32, u32)> {
    match s {
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
        Some(s) => {
            let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
                .map_err(|_| anyhow!("invalid month '{}', expected YYYY-MM", s))?;
            Ok((date.year(), date.month()))
        }
    }
}

fn slot_letter(slot: MealSlot) -> &'static str {
    match slot {
        MealSlot::Breakfast => "B",
        MealSlot::Lunch => "L",
        MealSlot::Dinner => "D",
    }
}

fn render_grid(grid: &MonthGrid) {
    let first = NaiveDate::from_ymd_opt(grid.year, grid.month, 1).unwrap_or_default();
    println!("{}", first.format("%B %Y").to_string().bold());

    let mut table = output::create_table();
    table.set_header(vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

    for week in &grid.weeks {
        let row: Vec<String> = week
            .iter()
            .map(|day| {
                let number = if day.in_month {
                    day.date.day().to_string()
                } else {
                    format!("({})", day.date.day())
                };
                let mut cell = number;
                for meal in &day.meals {
                    cell.push_str(&format!(
                        "\n{}: {}",
                        slot_letter(meal.slot),
                        meal.recipe_title
                    ));
                }
                cell
            })
            .collect();
        table.add_row(row);
    }
    println!("{}", table);
}

pub async fn run(command: PlanCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        PlanCommands::Show { month, json } => {
            let (year, month) = parse_month(month.as_deref())?;
            let grid = ctx.planner_service.month(year, month)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
                return Ok(());
            }
            render_grid(&grid);
            Ok(())
        }
        PlanCommands::Set {
            date,
            slot,
            recipe_id,
        } => {
            let date = parse_date(&date)?;
            let slot: MealSlot = slot.parse()?;
            let meal = ctx.planner_service.plan_meal(date, slot, recipe_id).await?;
            output::success(&format!(
                "Planned {} for {} on {}",
                meal.recipe_title,
                slot.as_str(),
                date
            ));
            Ok(())
        }
        PlanCommands::Clear { date, slot } => {
            let date = parse_date(&date)?;
            let slot: MealSlot = slot.parse()?;
            if ctx.planner_service.unplan(date, slot)? {
                output::success(&format!("Cleared {} on {}", slot.as_str(), date));
            } else {
                output::info(&format!("Nothing planned for {} on {}", slot.as_str(), date));
            }
            Ok(())
        }
    }
}
