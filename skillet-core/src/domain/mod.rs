//! Domain models for the Skillet client

pub mod favorite;
pub mod plan;
pub mod recipe;
pub mod result;
pub mod session;
pub mod user;

pub use favorite::FavoriteState;
pub use plan::{GridDay, MealSlot, MonthGrid, PlannedMeal};
pub use recipe::{annotate_cards, NewRecipe, Recipe, RecipeCard};
pub use result::{Advisory, Error, Result};
pub use session::Session;
pub use user::{AuthSession, SignupRequest, User};
