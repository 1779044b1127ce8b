//! Service layer - business logic orchestration
//!
//! Services play the role the screens' view models play in the mobile app:
//! each one coordinates the backend port, the session store and the local
//! cache for a feature area.

mod admin;
mod auth;
mod events;
mod favorites;
mod migration;
mod planner;
mod recipes;
mod sync;

pub use admin::AdminService;
pub use auth::{AuthService, CurrentUser, LoginOutcome};
pub use events::{AppEvent, EventLog, EventRecord};
pub use favorites::{FavoriteService, ToggleOutcome};
pub use migration::{MigrationResult, MigrationService};
pub use planner::PlannerService;
pub use recipes::{RecipeListing, RecipeService};
pub use sync::{RefreshResult, SyncService};
