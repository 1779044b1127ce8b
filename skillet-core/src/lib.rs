//! Skillet Core - Business logic for the Skillet recipe client
//!
//! This crate implements the client's core logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Recipe, Session, FavoriteState, etc.)
//! - **ports**: Trait definitions for external dependencies (RecipeBackend)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (REST backend, mock backend, DuckDB cache)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbCache;
use adapters::mock::MockBackend;
use adapters::rest::RestBackend;
use services::*;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{
    Advisory, FavoriteState, MealSlot, MonthGrid, NewRecipe, PlannedMeal, Recipe, RecipeCard,
    Session, SignupRequest, User,
};
pub use domain::result::Error;
pub use ports::{RecipeBackend, RecipeQuery};
pub use session::SessionStore;

/// Main context for Skillet operations
///
/// The primary entry point for all business logic. It holds the
/// configuration, the session store, the local cache and all services,
/// wired to either the real REST backend or the in-process mock
/// depending on demo mode.
pub struct SkilletContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub cache: Arc<DuckDbCache>,
    pub backend: Arc<dyn RecipeBackend>,
    pub auth_service: AuthService,
    pub recipe_service: RecipeService,
    pub favorite_service: FavoriteService,
    pub planner_service: PlannerService,
    pub admin_service: AdminService,
    pub sync_service: SyncService,
}

impl SkilletContext {
    /// Create a new Skillet context rooted at the given app directory
    pub fn new(skillet_dir: &Path) -> Result<Self> {
        let config = Config::load(skillet_dir)?;

        // Demo mode gets its own cache file so it never mixes with real data
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "cache.duckdb"
        };

        let cache = Arc::new(DuckDbCache::new(&skillet_dir.join(db_filename))?);
        cache.ensure_schema()?;

        let session = Arc::new(SessionStore::open(skillet_dir)?);

        let backend: Arc<dyn RecipeBackend> = if config.demo_mode {
            Arc::new(MockBackend::new())
        } else {
            Arc::new(RestBackend::new(&config.server_url)?)
        };

        let auth_service = AuthService::new(Arc::clone(&backend), Arc::clone(&session));
        let recipe_service = RecipeService::new(
            Arc::clone(&backend),
            Arc::clone(&cache),
            Arc::clone(&session),
        );
        let favorite_service = FavoriteService::new(Arc::clone(&backend), Arc::clone(&session));
        let planner_service = PlannerService::new(Arc::clone(&backend), Arc::clone(&cache));
        let admin_service = AdminService::new(Arc::clone(&backend), Arc::clone(&session));
        let sync_service = SyncService::new(Arc::clone(&backend), Arc::clone(&cache));

        Ok(Self {
            config,
            session,
            cache,
            backend,
            auth_service,
            recipe_service,
            favorite_service,
            planner_service,
            admin_service,
            sync_service,
        })
    }
}
