//! Backend port - the recipe server API abstraction
//!
//! The authoritative schema lives server-side; this trait only captures the
//! request/response shapes the client consumes. Adapters provide the actual
//! transport (REST, or an in-process mock for demo mode and tests).

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{AuthSession, NewRecipe, Recipe, RecipeCard, SignupRequest, User};

/// Search/filter parameters for recipe listing
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    /// Free-text search over title and description
    pub search: Option<String>,
    /// Restrict to recipes carrying this tag
    pub tag: Option<String>,
}

/// Recipe server abstraction
///
/// Calls that act on behalf of a user take the session's bearer token.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// Backend name (e.g., "rest", "mock")
    fn name(&self) -> &str;

    // === Auth ===

    /// Log in with email and password
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Create a new account and log it in
    async fn signup(&self, signup: &SignupRequest) -> Result<AuthSession>;

    // === Recipes ===

    /// List or search recipes
    async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeCard>>;

    /// Fetch a recipe by ID
    async fn get_recipe(&self, id: i64) -> Result<Recipe>;

    /// Create a new recipe owned by the authenticated user
    async fn create_recipe(&self, token: &str, recipe: &NewRecipe) -> Result<Recipe>;

    // === Favorites ===

    /// IDs of the recipes the authenticated user has favorited
    async fn favorite_ids(&self, token: &str) -> Result<BTreeSet<i64>>;

    /// Full cards for the authenticated user's favorites
    async fn favorite_recipes(&self, token: &str) -> Result<Vec<RecipeCard>>;

    /// Mark a recipe as favorited
    async fn add_favorite(&self, token: &str, recipe_id: i64) -> Result<()>;

    /// Remove a recipe from favorites
    async fn remove_favorite(&self, token: &str, recipe_id: i64) -> Result<()>;

    // === User management (admin) ===

    /// List registered users
    async fn list_users(&self, token: &str) -> Result<Vec<User>>;

    /// Delete a user account
    async fn delete_user(&self, token: &str, user_id: i64) -> Result<()>;
}
