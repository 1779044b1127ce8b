//! Recipe service - browsing, searching and creating recipes
//!
//! Every card that passes through here gets its favorite flag overlaid
//! from the session's favorite set before it reaches the caller, and is
//! written through to the local cache so the planner can resolve titles
//! without a network round trip.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adapters::duckdb::DuckDbCache;
use crate::domain::{annotate_cards, Advisory, Error, NewRecipe, Recipe, RecipeCard, Result};
use crate::ports::{RecipeBackend, RecipeQuery};
use crate::session::SessionStore;

/// A recipe list plus an advisory when it was served from the cache
/// because the backend could not be reached.
#[derive(Debug)]
pub struct RecipeListing {
    pub cards: Vec<RecipeCard>,
    pub advisory: Option<Advisory>,
}

pub struct RecipeService {
    backend: Arc<dyn RecipeBackend>,
    cache: Arc<DuckDbCache>,
    session: Arc<SessionStore>,
}

impl RecipeService {
    pub fn new(
        backend: Arc<dyn RecipeBackend>,
        cache: Arc<DuckDbCache>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            backend,
            cache,
            session,
        }
    }

    /// List recipes matching the query, with favorite flags overlaid.
    ///
    /// When the backend is unreachable, previously cached cards are
    /// served instead with a warning advisory. Tag filters cannot be
    /// applied offline, so those fail as usual.
    pub async fn list(&self, query: &RecipeQuery) -> Result<RecipeListing> {
        let favorites = self.known_favorites().await;

        match self.backend.list_recipes(query).await {
            Ok(mut cards) => {
                annotate_cards(&mut cards, &favorites);
                // Cache write-through is best effort; a locked cache file
                // must not break browsing
                for card in &cards {
                    let _ = self.cache.upsert_recipe(card);
                }
                Ok(RecipeListing {
                    cards,
                    advisory: None,
                })
            }
            Err(e) if query.tag.is_none() => {
                let mut cards = self
                    .cache
                    .get_recipes(query.search.as_deref())
                    .map_err(|_| e)?;
                annotate_cards(&mut cards, &favorites);
                Ok(RecipeListing {
                    cards,
                    advisory: Some(Advisory::Warning(
                        "Could not reach the recipe server; showing cached recipes".to_string(),
                    )),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch a single recipe with full detail.
    pub async fn get(&self, id: i64) -> Result<Recipe> {
        let mut recipe = self.backend.get_recipe(id).await?;

        let favorites = self.known_favorites().await;
        recipe.card.annotate(&favorites);
        let _ = self.cache.upsert_recipe(&recipe.card);

        Ok(recipe)
    }

    /// Create a recipe as the signed-in user.
    pub async fn create(&self, new_recipe: &NewRecipe) -> Result<Recipe> {
        new_recipe.validate().map_err(Error::validation)?;
        let token = self
            .session
            .auth_token()
            .map_err(|_| Error::auth("sign in to create recipes"))?;

        let recipe = self.backend.create_recipe(&token, new_recipe).await?;
        let _ = self.cache.upsert_recipe(&recipe.card);

        Ok(recipe)
    }

    /// The favorite set to annotate cards with.
    ///
    /// The session's set is authoritative when present. When it is absent
    /// (fresh login on this device, or a cleared session file) and a token
    /// exists, the backend is asked once and the answer cached in the
    /// session. Signed-out users get an empty set: nothing is favorited.
    pub async fn known_favorites(&self) -> BTreeSet<i64> {
        if let Some(ids) = self.session.favorite_ids() {
            return ids;
        }
        let Ok(token) = self.session.auth_token() else {
            return BTreeSet::new();
        };
        match self.backend.favorite_ids(&token).await {
            Ok(ids) => {
                let _ = self.session.set_favorite_ids(ids.clone());
                ids
            }
            // Leave the set unknown; the next call will retry
            Err(_) => BTreeSet::new(),
        }
    }
}
