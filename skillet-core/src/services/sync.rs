//! Sync service - refreshing the local recipe cache from the backend

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbCache;
use crate::domain::{Error, Result};
use crate::ports::{RecipeBackend, RecipeQuery};

/// Counts from a refresh run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResult {
    /// Recipes the backend reported
    pub discovered: usize,
    /// Recipes not previously cached
    pub new: usize,
    /// Recipes already cached and rewritten
    pub updated: usize,
}

pub struct SyncService {
    backend: Arc<dyn RecipeBackend>,
    cache: Arc<DuckDbCache>,
}

impl SyncService {
    pub fn new(backend: Arc<dyn RecipeBackend>, cache: Arc<DuckDbCache>) -> Self {
        Self { backend, cache }
    }

    /// Pull the full recipe list and write it through to the cache.
    pub async fn refresh(&self) -> Result<RefreshResult> {
        let cards = self.backend.list_recipes(&RecipeQuery::default()).await?;

        let mut new = 0;
        let mut updated = 0;
        for card in &cards {
            let inserted = self
                .cache
                .upsert_recipe(card)
                .map_err(|e| Error::database(e.to_string()))?;
            if inserted {
                new += 1;
            } else {
                updated += 1;
            }
        }

        Ok(RefreshResult {
            discovered: cards.len(),
            new,
            updated,
        })
    }
}
