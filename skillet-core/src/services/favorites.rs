//! Favorite service - listing favorites and the toggle workflow
//!
//! A toggle is optimistic: the state flips to pending immediately, the
//! backend write happens, and the pending state is then confirmed or
//! reverted. A failed write is not an error to the caller; it surfaces
//! as a reverted outcome carrying an advisory message.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{annotate_cards, Advisory, Error, FavoriteState, RecipeCard, Result};
use crate::ports::RecipeBackend;
use crate::session::SessionStore;

/// Outcome of a toggle attempt. `reverted` is true when the backend write
/// failed and the state rolled back to where it started.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub recipe_id: i64,
    pub state: FavoriteState,
    pub reverted: bool,
    #[serde(skip)]
    pub advisory: Option<Advisory>,
}

pub struct FavoriteService {
    backend: Arc<dyn RecipeBackend>,
    session: Arc<SessionStore>,
}

impl FavoriteService {
    pub fn new(backend: Arc<dyn RecipeBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// List the signed-in user's favorite recipes.
    ///
    /// The server's answer is authoritative here, so the session's set is
    /// reconciled against it as a side effect.
    pub async fn list(&self) -> Result<Vec<RecipeCard>> {
        let token = self.require_token()?;
        let mut cards = self.backend.favorite_recipes(&token).await?;

        let ids: BTreeSet<i64> = cards.iter().map(|c| c.id).collect();
        let _ = self.session.set_favorite_ids(ids.clone());
        annotate_cards(&mut cards, &ids);

        Ok(cards)
    }

    /// Move a recipe to the given favorite state.
    ///
    /// A no-op when the recipe is already there.
    pub async fn set_favorite(&self, recipe_id: i64, favorited: bool) -> Result<ToggleOutcome> {
        let currently = self.currently_favorited(recipe_id).await?;
        if currently == favorited {
            return Ok(ToggleOutcome {
                recipe_id,
                state: FavoriteState::from_flag(currently),
                reverted: false,
                advisory: Some(Advisory::Info(if favorited {
                    "Already in favorites".to_string()
                } else {
                    "Not in favorites".to_string()
                })),
            });
        }
        self.toggle(recipe_id, FavoriteState::from_flag(currently))
            .await
    }

    /// Flip the favorite state of a recipe and push the change to the
    /// backend, confirming or reverting based on the write result.
    pub async fn toggle(&self, recipe_id: i64, current: FavoriteState) -> Result<ToggleOutcome> {
        let token = self.require_token()?;
        let pending = current.begin_toggle()?;
        let target = pending
            .target()
            .ok_or_else(|| Error::validation("toggle did not enter a pending state"))?;

        let write = if target {
            self.backend.add_favorite(&token, recipe_id).await
        } else {
            self.backend.remove_favorite(&token, recipe_id).await
        };

        match write {
            Ok(()) => {
                if target {
                    self.session.add_favorite(recipe_id)?;
                } else {
                    self.session.remove_favorite(recipe_id)?;
                }
                Ok(ToggleOutcome {
                    recipe_id,
                    state: pending.confirm(),
                    reverted: false,
                    advisory: Some(Advisory::Info(
                        if target {
                            "Added to favorites"
                        } else {
                            "Removed from favorites"
                        }
                        .to_string(),
                    )),
                })
            }
            Err(e) => Ok(ToggleOutcome {
                recipe_id,
                state: pending.revert(),
                reverted: true,
                advisory: Some(Advisory::Warning(format!(
                    "Could not update favorite: {e}"
                ))),
            }),
        }
    }

    /// Whether the recipe is currently favorited, asking the backend when
    /// the session does not know yet.
    async fn currently_favorited(&self, recipe_id: i64) -> Result<bool> {
        if let Some(ids) = self.session.favorite_ids() {
            return Ok(ids.contains(&recipe_id));
        }
        let token = self.require_token()?;
        let ids = self.backend.favorite_ids(&token).await?;
        let _ = self.session.set_favorite_ids(ids.clone());
        Ok(ids.contains(&recipe_id))
    }

    fn require_token(&self) -> Result<String> {
        self.session
            .auth_token()
            .map_err(|_| Error::auth("sign in to manage favorites"))
    }
}
