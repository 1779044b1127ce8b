//! Favorite toggle state machine
//!
//! Each displayed card carries a tagged favorite state rather than a boolean
//! plus a loading flag. A user toggle moves a resolved state to `Pending`;
//! the server write-through then either confirms the opposite state or
//! reverts to the previous one.

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Favorite status of a single recipe card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum FavoriteState {
    /// Favorite status has not been resolved against the session yet
    Unknown,
    Favorited,
    NotFavorited,
    /// A toggle is in flight; `was_favorited` is the state to revert to
    Pending { was_favorited: bool },
}

impl FavoriteState {
    /// Resolve a state from a displayed favorite flag
    pub fn from_flag(favorited: bool) -> Self {
        if favorited {
            FavoriteState::Favorited
        } else {
            FavoriteState::NotFavorited
        }
    }

    /// Start a toggle: resolved states move to `Pending`
    ///
    /// Toggling from `Unknown` is a caller bug (the card was never
    /// annotated); toggling while `Pending` is rejected so each toggle
    /// stays independent.
    pub fn begin_toggle(&self) -> Result<FavoriteState> {
        match self {
            FavoriteState::Favorited => Ok(FavoriteState::Pending {
                was_favorited: true,
            }),
            FavoriteState::NotFavorited => Ok(FavoriteState::Pending {
                was_favorited: false,
            }),
            FavoriteState::Unknown => Err(Error::validation(
                "favorite status is not known yet for this recipe",
            )),
            FavoriteState::Pending { .. } => {
                Err(Error::validation("a favorite toggle is already in flight"))
            }
        }
    }

    /// The state a pending toggle is trying to reach
    pub fn target(&self) -> Option<bool> {
        match self {
            FavoriteState::Pending { was_favorited } => Some(!was_favorited),
            _ => None,
        }
    }

    /// Resolve a pending toggle to the opposite confirmed state
    pub fn confirm(&self) -> FavoriteState {
        match self {
            FavoriteState::Pending { was_favorited } => Self::from_flag(!was_favorited),
            other => *other,
        }
    }

    /// Revert a pending toggle to the previous confirmed state
    pub fn revert(&self) -> FavoriteState {
        match self {
            FavoriteState::Pending { was_favorited } => Self::from_flag(*was_favorited),
            other => *other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_confirm_reaches_opposite_state() {
        let pending = FavoriteState::NotFavorited.begin_toggle().unwrap();
        assert_eq!(pending.target(), Some(true));
        assert_eq!(pending.confirm(), FavoriteState::Favorited);

        let pending = FavoriteState::Favorited.begin_toggle().unwrap();
        assert_eq!(pending.target(), Some(false));
        assert_eq!(pending.confirm(), FavoriteState::NotFavorited);
    }

    #[test]
    fn test_toggle_revert_restores_previous_state() {
        let pending = FavoriteState::Favorited.begin_toggle().unwrap();
        assert_eq!(pending.revert(), FavoriteState::Favorited);

        let pending = FavoriteState::NotFavorited.begin_toggle().unwrap();
        assert_eq!(pending.revert(), FavoriteState::NotFavorited);
    }

    #[test]
    fn test_toggle_off_then_on_restores_original() {
        let original = FavoriteState::Favorited;
        let after_off = original.begin_toggle().unwrap().confirm();
        assert_eq!(after_off, FavoriteState::NotFavorited);
        let after_on = after_off.begin_toggle().unwrap().confirm();
        assert_eq!(after_on, original);
    }

    #[test]
    fn test_toggle_from_unknown_is_rejected() {
        assert!(FavoriteState::Unknown.begin_toggle().is_err());
    }

    #[test]
    fn test_toggle_while_pending_is_rejected() {
        let pending = FavoriteState::Favorited.begin_toggle().unwrap();
        assert!(pending.begin_toggle().is_err());
    }
}
