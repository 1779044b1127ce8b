//! Session domain model

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The locally persisted record of the current logged-in user
///
/// `favorite_ids` is `None` until the set has been learned from the server
/// (or primed at login). `Some` is the authoritative local cache that card
/// annotation reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub favorite_ids: Option<BTreeSet<i64>>,
}

impl Session {
    /// Whether a user is currently logged in
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some() && self.auth_token.is_some()
    }

    /// Reset identity, token and favorites. The theme preference is a
    /// device preference and survives logout.
    pub fn clear(&mut self) {
        self.user_id = None;
        self.user_name = None;
        self.auth_token = None;
        self.favorite_ids = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_theme() {
        let mut session = Session {
            user_id: Some(7),
            user_name: Some("Ada".to_string()),
            auth_token: Some("token".to_string()),
            dark_mode: true,
            favorite_ids: Some([1, 2].into_iter().collect()),
        };

        session.clear();

        assert!(!session.is_logged_in());
        assert!(session.favorite_ids.is_none());
        assert!(session.dark_mode);
    }

    #[test]
    fn test_default_is_logged_out() {
        assert!(!Session::default().is_logged_in());
    }
}
