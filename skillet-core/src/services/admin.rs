//! Admin service - user management
//!
//! Authorization is enforced server-side; these calls simply pass the
//! session token through and surface the backend's answer.

use std::sync::Arc;

use crate::domain::{Error, Result, User};
use crate::ports::RecipeBackend;
use crate::session::SessionStore;

pub struct AdminService {
    backend: Arc<dyn RecipeBackend>,
    session: Arc<SessionStore>,
}

impl AdminService {
    pub fn new(backend: Arc<dyn RecipeBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let token = self.require_token()?;
        self.backend.list_users(&token).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        if self.session.user_id().ok() == Some(user_id) {
            return Err(Error::validation("cannot delete the signed-in account"));
        }
        let token = self.require_token()?;
        self.backend.delete_user(&token, user_id).await
    }

    fn require_token(&self) -> Result<String> {
        self.session
            .auth_token()
            .map_err(|_| Error::auth("sign in with an admin account"))
    }
}
