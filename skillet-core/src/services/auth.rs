//! Authentication service - login, signup and session lifecycle

use std::sync::Arc;

use crate::domain::{Advisory, Error, Result, SignupRequest, User};
use crate::ports::RecipeBackend;
use crate::session::SessionStore;

/// Identity of the signed-in user, read from the session store.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
}

/// Result of a successful login. The advisory, when present, reports a
/// non-fatal problem such as the favorite set failing to load.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub advisory: Option<Advisory>,
}

pub struct AuthService {
    backend: Arc<dyn RecipeBackend>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn RecipeBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// Authenticate against the backend and persist the session.
    ///
    /// After the token is stored, the user's favorite ids are fetched to
    /// prime the local set. A failure there does not fail the login; the
    /// set stays unknown and is fetched again on first use.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let auth = self.backend.login(email, password).await?;
        self.session
            .set_user(auth.user.id, &auth.user.name, &auth.token)?;

        let advisory = match self.backend.favorite_ids(&auth.token).await {
            Ok(ids) => {
                self.session.set_favorite_ids(ids)?;
                None
            }
            Err(e) => Some(Advisory::Warning(format!(
                "Signed in, but favorites could not be loaded: {e}"
            ))),
        };

        Ok(LoginOutcome {
            user: auth.user,
            advisory,
        })
    }

    /// Register a new account and sign in as it.
    pub async fn signup(&self, request: &SignupRequest) -> Result<User> {
        request.validate().map_err(Error::validation)?;

        let auth = self.backend.signup(request).await?;
        self.session
            .set_user(auth.user.id, &auth.user.name, &auth.token)?;
        // A fresh account has no favorites yet
        self.session.set_favorite_ids(Default::default())?;

        Ok(auth.user)
    }

    /// Clear the stored session. Returns false when nobody was signed in.
    pub fn logout(&self) -> Result<bool> {
        let was_logged_in = self.session.is_logged_in();
        self.session.clear()?;
        Ok(was_logged_in)
    }

    /// Who is signed in, if anyone
    pub fn current_user(&self) -> Option<CurrentUser> {
        let id = self.session.user_id().ok()?;
        let name = self
            .session
            .user_name()
            .unwrap_or_else(|| format!("user {}", id));
        Some(CurrentUser { id, name })
    }
}
