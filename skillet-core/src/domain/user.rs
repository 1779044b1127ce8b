//! User domain models

use serde::{Deserialize, Serialize};

/// A registered user as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty");
        }
        if !self.email.contains('@') {
            return Err("email address is not valid");
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 characters");
        }
        Ok(())
    }
}

/// A successful authentication: the user plus their bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let mut signup = SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(signup.validate().is_ok());

        signup.password = "short".to_string();
        assert!(signup.validate().is_err());

        signup.password = "longenough".to_string();
        signup.email = "not-an-email".to_string();
        assert!(signup.validate().is_err());
    }
}
