//! REST backend adapter
//!
//! Thin request/response wrappers over the recipe server's JSON API. No
//! retry policy: failures are mapped to friendly errors and surfaced by the
//! services as advisory messages.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthSession, NewRecipe, Recipe, RecipeCard, SignupRequest, User};
use crate::ports::{RecipeBackend, RecipeQuery};

/// REST client for the recipe server
#[derive(Debug)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

// === Wire types (camelCase JSON) ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRecipe {
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    rating_count: i64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    author: Option<String>,
}

impl ApiRecipe {
    fn into_card(self) -> RecipeCard {
        RecipeCard {
            id: self.id,
            title: self.title,
            description: self.description,
            image_urls: self.image_urls,
            average_rating: self.average_rating,
            rating_count: self.rating_count,
            tags: self.tags.into_iter().collect(),
            // Overlaid from the session at render time
            is_favorited: false,
        }
    }

    fn into_recipe(mut self) -> Recipe {
        let ingredients = std::mem::take(&mut self.ingredients);
        let steps = std::mem::take(&mut self.steps);
        let author = self.author.take();
        Recipe {
            card: self.into_card(),
            ingredients,
            steps,
            author,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUser {
    id: i64,
    name: String,
    email: String,
    #[serde(default)]
    is_admin: bool,
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        User {
            id: u.id,
            name: u.name,
            email: u.email,
            is_admin: u.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    token: String,
    user: ApiUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiNewRecipe<'a> {
    title: &'a str,
    description: &'a str,
    image_urls: &'a [String],
    tags: Vec<&'a str>,
    ingredients: &'a [String],
    steps: &'a [String],
}

impl RestBackend {
    /// Create a REST backend from a server base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|_| Error::Config(format!("invalid server URL: {}", base_url)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Config(
                "server URL must use http or https".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::backend(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::backend("connection timed out after 30 seconds")
        } else if error.is_connect() {
            Error::backend("unable to connect to the recipe server")
        } else {
            Error::backend(format!("recipe server request failed: {}", error))
        }
    }

    /// Check response status and return appropriate errors
    fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status().as_u16() {
            200..=299 => Ok(response),
            401 | 403 => Err(Error::auth(
                "authentication failed. Your session may have expired; log in again",
            )),
            404 => Err(Error::not_found("the server has no such record")),
            409 => Err(Error::validation("a record with these details already exists")),
            status => Err(Error::backend(format!("recipe API error: HTTP {}", status))),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await.map_err(|e| self.map_request_error(e))?;
        self.check_status(response)?
            .json::<T>()
            .await
            .map_err(|e| Error::backend(format!("failed to parse server response: {}", e)))
    }
}

#[async_trait]
impl RecipeBackend for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let auth: AuthResponse = self
            .check_status(response)?
            .json()
            .await
            .map_err(|e| Error::backend(format!("failed to parse server response: {}", e)))?;

        Ok(AuthSession {
            user: auth.user.into(),
            token: auth.token,
        })
    }

    async fn signup(&self, signup: &SignupRequest) -> Result<AuthSession> {
        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(signup)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let auth: AuthResponse = self
            .check_status(response)?
            .json()
            .await
            .map_err(|e| Error::backend(format!("failed to parse server response: {}", e)))?;

        Ok(AuthSession {
            user: auth.user.into(),
            token: auth.token,
        })
    }

    async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeCard>> {
        let mut path = "/recipes".to_string();
        let mut params = Vec::new();
        if let Some(search) = &query.search {
            params.push(("search", search.as_str()));
        }
        if let Some(tag) = &query.tag {
            params.push(("tag", tag.as_str()));
        }
        if !params.is_empty() {
            let pairs: Vec<String> = params
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        k,
                        url::form_urlencoded::byte_serialize(v.as_bytes()).collect::<String>()
                    )
                })
                .collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }

        let recipes: Vec<ApiRecipe> = self.get_json(&path, None).await?;
        Ok(recipes.into_iter().map(ApiRecipe::into_card).collect())
    }

    async fn get_recipe(&self, id: i64) -> Result<Recipe> {
        let recipe: ApiRecipe = self.get_json(&format!("/recipes/{}", id), None).await?;
        Ok(recipe.into_recipe())
    }

    async fn create_recipe(&self, token: &str, recipe: &NewRecipe) -> Result<Recipe> {
        let body = ApiNewRecipe {
            title: &recipe.title,
            description: &recipe.description,
            image_urls: &recipe.image_urls,
            tags: recipe.tags.iter().map(String::as_str).collect(),
            ingredients: &recipe.ingredients,
            steps: &recipe.steps,
        };

        let response = self
            .client
            .post(self.url("/recipes"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let created: ApiRecipe = self
            .check_status(response)?
            .json()
            .await
            .map_err(|e| Error::backend(format!("failed to parse server response: {}", e)))?;

        Ok(created.into_recipe())
    }

    async fn favorite_ids(&self, token: &str) -> Result<BTreeSet<i64>> {
        let ids: Vec<i64> = self.get_json("/favorites/ids", Some(token)).await?;
        Ok(ids.into_iter().collect())
    }

    async fn favorite_recipes(&self, token: &str) -> Result<Vec<RecipeCard>> {
        let recipes: Vec<ApiRecipe> = self.get_json("/favorites", Some(token)).await?;
        Ok(recipes.into_iter().map(ApiRecipe::into_card).collect())
    }

    async fn add_favorite(&self, token: &str, recipe_id: i64) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/favorites/{}", recipe_id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_status(response)?;
        Ok(())
    }

    async fn remove_favorite(&self, token: &str, recipe_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/favorites/{}", recipe_id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_status(response)?;
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>> {
        let users: Vec<ApiUser> = self.get_json("/users", Some(token)).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn delete_user(&self, token: &str, user_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{}", user_id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(RestBackend::new("https://api.example.com").is_ok());
        assert!(RestBackend::new("http://localhost:8080/api").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        let result = RestBackend::new("ftp://api.example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_malformed_url() {
        assert!(RestBackend::new("not a url").is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = RestBackend::new("https://api.example.com/").unwrap();
        assert_eq!(backend.url("/recipes"), "https://api.example.com/recipes");
    }
}
