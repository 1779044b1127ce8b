//! Mock backend for demo mode and testing
//!
//! In-process, deterministic stand-in for the recipe server. Seeds a small
//! set of recipes and two users, and exposes failure switches so tests can
//! exercise the pending/revert paths without a network.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthSession, NewRecipe, Recipe, RecipeCard, SignupRequest, User};
use crate::ports::{RecipeBackend, RecipeQuery};

/// Password accepted for the seeded demo users
pub const DEMO_PASSWORD: &str = "skillet";

/// Seeded demo login
pub const DEMO_EMAIL: &str = "demo@skillet.dev";

struct MockState {
    recipes: Vec<Recipe>,
    users: Vec<User>,
    /// user_id -> favorited recipe ids
    favorites: HashMap<i64, BTreeSet<i64>>,
    /// token -> user_id
    tokens: HashMap<String, i64>,
    next_user_id: i64,
    next_recipe_id: i64,
}

/// Mock recipe backend
pub struct MockBackend {
    state: Mutex<MockState>,
    fail_favorites: AtomicBool,
    fail_network: AtomicBool,
}

fn seed_recipe(
    id: i64,
    title: &str,
    description: &str,
    tags: &[&str],
    rating: f64,
    ratings: i64,
    ingredients: &[&str],
    steps: &[&str],
) -> Recipe {
    Recipe {
        card: RecipeCard {
            id,
            title: title.to_string(),
            description: description.to_string(),
            image_urls: vec![format!("https://img.skillet.dev/recipes/{}.jpg", id)],
            average_rating: rating,
            rating_count: ratings,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_favorited: false,
        },
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        author: Some("Skillet Kitchen".to_string()),
    }
}

fn seed_recipes() -> Vec<Recipe> {
    vec![
        seed_recipe(
            1,
            "Shakshuka",
            "Eggs poached in a spiced tomato and pepper sauce.",
            &["breakfast", "vegetarian"],
            4.6,
            213,
            &["eggs", "tomatoes", "bell pepper", "cumin", "paprika"],
            &["Soften the peppers and onion", "Simmer the tomatoes", "Poach the eggs in the sauce"],
        ),
        seed_recipe(
            2,
            "Miso Ramen",
            "Weeknight ramen with a rich miso broth.",
            &["dinner", "noodles"],
            4.8,
            542,
            &["ramen noodles", "miso paste", "stock", "scallions", "soft egg"],
            &["Build the broth", "Cook the noodles", "Assemble the bowls"],
        ),
        seed_recipe(
            3,
            "Caesar Salad",
            "Crisp romaine, garlicky croutons, classic dressing.",
            &["lunch", "salad"],
            4.1,
            98,
            &["romaine", "parmesan", "anchovies", "bread", "olive oil"],
            &["Toast the croutons", "Whisk the dressing", "Toss and serve"],
        ),
        seed_recipe(
            4,
            "Mushroom Risotto",
            "Slow-stirred arborio rice with mixed mushrooms.",
            &["dinner", "vegetarian", "rice"],
            4.4,
            167,
            &["arborio rice", "mushrooms", "white wine", "stock", "parmesan"],
            &["Saute the mushrooms", "Toast the rice", "Add stock a ladle at a time"],
        ),
        seed_recipe(
            5,
            "Banana Pancakes",
            "Fluffy pancakes sweetened with ripe banana.",
            &["breakfast", "sweet"],
            4.3,
            321,
            &["flour", "banana", "milk", "eggs", "baking powder"],
            &["Mash the bananas", "Fold the batter together", "Cook on a hot griddle"],
        ),
        seed_recipe(
            6,
            "Chana Masala",
            "Chickpeas simmered in a tangy tomato gravy.",
            &["dinner", "vegan"],
            4.7,
            289,
            &["chickpeas", "tomatoes", "onion", "garam masala", "ginger"],
            &["Bloom the spices", "Add tomatoes and chickpeas", "Simmer until thick"],
        ),
    ]
}

impl MockBackend {
    pub fn new() -> Self {
        let users = vec![
            User {
                id: 1,
                name: "Demo Cook".to_string(),
                email: DEMO_EMAIL.to_string(),
                is_admin: false,
            },
            User {
                id: 2,
                name: "Admin".to_string(),
                email: "admin@skillet.dev".to_string(),
                is_admin: true,
            },
        ];

        // The demo account starts with a couple of favorites so the
        // annotated state is visible right after login
        let favorites = HashMap::from([(1, BTreeSet::from([2, 6]))]);

        Self {
            state: Mutex::new(MockState {
                recipes: seed_recipes(),
                users,
                favorites,
                tokens: HashMap::new(),
                next_user_id: 3,
                next_recipe_id: 7,
            }),
            fail_favorites: AtomicBool::new(false),
            fail_network: AtomicBool::new(false),
        }
    }

    /// Make favorite add/remove calls fail (for testing the revert path)
    pub fn set_fail_favorites(&self, fail: bool) {
        self.fail_favorites.store(fail, Ordering::SeqCst);
    }

    /// Make every call fail as if the server were unreachable
    pub fn set_fail_network(&self, fail: bool) {
        self.fail_network.store(fail, Ordering::SeqCst);
    }

    fn check_network(&self) -> Result<()> {
        if self.fail_network.load(Ordering::SeqCst) {
            Err(Error::backend("unable to connect to the recipe server"))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn resolve_token(&self, token: &str) -> Result<i64> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| Error::auth("authentication failed. Log in again"))
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        let token = format!("mock-token-{}", user_id);
        self.tokens.insert(token.clone(), user_id);
        token
    }
}

#[async_trait]
impl RecipeBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.check_network()?;
        let mut state = self.lock();

        let user = state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| Error::auth("unknown email or wrong password"))?;

        if password != DEMO_PASSWORD {
            return Err(Error::auth("unknown email or wrong password"));
        }

        let token = state.issue_token(user.id);
        Ok(AuthSession { user, token })
    }

    async fn signup(&self, signup: &SignupRequest) -> Result<AuthSession> {
        self.check_network()?;
        let mut state = self.lock();

        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&signup.email))
        {
            return Err(Error::validation("a record with these details already exists"));
        }

        let user = User {
            id: state.next_user_id,
            name: signup.name.clone(),
            email: signup.email.clone(),
            is_admin: false,
        };
        state.next_user_id += 1;
        state.users.push(user.clone());

        let token = state.issue_token(user.id);
        Ok(AuthSession { user, token })
    }

    async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeCard>> {
        self.check_network()?;
        let state = self.lock();

        let search = query.search.as_deref().map(str::to_lowercase);
        let cards = state
            .recipes
            .iter()
            .filter(|r| match &search {
                Some(q) => {
                    r.card.title.to_lowercase().contains(q)
                        || r.card.description.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter(|r| match &query.tag {
                Some(tag) => r.card.tags.contains(tag.as_str()),
                None => true,
            })
            .map(|r| r.card.clone())
            .collect();

        Ok(cards)
    }

    async fn get_recipe(&self, id: i64) -> Result<Recipe> {
        self.check_network()?;
        self.lock()
            .recipes
            .iter()
            .find(|r| r.card.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("recipe {} does not exist", id)))
    }

    async fn create_recipe(&self, token: &str, recipe: &NewRecipe) -> Result<Recipe> {
        self.check_network()?;
        let mut state = self.lock();
        let user_id = state.resolve_token(token)?;

        let author = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone());

        let created = Recipe {
            card: RecipeCard {
                id: state.next_recipe_id,
                title: recipe.title.clone(),
                description: recipe.description.clone(),
                image_urls: recipe.image_urls.clone(),
                average_rating: 0.0,
                rating_count: 0,
                tags: recipe.tags.clone(),
                is_favorited: false,
            },
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            author,
        };
        state.next_recipe_id += 1;
        state.recipes.push(created.clone());

        Ok(created)
    }

    async fn favorite_ids(&self, token: &str) -> Result<BTreeSet<i64>> {
        self.check_network()?;
        let state = self.lock();
        let user_id = state.resolve_token(token)?;
        Ok(state.favorites.get(&user_id).cloned().unwrap_or_default())
    }

    async fn favorite_recipes(&self, token: &str) -> Result<Vec<RecipeCard>> {
        self.check_network()?;
        let state = self.lock();
        let user_id = state.resolve_token(token)?;
        let ids = state.favorites.get(&user_id).cloned().unwrap_or_default();

        Ok(state
            .recipes
            .iter()
            .filter(|r| ids.contains(&r.card.id))
            .map(|r| r.card.clone())
            .collect())
    }

    async fn add_favorite(&self, token: &str, recipe_id: i64) -> Result<()> {
        self.check_network()?;
        if self.fail_favorites.load(Ordering::SeqCst) {
            return Err(Error::backend("recipe API error: HTTP 500"));
        }

        let mut state = self.lock();
        let user_id = state.resolve_token(token)?;
        if !state.recipes.iter().any(|r| r.card.id == recipe_id) {
            return Err(Error::not_found(format!("recipe {} does not exist", recipe_id)));
        }
        state.favorites.entry(user_id).or_default().insert(recipe_id);
        Ok(())
    }

    async fn remove_favorite(&self, token: &str, recipe_id: i64) -> Result<()> {
        self.check_network()?;
        if self.fail_favorites.load(Ordering::SeqCst) {
            return Err(Error::backend("recipe API error: HTTP 500"));
        }

        let mut state = self.lock();
        let user_id = state.resolve_token(token)?;
        if let Some(ids) = state.favorites.get_mut(&user_id) {
            ids.remove(&recipe_id);
        }
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>> {
        self.check_network()?;
        let state = self.lock();
        state.resolve_token(token)?;
        Ok(state.users.clone())
    }

    async fn delete_user(&self, token: &str, user_id: i64) -> Result<()> {
        self.check_network()?;
        let mut state = self.lock();
        state.resolve_token(token)?;

        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        if state.users.len() == before {
            return Err(Error::not_found(format!("user {} does not exist", user_id)));
        }
        state.favorites.remove(&user_id);
        state.tokens.retain(|_, id| *id != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn demo_token(backend: &MockBackend) -> String {
        backend
            .login(DEMO_EMAIL, DEMO_PASSWORD)
            .await
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let backend = MockBackend::new();
        assert!(backend.login(DEMO_EMAIL, "wrong").await.is_err());
        assert!(backend.login(DEMO_EMAIL, DEMO_PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_search_filters_by_title_and_tag() {
        let backend = MockBackend::new();

        let ramen = backend
            .list_recipes(&RecipeQuery {
                search: Some("ramen".to_string()),
                tag: None,
            })
            .await
            .unwrap();
        assert_eq!(ramen.len(), 1);
        assert_eq!(ramen[0].title, "Miso Ramen");

        let breakfast = backend
            .list_recipes(&RecipeQuery {
                search: None,
                tag: Some("breakfast".to_string()),
            })
            .await
            .unwrap();
        assert!(breakfast.iter().all(|c| c.tags.contains("breakfast")));
        assert_eq!(breakfast.len(), 2);
    }

    #[tokio::test]
    async fn test_favorites_round_trip() {
        let backend = MockBackend::new();
        let token = demo_token(&backend).await;

        // Starts seeded with {2, 6}
        backend.add_favorite(&token, 5).await.unwrap();
        backend.remove_favorite(&token, 2).await.unwrap();

        let ids = backend.favorite_ids(&token).await.unwrap();
        assert_eq!(ids, [5, 6].into_iter().collect());

        let cards = backend.favorite_recipes(&token).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().any(|c| c.id == 5));
    }

    #[tokio::test]
    async fn test_fail_favorites_switch() {
        let backend = MockBackend::new();
        let token = demo_token(&backend).await;

        backend.set_fail_favorites(true);
        assert!(backend.add_favorite(&token, 1).await.is_err());

        backend.set_fail_favorites(false);
        assert!(backend.add_favorite(&token, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_requires_existing_user() {
        let backend = MockBackend::new();
        let token = demo_token(&backend).await;

        assert!(backend.delete_user(&token, 99).await.is_err());
        backend.delete_user(&token, 2).await.unwrap();
        assert_eq!(backend.list_users(&token).await.unwrap().len(), 1);
    }
}
