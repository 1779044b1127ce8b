//! Integration tests exercising services end to end against the mock
//! backend, a real temp-dir session file and a real DuckDB cache.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use skillet_core::adapters::duckdb::DuckDbCache;
use skillet_core::adapters::mock::{MockBackend, DEMO_EMAIL, DEMO_PASSWORD};
use skillet_core::services::{
    AuthService, FavoriteService, PlannerService, RecipeService, SyncService,
};
use skillet_core::{FavoriteState, MealSlot, RecipeQuery, SessionStore};

struct Harness {
    _dir: TempDir,
    backend: Arc<MockBackend>,
    session: Arc<SessionStore>,
    cache: Arc<DuckDbCache>,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(MockBackend::new());
        let session = Arc::new(SessionStore::open(dir.path()).unwrap());
        let cache = Arc::new(open_cache(dir.path()));
        Self {
            _dir: dir,
            backend,
            session,
            cache,
        }
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.backend.clone(), self.session.clone())
    }

    fn recipes(&self) -> RecipeService {
        RecipeService::new(self.backend.clone(), self.cache.clone(), self.session.clone())
    }

    fn favorites(&self) -> FavoriteService {
        FavoriteService::new(self.backend.clone(), self.session.clone())
    }

    fn planner(&self) -> PlannerService {
        PlannerService::new(self.backend.clone(), self.cache.clone())
    }

    fn sync(&self) -> SyncService {
        SyncService::new(self.backend.clone(), self.cache.clone())
    }

    async fn login(&self) {
        self.auth().login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    }
}

fn open_cache(dir: &Path) -> DuckDbCache {
    let cache = DuckDbCache::new(&dir.join("cache.duckdb")).unwrap();
    cache.ensure_schema().unwrap();
    cache
}

#[tokio::test]
async fn login_primes_favorites_and_annotates_cards() {
    let h = Harness::new();
    h.login().await;

    // The demo account starts with favorites on the server
    let ids = h.session.favorite_ids().expect("favorites primed at login");
    assert!(!ids.is_empty());

    let listing = h.recipes().list(&RecipeQuery::default()).await.unwrap();
    assert!(listing.advisory.is_none());
    for card in &listing.cards {
        assert_eq!(card.is_favorited, ids.contains(&card.id));
    }
}

#[tokio::test]
async fn toggle_off_then_on_restores_original_state() {
    let h = Harness::new();
    h.login().await;

    let favorites = h.favorites();
    let id = *h.session.favorite_ids().unwrap().iter().next().unwrap();

    let off = favorites
        .toggle(id, FavoriteState::Favorited)
        .await
        .unwrap();
    assert!(!off.reverted);
    assert_eq!(off.state, FavoriteState::NotFavorited);
    assert!(!h.session.favorite_ids().unwrap().contains(&id));

    let on = favorites.toggle(id, off.state).await.unwrap();
    assert!(!on.reverted);
    assert_eq!(on.state, FavoriteState::Favorited);
    assert!(h.session.favorite_ids().unwrap().contains(&id));
}

#[tokio::test]
async fn failed_toggle_reverts_and_keeps_session_unchanged() {
    let h = Harness::new();
    h.login().await;

    let before = h.session.favorite_ids().unwrap();
    let id = *before.iter().next().unwrap();

    h.backend.set_fail_favorites(true);
    let outcome = h
        .favorites()
        .toggle(id, FavoriteState::Favorited)
        .await
        .unwrap();

    assert!(outcome.reverted);
    assert_eq!(outcome.state, FavoriteState::Favorited);
    let advisory = outcome.advisory.expect("revert carries an advisory");
    assert!(advisory.is_warning());
    assert_eq!(h.session.favorite_ids().unwrap(), before);
}

#[tokio::test]
async fn toggle_from_unknown_state_is_rejected() {
    let h = Harness::new();
    h.login().await;

    let result = h.favorites().toggle(1, FavoriteState::Unknown).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn logout_clears_favorites_so_nothing_is_annotated() {
    let h = Harness::new();
    h.login().await;
    assert!(h.auth().logout().unwrap());

    assert!(h.session.favorite_ids().is_none());
    assert!(!h.session.is_logged_in());

    // Signed out, every card renders as not favorited
    let listing = h.recipes().list(&RecipeQuery::default()).await.unwrap();
    assert!(listing.cards.iter().all(|c| !c.is_favorited));
}

#[tokio::test]
async fn unreachable_server_falls_back_to_cached_recipes() {
    let h = Harness::new();
    h.sync().refresh().await.unwrap();

    h.backend.set_fail_network(true);
    let listing = h.recipes().list(&RecipeQuery::default()).await.unwrap();
    assert!(listing.advisory.as_ref().unwrap().is_warning());
    assert!(!listing.cards.is_empty());

    // Tag filters cannot be applied against the cache
    let filtered = h
        .recipes()
        .list(&RecipeQuery {
            search: None,
            tag: Some("dinner".to_string()),
        })
        .await;
    assert!(filtered.is_err());
}

#[tokio::test]
async fn refresh_counts_new_then_updated() {
    let h = Harness::new();

    let first = h.sync().refresh().await.unwrap();
    assert!(first.discovered > 0);
    assert_eq!(first.new, first.discovered);
    assert_eq!(first.updated, 0);

    let second = h.sync().refresh().await.unwrap();
    assert_eq!(second.new, 0);
    assert_eq!(second.updated, second.discovered);
}

#[tokio::test]
async fn planned_meals_survive_reopening_the_cache() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::new());
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    {
        let cache = Arc::new(open_cache(dir.path()));
        let planner = PlannerService::new(backend.clone(), cache);
        let meal = planner
            .plan_meal(date, MealSlot::Dinner, 1)
            .await
            .unwrap();
        assert_eq!(meal.recipe_id, 1);
        assert!(!meal.recipe_title.is_empty());
    }

    // Fresh connection over the same file
    let cache = Arc::new(open_cache(dir.path()));
    let planner = PlannerService::new(backend, cache);
    let grid = planner.month(2026, 3).unwrap();

    let day = grid
        .weeks
        .iter()
        .flatten()
        .find(|d| d.date == date)
        .unwrap();
    assert_eq!(day.meals.len(), 1);
    assert_eq!(day.meals[0].slot, MealSlot::Dinner);
}

#[tokio::test]
async fn planning_over_a_slot_replaces_the_meal() {
    let h = Harness::new();
    let planner = h.planner();
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    planner.plan_meal(date, MealSlot::Lunch, 1).await.unwrap();
    planner.plan_meal(date, MealSlot::Lunch, 2).await.unwrap();

    let grid = planner.month(2026, 3).unwrap();
    let day = grid
        .weeks
        .iter()
        .flatten()
        .find(|d| d.date == date)
        .unwrap();
    assert_eq!(day.meals.len(), 1);
    assert_eq!(day.meals[0].recipe_id, 2);

    assert!(planner.unplan(date, MealSlot::Lunch).unwrap());
    assert!(!planner.unplan(date, MealSlot::Lunch).unwrap());
}

#[tokio::test]
async fn schema_setup_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(dir.path());
    // Running again on the same connection applies nothing new
    cache.ensure_schema().unwrap();
    assert_eq!(cache.recipe_count().unwrap(), 0);
}
