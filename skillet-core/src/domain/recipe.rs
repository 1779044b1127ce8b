//! Recipe domain models

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Summary representation of a recipe used in list views
///
/// Transient: constructed fresh per fetch. `is_favorited` is overlaid from
/// the session's favorite set at render time and is never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Ordered - the first URL is the cover image
    pub image_urls: Vec<String>,
    pub average_rating: f64,
    pub rating_count: i64,
    pub tags: BTreeSet<String>,
    pub is_favorited: bool,
}

impl RecipeCard {
    /// Overlay the favorite flag from a locally known favorite-ID set
    pub fn annotate(&mut self, favorite_ids: &BTreeSet<i64>) {
        self.is_favorited = favorite_ids.contains(&self.id);
    }
}

/// Overlay favorite flags on a whole list of cards
pub fn annotate_cards(cards: &mut [RecipeCard], favorite_ids: &BTreeSet<i64>) {
    for card in cards.iter_mut() {
        card.annotate(favorite_ids);
    }
}

/// Full recipe as shown on the detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(flatten)]
    pub card: RecipeCard,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub author: Option<String>,
}

/// Payload for creating a new recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub tags: BTreeSet<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl NewRecipe {
    /// Validate recipe data before sending it to the backend
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("recipe title cannot be empty");
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err("recipe needs at least one ingredient");
        }
        if self.steps.iter().all(|s| s.trim().is_empty()) {
            return Err("recipe needs at least one step");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64) -> RecipeCard {
        RecipeCard {
            id,
            title: format!("Recipe {}", id),
            description: String::new(),
            image_urls: Vec::new(),
            average_rating: 0.0,
            rating_count: 0,
            tags: BTreeSet::new(),
            is_favorited: false,
        }
    }

    #[test]
    fn test_annotate_matches_set_membership() {
        let favorites: BTreeSet<i64> = [1, 3].into_iter().collect();
        let mut cards = vec![card(1), card(2), card(3)];
        annotate_cards(&mut cards, &favorites);

        for c in &cards {
            assert_eq!(c.is_favorited, favorites.contains(&c.id));
        }
    }

    #[test]
    fn test_annotate_clears_stale_flag() {
        let mut c = card(7);
        c.is_favorited = true;
        c.annotate(&BTreeSet::new());
        assert!(!c.is_favorited);
    }

    #[test]
    fn test_new_recipe_validation() {
        let mut recipe = NewRecipe {
            title: "Shakshuka".to_string(),
            ingredients: vec!["eggs".to_string()],
            steps: vec!["simmer".to_string()],
            ..Default::default()
        };
        assert!(recipe.validate().is_ok());

        recipe.title = "  ".to_string();
        assert!(recipe.validate().is_err());

        recipe.title = "Shakshuka".to_string();
        recipe.ingredients.clear();
        assert!(recipe.validate().is_err());
    }
}
