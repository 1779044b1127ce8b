//! Port definitions for external dependencies

pub mod backend;

pub use backend::{RecipeBackend, RecipeQuery};
