//! New command - create a recipe

use anyhow::Result;

use super::get_context;
use crate::output;
use skillet_core::NewRecipe;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    title: String,
    description: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    tags: Vec<String>,
    image_urls: Vec<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let new_recipe = NewRecipe {
        title,
        description,
        ingredients,
        steps,
        tags: tags.into_iter().collect(),
        image_urls,
    };
    let recipe = ctx.recipe_service.create(&new_recipe).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    output::success(&format!(
        "Created recipe {} (id {})",
        recipe.card.title, recipe.card.id
    ));
    Ok(())
}
