//! Recipes command - browse, search and show recipes

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;
use skillet_core::RecipeQuery;

pub async fn list(query: Option<String>, tag: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let listing = ctx
        .recipe_service
        .list(&RecipeQuery { search: query, tag })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.cards)?);
        return Ok(());
    }

    if let Some(advisory) = &listing.advisory {
        output::advisory(advisory);
    }

    if listing.cards.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Rating", "Tags", ""]);
    for card in &listing.cards {
        table.add_row(vec![
            card.id.to_string(),
            card.title.clone(),
            output::format_rating(card.average_rating, card.rating_count),
            card.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            output::favorite_marker(card.is_favorited),
        ]);
    }
    println!("{}", table);

    Ok(())
}

pub async fn show(id: i64, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let recipe = ctx.recipe_service.get(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let marker = output::favorite_marker(recipe.card.is_favorited);
    println!("{} {}", recipe.card.title.bold(), marker);
    if let Some(author) = &recipe.author {
        println!("{}", format!("by {}", author).dimmed());
    }
    println!(
        "Rating: {}",
        output::format_rating(recipe.card.average_rating, recipe.card.rating_count)
    );
    if !recipe.card.tags.is_empty() {
        println!(
            "Tags: {}",
            recipe.card.tags.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    if !recipe.card.description.is_empty() {
        println!();
        println!("{}", recipe.card.description);
    }

    if !recipe.ingredients.is_empty() {
        println!();
        println!("{}", "Ingredients".bold());
        for ingredient in &recipe.ingredients {
            println!("  - {}", ingredient);
        }
    }

    if !recipe.steps.is_empty() {
        println!();
        println!("{}", "Steps".bold());
        for (i, step) in recipe.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    Ok(())
}
