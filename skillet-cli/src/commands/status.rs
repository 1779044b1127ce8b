//! Status command - session, server and cache summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let session = ctx.session.snapshot();
    let recipe_count = ctx.cache.recipe_count().unwrap_or(0);
    let meal_count = ctx.cache.meal_count().unwrap_or(0);
    let favorite_count = session.favorite_ids.as_ref().map(|ids| ids.len());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "demoMode": ctx.config.demo_mode,
                "server": ctx.backend.name(),
                "serverUrl": ctx.config.server_url,
                "loggedIn": session.user_id.is_some(),
                "userName": session.user_name,
                "favoriteCount": favorite_count,
                "darkMode": session.dark_mode,
                "cachedRecipes": recipe_count,
                "plannedMeals": meal_count,
            })
        );
        return Ok(());
    }

    println!("{}", "Skillet".bold());
    if ctx.config.demo_mode {
        println!("  Mode: {}", "demo".yellow());
    } else {
        println!("  Server: {}", ctx.config.server_url);
    }

    match ctx.auth_service.current_user() {
        Some(user) => println!("  Signed in as: {} (id {})", user.name, user.id),
        None => println!("  {}", "Not signed in".yellow()),
    }

    match favorite_count {
        Some(n) => println!("  Favorites: {}", n),
        None if session.user_id.is_some() => println!("  Favorites: not loaded yet"),
        None => {}
    }

    println!(
        "  Theme: {}",
        if session.dark_mode { "dark" } else { "light" }
    );
    println!("  Cached recipes: {}", recipe_count);
    println!("  Planned meals: {}", meal_count);

    Ok(())
}
