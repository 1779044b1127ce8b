//! Favorites commands - list favorites, favorite and unfavorite recipes

use anyhow::Result;

use super::get_context;
use crate::output;

pub async fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let cards = ctx.favorite_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No favorites yet. Use 'sk favorite <id>' to add one.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Rating", "Tags"]);
    for card in &cards {
        table.add_row(vec![
            card.id.to_string(),
            card.title.clone(),
            output::format_rating(card.average_rating, card.rating_count),
            card.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        ]);
    }
    println!("{}", table);

    Ok(())
}

pub async fn set(id: i64, favorited: bool) -> Result<()> {
    let ctx = get_context()?;
    let outcome = ctx.favorite_service.set_favorite(id, favorited).await?;

    if let Some(advisory) = &outcome.advisory {
        output::advisory(advisory);
    }

    // The change rolled back; exit non-zero so scripts notice
    if outcome.reverted {
        std::process::exit(1);
    }
    Ok(())
}
