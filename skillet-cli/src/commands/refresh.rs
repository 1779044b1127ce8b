//! Refresh command - pull the recipe list into the local cache

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let spinner = if json || !atty::is(atty::Stream::Stdout) {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Refreshing recipes...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    };

    let result = ctx.sync_service.refresh().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::success(&format!("Refreshed {} recipes", result.discovered));
    println!("  New: {}", result.new);
    println!("  Updated: {}", result.updated);

    Ok(())
}
