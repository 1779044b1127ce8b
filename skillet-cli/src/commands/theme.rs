//! Theme command - dark/light preference stored in the session file

use anyhow::{anyhow, Result};

use super::get_context;
use crate::output;

pub fn run(mode: Option<&str>) -> Result<()> {
    let ctx = get_context()?;

    match mode {
        None => {
            let current = if ctx.session.dark_mode() {
                "dark"
            } else {
                "light"
            };
            println!("Theme is {}", current);
            Ok(())
        }
        Some("dark") => {
            ctx.session.set_dark_mode(true)?;
            output::success("Theme set to dark");
            Ok(())
        }
        Some("light") => {
            ctx.session.set_dark_mode(false)?;
            output::success("Theme set to light");
            Ok(())
        }
        Some(other) => Err(anyhow!("unknown theme '{}', expected dark or light", other)),
    }
}
