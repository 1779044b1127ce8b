//! Login, signup and logout commands

use anyhow::Result;
use dialoguer::Password;

use super::get_context;
use crate::output;
use skillet_core::SignupRequest;

fn read_password(flag: Option<String>, prompt: &str) -> Result<String> {
    match flag {
        Some(p) => Ok(p),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}

pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password, "Password")?;
    let ctx = get_context()?;

    let outcome = ctx.auth_service.login(email, &password).await?;
    output::success(&format!("Signed in as {}", outcome.user.name));
    if let Some(advisory) = outcome.advisory {
        output::advisory(&advisory);
    }
    Ok(())
}

pub async fn signup(name: &str, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password, "Choose a password")?;
    let ctx = get_context()?;

    let request = SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        password,
    };
    let user = ctx.auth_service.signup(&request).await?;
    output::success(&format!("Welcome to Skillet, {}", user.name));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    if ctx.auth_service.logout()? {
        output::success("Signed out");
    } else {
        output::info("Nobody was signed in");
    }
    Ok(())
}
