//! Users command - admin user management

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all user accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a user account
    Delete {
        /// User id to delete
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: UserCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        UserCommands::List { json } => {
            let users = ctx.admin_service.list_users().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Email", "Role"]);
            for user in &users {
                table.add_row(vec![
                    user.id.to_string(),
                    user.name.clone(),
                    user.email.clone(),
                    if user.is_admin {
                        "admin".to_string()
                    } else {
                        String::new()
                    },
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        UserCommands::Delete { id, force } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete user {} and all of their data? This cannot be undone",
                        id
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            ctx.admin_service.delete_user(id).await?;
            println!("{} user {}", "Deleted".green(), id);
            Ok(())
        }
    }
}
