//! Skillet CLI - Recipe box in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, demo, favorite, logs, new, plan, recipes, refresh, status, theme, users};
use skillet_core::services::AppEvent;

/// Skillet - recipe box in your terminal
#[derive(Parser)]
#[command(name = "sk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the recipe server
    Login {
        /// Account email
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Signup {
        /// Display name
        name: String,
        /// Account email
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show session, server and cache status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse and search recipes
    Recipes {
        /// Search text matched against title and description
        query: Option<String>,
        /// Only recipes carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one recipe in full
    Show {
        /// Recipe id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new recipe
    New {
        /// Recipe title
        title: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Ingredient line (repeatable)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        /// Preparation step (repeatable, in order)
        #[arg(short, long = "step")]
        steps: Vec<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Image URL (repeatable, first is the cover)
        #[arg(long = "image-url")]
        image_urls: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your favorite recipes
    Favorites {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a recipe to your favorites
    Favorite {
        /// Recipe id
        id: i64,
    },

    /// Remove a recipe from your favorites
    Unfavorite {
        /// Recipe id
        id: i64,
    },

    /// Manage the meal planner calendar
    Plan {
        #[command(subcommand)]
        command: plan::PlanCommands,
    },

    /// Manage user accounts (admin)
    Users {
        #[command(subcommand)]
        command: users::UserCommands,
    },

    /// Refresh the local recipe cache from the server
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Switch between dark and light theme
    Theme {
        /// "dark" or "light"; omit to show the current theme
        mode: Option<String>,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// Show recent application events
    Logs {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Signup { .. } => "signup",
            Commands::Logout => "logout",
            Commands::Status { .. } => "status",
            Commands::Recipes { .. } => "recipes",
            Commands::Show { .. } => "show",
            Commands::New { .. } => "new",
            Commands::Favorites { .. } => "favorites",
            Commands::Favorite { .. } => "favorite",
            Commands::Unfavorite { .. } => "unfavorite",
            Commands::Plan { .. } => "plan",
            Commands::Users { .. } => "users",
            Commands::Refresh { .. } => "refresh",
            Commands::Theme { .. } => "theme",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = commands::get_logger();
    let command_name = cli.command.name();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            commands::log_event(
                &logger,
                AppEvent::new("command_error")
                    .with_command(command_name)
                    .with_error(e.to_string())
                    .with_error_details(format!("{:#}", e)),
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password } => auth::login(&email, password).await,
        Commands::Signup {
            name,
            email,
            password,
        } => auth::signup(&name, &email, password).await,
        Commands::Logout => auth::logout(),
        Commands::Status { json } => status::run(json).await,
        Commands::Recipes { query, tag, json } => recipes::list(query, tag, json).await,
        Commands::Show { id, json } => recipes::show(id, json).await,
        Commands::New {
            title,
            description,
            ingredients,
            steps,
            tags,
            image_urls,
            json,
        } => new::run(title, description, ingredients, steps, tags, image_urls, json).await,
        Commands::Favorites { json } => favorite::list(json).await,
        Commands::Favorite { id } => favorite::set(id, true).await,
        Commands::Unfavorite { id } => favorite::set(id, false).await,
        Commands::Plan { command } => plan::run(command).await,
        Commands::Users { command } => users::run(command).await,
        Commands::Refresh { json } => refresh::run(json).await,
        Commands::Theme { mode } => theme::run(mode.as_deref()),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { limit, json } => logs::run(limit, json),
    }
}
