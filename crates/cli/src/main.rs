//! Fashionary CLI - catalog inspection and try-on tools.
//!
//! # Usage
//!
//! ```bash
//! # List products, cheapest first
//! fash-cli products --sort-by price --order asc
//!
//! # List users and their ids
//! fash-cli users
//! fash-cli user-ids
//!
//! # Show one user's display record
//! fash-cli user 6f1c0c3e-...
//!
//! # Generate a try-on image and save it
//! fash-cli try-on --user 6f1c0c3e-... --product 1a2b3c4d-... --output look.jpg
//! ```
//!
//! # Commands
//!
//! - `products` - List product summaries
//! - `users` - List user summaries
//! - `user-ids` - List every user id
//! - `user` - Show a user's display record
//! - `try-on` - Generate a try-on image and write the decoded bytes to a file
//!
//! The backend is read from `FASHIONARY_BACKEND_URL` (or `BACKEND_URL`)
//! unless `--backend-url` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fashionary_storefront::backend::{BackendClient, SortField, SortOrder};
use fashionary_storefront::config::BackendConfig;

mod commands;

#[derive(Parser)]
#[command(name = "fash-cli")]
#[command(author, version, about = "Fashionary CLI tools")]
struct Cli {
    /// Backend base URL (overrides `FASHIONARY_BACKEND_URL`)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product summaries
    Products {
        /// Sort field (`stock`, `price`, `created_at`)
        #[arg(long)]
        sort_by: Option<SortField>,

        /// Sort order (`asc`, `desc`)
        #[arg(long, default_value = "asc", requires = "sort_by")]
        order: SortOrder,
    },
    /// List user summaries
    Users,
    /// List every user id
    UserIds,
    /// Show a user's display record
    User {
        /// User id
        id: String,
    },
    /// Generate a try-on image
    TryOn {
        /// Model (user) id
        #[arg(short, long)]
        user: String,

        /// Product id
        #[arg(short, long)]
        product: String,

        /// File to write the generated image to
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = match cli.backend_url.as_deref() {
        Some(url) => BackendConfig::new(url)?,
        None => BackendConfig::from_env()?,
    };
    let backend = BackendClient::new(&config)?;
    tracing::debug!(backend = %backend.base_url(), "Using backend");

    match cli.command {
        Commands::Products { sort_by, order } => {
            commands::catalog::products(&backend, sort_by.map(|field| (field, order))).await?;
        }
        Commands::Users => commands::catalog::users(&backend).await?,
        Commands::UserIds => commands::catalog::user_ids(&backend).await?,
        Commands::User { id } => commands::catalog::user(&backend, &id).await?,
        Commands::TryOn {
            user,
            product,
            output,
        } => {
            commands::try_on::generate(&backend, &user, &product, &output).await?;
        }
    }
    Ok(())
}
