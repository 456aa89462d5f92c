//! Green Papaya CLI - drives the storefront core from a terminal.
//!
//! The CLI stands in for the view layer: it hydrates the session store,
//! browses products, and runs an interactive cart session against the
//! remote commerce API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session persists in GP_STATE_DIR across invocations)
//! gp-cli login -e owner@example.com -p secret
//!
//! # Browse
//! gp-cli products list
//! gp-cli products show 6632f1a2b3c4
//! gp-cli products search Electronics
//!
//! # Interactive cart session
//! gp-cli cart
//!
//! # Sign out
//! gp-cli logout
//! ```
//!
//! # Environment Variables
//!
//! - `GP_API_BASE_URL` - Commerce API root (required)
//! - `GP_STATE_DIR` - Persisted session location (default: `.green-papaya`)

#![cfg_attr(not(test), forbid(unsafe_code))]
// A terminal frontend talks through stdout.
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gp-cli")]
#[command(author, version, about = "Green Papaya storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an existing account
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account and sign in
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show the current session
    Whoami,
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Run an interactive cart session
    Cart,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all published products
    List,
    /// Show a single product by ID
    Show {
        /// Product ID
        id: String,
    },
    /// Search products by category
    Search {
        /// Category name (e.g., Electronics)
        category: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gp_cli=info,green_papaya_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, &password).await,
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(&name, &email, &password).await,
        Commands::Logout => commands::auth::logout().await,
        Commands::Whoami => commands::auth::whoami(),
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await,
            ProductsAction::Show { id } => commands::products::show(&id).await,
            ProductsAction::Search { category } => commands::products::search(&category).await,
        },
        Commands::Cart => commands::cart::interactive().await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
