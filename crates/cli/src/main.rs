//! Lunchdesk CLI - scripting access to the catering admin API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and print a token to reuse
//! LUNCHDESK_EMAIL=admin@lunch.example LUNCHDESK_PASSWORD=... lunchdesk login
//!
//! # Dashboard counters
//! LUNCHDESK_TOKEN=... lunchdesk stats
//!
//! # Monday's meals, page 2
//! lunchdesk meals list --day monday --page 2
//!
//! # Deactivate a location
//! lunchdesk locations toggle 665f1c2e --active false
//!
//! # Delete without prompting
//! lunchdesk users delete 665f1c2e --yes
//! ```
//!
//! # Commands
//!
//! - `login` - Exchange credentials for a bearer token
//! - `stats` - Dashboard summary
//! - `locations`, `meals`, `users`, `orders` - Resource management
//! - `password` - Forgot/reset/change password
//! - `profile update` - Update the admin profile
//!
//! Results are printed to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use lunchdesk_client::{ClientConfig, Console};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lunchdesk")]
#[command(author, version, about = "Lunchdesk admin API tools")]
struct Cli {
    /// Admin API base URL (overrides `LUNCHDESK_BASE_URL`)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Commands,
}

/// How to authenticate. A token wins over email and password.
#[derive(Args)]
struct AuthArgs {
    /// Bearer token from a previous `lunchdesk login`
    #[arg(long, global = true, env = "LUNCHDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Admin email address
    #[arg(long, global = true, env = "LUNCHDESK_EMAIL")]
    email: Option<String>,

    /// Admin password
    #[arg(long, global = true, env = "LUNCHDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print the bearer token
    Login,
    /// Show dashboard counters
    Stats,
    /// Manage delivery locations
    Locations {
        #[command(subcommand)]
        action: commands::locations::LocationAction,
    },
    /// Manage meals
    Meals {
        #[command(subcommand)]
        action: commands::meals::MealAction,
    },
    /// Manage customers
    Users {
        #[command(subcommand)]
        action: commands::users::UserAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Password reset and change
    Password {
        #[command(subcommand)]
        action: commands::account::PasswordAction,
    },
    /// Admin profile
    Profile {
        #[command(subcommand)]
        action: commands::account::ProfileAction,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lunchdesk=info".into());

    // Logs go to stderr so stdout stays machine-readable
    let json = std::env::var("LUNCHDESK_LOG_JSON").is_ok_and(|v| v != "0" && !v.is_empty());
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = ClientConfig::with_base_url(base_url)?.base_url;
    }
    let console = Console::new(&config)?;
    let auth = commands::Credentials {
        token: cli.auth.token.map(SecretString::from),
        email: cli.auth.email,
        password: cli.auth.password.map(SecretString::from),
    };

    match cli.command {
        Commands::Login => commands::session::login(&console, auth).await?,
        Commands::Stats => commands::session::stats(&console, auth).await?,
        Commands::Locations { action } => commands::locations::run(&console, auth, action).await?,
        Commands::Meals { action } => commands::meals::run(&console, auth, action).await?,
        Commands::Users { action } => commands::users::run(&console, auth, action).await?,
        Commands::Orders { action } => commands::orders::run(&console, auth, action).await?,
        Commands::Password { action } => commands::account::password(&console, auth, action).await?,
        Commands::Profile { action } => commands::account::profile(&console, auth, action).await?,
    }
    Ok(())
}
