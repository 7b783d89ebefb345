//! `locations` subcommands.

use clap::Subcommand;
use lunchdesk_client::Console;
use lunchdesk_core::{LocationId, Pager};
use lunchdesk_core::forms::LocationForm;

use super::{CliError, Credentials, authenticate, confirmer, print_deleted, print_json};

#[derive(Subcommand)]
pub enum LocationAction {
    /// List locations
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Create a location
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
    },
    /// Change a location's name and address
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
    },
    /// Activate or deactivate a location
    Toggle {
        id: String,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Delete a location
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(console: &Console, credentials: Credentials, action: LocationAction) -> Result<(), CliError> {
    authenticate(console, credentials).await?;

    match action {
        LocationAction::List { page } => {
            let pager = Pager::at(page, console.pager().limit());
            print_json(&*console.locations(&pager).await?)
        }
        LocationAction::Create { name, address } => {
            let location = console
                .create_location(&LocationForm { name, address })
                .await?;
            print_json(&location)
        }
        LocationAction::Update { id, name, address } => {
            let location = console
                .update_location(&LocationId::new(id), &LocationForm { name, address })
                .await?;
            print_json(&location)
        }
        LocationAction::Toggle { id, active } => {
            let location = console
                .set_location_active(&LocationId::new(id), active)
                .await?;
            print_json(&location)
        }
        LocationAction::Delete { id, yes } => {
            let outcome = console
                .delete_location(&LocationId::new(id), confirmer(yes))
                .await?;
            print_deleted(&outcome)
        }
    }
}
