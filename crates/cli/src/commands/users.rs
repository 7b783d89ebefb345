//! `users` subcommands.

use clap::Subcommand;
use lunchdesk_client::Console;
use lunchdesk_core::{Pager, UserId};

use super::{CliError, Credentials, authenticate, confirmer, print_deleted, print_json};

#[derive(Subcommand)]
pub enum UserAction {
    /// List customers
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one customer
    Show { id: String },
    /// Delete a customer
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(console: &Console, credentials: Credentials, action: UserAction) -> Result<(), CliError> {
    authenticate(console, credentials).await?;

    match action {
        UserAction::List { page } => {
            let pager = Pager::at(page, console.pager().limit());
            print_json(&*console.users(&pager).await?)
        }
        UserAction::Show { id } => print_json(&*console.user(&UserId::new(id)).await?),
        UserAction::Delete { id, yes } => {
            let outcome = console
                .delete_user(&UserId::new(id), confirmer(yes))
                .await?;
            print_deleted(&outcome)
        }
    }
}
