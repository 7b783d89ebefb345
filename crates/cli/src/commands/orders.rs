//! `orders` subcommands.

use clap::Subcommand;
use lunchdesk_client::{Console, OrderQuery};
use lunchdesk_core::{OrderId, OrderStatus};

use super::{CliError, Credentials, authenticate, print_json};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Free-text filter passed to the server
        #[arg(short, long)]
        filter: Option<String>,
        /// Only orders with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Set an order's status
    SetStatus { id: String, status: String },
}

pub async fn run(console: &Console, credentials: Credentials, action: OrderAction) -> Result<(), CliError> {
    authenticate(console, credentials).await?;

    match action {
        OrderAction::List { page, filter, status } => {
            let query = OrderQuery {
                page: page.max(1),
                filter,
                status: status.map(OrderStatus::new),
                ..OrderQuery::new(console.pager().limit())
            };
            print_json(&*console.orders(&query).await?)
        }
        OrderAction::SetStatus { id, status } => {
            let order = console
                .update_order_status(&OrderId::new(id), OrderStatus::new(status))
                .await?;
            print_json(&order)
        }
    }
}
