// Command-line definition. Option names keep the snake_case spelling the
// ordering agent's tools use; kebab-case aliases are accepted too.

use clap::{Args, Parser, Subcommand};

use crate::operation::{Operation, OrderPayload};

/// Local simulator for the pizza ordering agent's tool endpoints.
#[derive(Parser, Debug)]
#[command(name = "pizza-sim")]
#[command(about = "Simulate the pizza ordering agent's tool calls")]
#[command(long_about = r#"
Calls the menu, create-order and order-status endpoints the ordering agent
uses, retrying once against a fallback endpoint when the primary is down.

Endpoints are read from SIM_MENU_URL, SIM_CREATE_URL, SIM_STATUS_URL,
SIM_FALLBACK_CREATE and SIM_FALLBACK_STATUS. SIM_TIMEOUT_SECS sets the
per-request timeout (default 10).

Examples:
  pizza-sim menu
  pizza-sim create --pizza_type Margherita --size Large --quantity 2
  pizza-sim status --order_id 12345
"#)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log request details to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and pretty-print the menu JSON.
    Menu,

    /// Simulate creating an order (POST).
    Create(CreateArgs),

    /// Simulate checking order status (GET).
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long = "pizza_type", alias = "pizza-type")]
    pub pizza_type: String,

    #[arg(long)]
    pub size: String,

    #[arg(long)]
    pub quantity: u32,

    #[arg(long = "customer_name", alias = "customer-name", default_value = "Test User")]
    pub customer_name: String,

    #[arg(long = "delivery_address", alias = "delivery-address", default_value = "123 Main St")]
    pub delivery_address: String,

    #[arg(long = "phone_number", alias = "phone-number", default_value = "555-0123")]
    pub phone_number: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[arg(long = "order_id", alias = "order-id")]
    pub order_id: String,
}

impl Commands {
    /// The operation this command performs.
    pub fn into_operation(self) -> Operation {
        match self {
            Commands::Menu => Operation::FetchMenu,
            Commands::Create(args) => Operation::CreateOrder(OrderPayload {
                pizza_type: args.pizza_type,
                size: args.size,
                quantity: args.quantity,
                customer_name: args.customer_name,
                delivery_address: args.delivery_address,
                phone_number: args.phone_number,
            }),
            Commands::Status(args) => Operation::CheckStatus {
                order_id: args.order_id,
            },
        }
    }
}
