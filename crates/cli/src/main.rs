//! Francine CLI - browse, shop and manage the catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! francine products
//!
//! # Fill the cart and check out as a guest
//! francine cart add 3
//! francine checkout --name "Ana Cruz" --email ana@example.com
//!
//! # Log in and manage the catalog
//! francine login --email admin@example.com
//! francine admin create --name "Desk Lamp" --price 899.00 --image lamp.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `FRANCINE_API_BASE` - Backend origin (default `http://localhost:5000`)
//! - `FRANCINE_HOME` - Directory holding the cart and session
//! - `FRANCINE_HTTP_TIMEOUT_SECS` - Per-request timeout
//! - `SENTRY_DSN` - Enables error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use francine_core::{Price, ProductId};
use francine_storefront::config::ClientConfig;
use francine_storefront::models::ProductDraft;
use francine_storefront::services::CheckoutForm;
use francine_storefront::{AppError, Storefront};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "francine")]
#[command(author, version, about = "Francine storefront")]
struct Cli {
    /// Backend origin, overriding `FRANCINE_API_BASE`
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Products,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a guest order for the cart
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,

        /// Contact phone
        #[arg(short, long)]
        phone: Option<String>,

        /// Delivery address
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Log in
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(long, env = "FRANCINE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a customer account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(long, env = "FRANCINE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the cached session
    Logout,
    /// Show the cached session
    Whoami,
    /// Manage the catalog (admin session required)
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a catalog product
    Add {
        /// Product ID as listed by `francine products`
        id: ProductId,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List products with their IDs
    List,
    /// Add a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Replace a product's fields
    Update {
        /// Product ID
        id: ProductId,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: ProductId,
    },
}

#[derive(clap::Args)]
struct ProductFields {
    /// Product name
    #[arg(short, long)]
    name: String,

    /// Product description
    #[arg(short, long, default_value = "")]
    description: String,

    /// Unit price
    #[arg(short, long)]
    price: Price,

    /// Image file to upload
    #[arg(short, long)]
    image: Option<PathBuf>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&AppError::from(e).user_message());
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "francine=info,francine_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        output::error(&e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), AppError> {
    let config = match cli.api_base.as_deref() {
        Some(raw) => config.with_api_base(raw)?,
        None => config,
    };
    let mut storefront = Storefront::open(config)?;

    match cli.command {
        Commands::Products => commands::products::list(&mut storefront).await,
        Commands::Cart { action } => match action {
            CartAction::Show => {
                commands::cart::show(&storefront);
                Ok(())
            }
            CartAction::Add { id } => commands::cart::add(&mut storefront, &id).await,
            CartAction::Remove { id } => commands::cart::remove(&mut storefront, &id),
            CartAction::Clear => commands::cart::clear(&mut storefront),
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
        } => {
            let form = CheckoutForm {
                name,
                email,
                phone,
                address,
            };
            commands::checkout::submit(&mut storefront, &form).await
        }
        Commands::Login { email, password } => {
            commands::auth::login(&mut storefront, &email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&mut storefront, &name, &email, password).await,
        Commands::Logout => commands::auth::logout(&mut storefront),
        Commands::Whoami => {
            commands::auth::whoami(&storefront);
            Ok(())
        }
        Commands::Admin { action } => match action {
            AdminCommand::List => commands::admin::list(&storefront).await,
            AdminCommand::Create { fields } => {
                commands::admin::create(&mut storefront, fields.into_draft()).await
            }
            AdminCommand::Update { id, fields } => {
                commands::admin::update(&mut storefront, &id, fields.into_draft()).await
            }
            AdminCommand::Delete { id } => commands::admin::delete(&mut storefront, &id).await,
        },
    }
}

impl ProductFields {
    fn into_draft(self) -> ProductDraft {
        let draft = ProductDraft::new(self.name, self.description, self.price);
        match self.image {
            Some(path) => draft.with_image(path),
            None => draft,
        }
    }
}
