//! # Register Library
//!
//! Wiring for the cashier command line.
//!
//! ## Module Organization
//! ```text
//! register_lib/
//! ├── lib.rs          ◄─── You are here (arguments, tracing, dispatch)
//! ├── context.rs      ◄─── Config + session store + API client
//! ├── format.rs       ◄─── Terminal rendering of bills and totals
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── auth.rs     ◄─── login / logout / whoami
//!     ├── bill.rs     ◄─── suggest / bill (compose + submit)
//!     └── reports.rs  ◄─── bills / show / summary
//! ```

pub mod commands;
pub mod context;
pub mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use billing_client::ClientConfig;
use commands::bill::BillArgs;
use context::AppContext;

#[derive(Parser)]
#[command(name = "register")]
#[command(about = "Retail billing register", version)]
pub struct CommandLine {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Product name suggestions
    #[command(alias = "s")]
    Suggest { query: String },
    /// Compose and submit a bill
    #[command(alias = "b")]
    Bill(BillArgs),
    /// List today's bills
    Bills,
    /// Show one bill
    Show { bill_id: i64 },
    /// Today's totals
    Summary,
}

/// Parses arguments and runs one command.
pub async fn run() -> anyhow::Result<()> {
    let cli = CommandLine::parse();

    init_tracing();

    let config = match cli.config {
        Some(path) => ClientConfig::load(Some(path))?,
        None => ClientConfig::load_or_default(None),
    };
    info!(base_url = %config.base_url(), "Starting register");

    let ctx = AppContext::build(config)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Suggest { query } => commands::bill::suggest(&ctx, &query).await,
        Commands::Bill(args) => commands::bill::bill(&ctx, args).await,
        Commands::Bills => commands::reports::todays_bills(&ctx).await,
        Commands::Show { bill_id } => commands::reports::show(&ctx, bill_id).await,
        Commands::Summary => commands::reports::summary(&ctx).await,
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` for verbose output
/// - `RUST_LOG=billing_client=trace` for request-level detail
/// - Default: info for everything, debug for the billing crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,billing_client=debug,register_lib=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
