//! # Register Entry Point
//!
//! Command-line front end a cashier uses to log in, ring up bills and look
//! at today's sales.
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Load config (file + environment)
//! 4. Open the session store, build the API client
//! 5. Run the chosen command

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs so commands stay testable
    register_lib::run().await
}
