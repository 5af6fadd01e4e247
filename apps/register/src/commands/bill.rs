//! # Bill Commands
//!
//! Product suggestions and the compose-then-submit flow.
//!
//! ## `register bill` Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  --item Rice:2:50 --item Pen:10:2.5 --discount 5 --payment upi         │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  1. Restore session (must be logged in)                                │
//! │  2. Each --item ──► composer.add_item()   (stops at first bad item)    │
//! │  3. Customer, discount, payment method                                 │
//! │  4. Print draft + totals                                               │
//! │  5. workflow.submit()                                                  │
//! │       ├── Ok  ──► print bill number, wait settle delay, "home"         │
//! │       └── Err ──► print message (draft is not persisted)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use billing_client::{Navigator, ProductLookup, SubmissionWorkflow};
use billing_core::ItemCandidate;
use clap::Args;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::context::{user_facing, AppContext};
use crate::format::{render_items, render_totals};

#[derive(Args, Debug)]
pub struct BillArgs {
    /// Line item as NAME:QTY:PRICE (repeatable)
    #[arg(long = "item", value_name = "NAME:QTY:PRICE", required = true)]
    pub items: Vec<String>,

    #[arg(long)]
    pub customer_name: Option<String>,

    #[arg(long)]
    pub customer_phone: Option<String>,

    /// Manual discount in rupees, on top of the fixed 10%
    #[arg(long, default_value = "0")]
    pub discount: String,

    /// CASH, UPI, CARD or ONLINE
    #[arg(long, default_value = "CASH")]
    pub payment: String,

    /// Print the draft and totals without submitting
    #[arg(long)]
    pub dry_run: bool,
}

/// Splits `NAME:QTY:PRICE`. The name may itself contain colons.
pub fn parse_item_arg(raw: &str) -> anyhow::Result<ItemCandidate> {
    let mut parts = raw.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(price), Some(qty), Some(name)) => Ok(ItemCandidate::new(name, qty, price)),
        _ => Err(anyhow!("Item '{}' must look like NAME:QTY:PRICE", raw)),
    }
}

pub async fn suggest(ctx: &AppContext, query: &str) -> anyhow::Result<()> {
    let lookup = ProductLookup::new(Arc::clone(&ctx.api));
    let names = lookup.suggest(query).await;

    if names.is_empty() {
        println!("No suggestions");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub async fn bill(ctx: &AppContext, args: BillArgs) -> anyhow::Result<()> {
    let user = ctx.require_login().await?;
    debug!(user_id = user.id, items = args.items.len(), "Composing bill");

    let navigator = Arc::new(TerminalNavigator::default());
    let workflow = SubmissionWorkflow::new(
        Arc::clone(&ctx.api),
        Arc::clone(&ctx.session),
        navigator.clone(),
        ctx.config.settle_delay(),
    );

    let candidates = args
        .items
        .iter()
        .map(String::as_str)
        .map(parse_item_arg)
        .collect::<anyhow::Result<Vec<_>>>()?;

    workflow
        .edit(|composer| -> anyhow::Result<()> {
            for (raw, candidate) in args.items.iter().zip(candidates) {
                composer
                    .add_item(candidate)
                    .map_err(|e| anyhow!("{}: {}", raw, e))?;
            }
            composer.set_customer_info(args.customer_name.as_deref(), args.customer_phone.as_deref());
            composer.set_manual_discount(&args.discount);
            composer.set_payment_method(&args.payment)?;
            Ok(())
        })
        .await
        .map_err(user_facing)??;

    let draft = workflow.composer().await;
    print!("{}", render_items(draft.items()));
    print!("{}", render_totals(&draft.compute_totals()));
    println!("  Payment: {}", draft.payment_method());

    if args.dry_run {
        return Ok(());
    }

    match workflow.submit().await {
        Ok(bill) => {
            println!("Bill created: {}", bill.bill_number);
            navigator.wait().await;
            Ok(())
        }
        Err(billing_client::ClientError::Api(api)) if api.is_auth_expired() => {
            bail!("Session expired. Please log in again.")
        }
        Err(e) => Err(user_facing(e)),
    }
}

/// Terminal stand-in for the home screen: the command exits once the
/// workflow asks to go home.
#[derive(Default)]
pub struct TerminalNavigator {
    home: Notify,
}

impl TerminalNavigator {
    pub async fn wait(&self) {
        self.home.notified().await;
    }
}

#[async_trait]
impl Navigator for TerminalNavigator {
    async fn return_home(&self) {
        info!("Returning to home screen");
        self.home.notify_one();
    }
}
