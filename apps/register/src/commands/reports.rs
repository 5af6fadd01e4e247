//! Read-only views of today's sales. Aggregation happens server-side.

use crate::context::AppContext;
use crate::format::{render_bill, render_bill_row, render_summary};

pub async fn todays_bills(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.require_login().await?;

    let bills = match ctx.api.todays_bills().await {
        Ok(bills) => bills,
        Err(e) => return Err(ctx.handle_error(e.into()).await),
    };

    if bills.is_empty() {
        println!("No bills yet today");
        return Ok(());
    }
    for bill in &bills {
        println!("{}", render_bill_row(bill));
    }
    println!("{} bill(s)", bills.len());
    Ok(())
}

pub async fn show(ctx: &AppContext, bill_id: i64) -> anyhow::Result<()> {
    ctx.require_login().await?;

    match ctx.api.bill(bill_id).await {
        Ok(bill) => {
            print!("{}", render_bill(&bill));
            Ok(())
        }
        Err(e) => Err(ctx.handle_error(e.into()).await),
    }
}

pub async fn summary(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.require_login().await?;

    match ctx.api.todays_summary().await {
        Ok(summary) => {
            print!("{}", render_summary(&summary));
            Ok(())
        }
        Err(e) => Err(ctx.handle_error(e.into()).await),
    }
}
