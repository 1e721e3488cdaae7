//! Show command - details of one subscription

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use super::{found_or_notice, get_context};
use crate::output;

pub fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let Some(s) = found_or_notice(ctx.subscription_service.resolve(id), json)? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&s)?);
        return Ok(());
    }

    println!("{}", s.name.bold());
    println!();

    let today = Local::now().date_naive();
    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), s.id.to_string()]);
    table.add_row(vec!["Price".to_string(), ctx.config.currency.format(s.price)]);
    table.add_row(vec!["Cycle".to_string(), s.cycle.label().to_string()]);
    table.add_row(vec!["Billing date".to_string(), s.billing_date.to_string()]);
    table.add_row(vec!["Next billing".to_string(), s.next_billing_date(today).to_string()]);
    table.add_row(vec!["Category".to_string(), s.category.clone()]);
    table.add_row(vec!["Link".to_string(), s.link.clone().unwrap_or_else(|| "-".to_string())]);
    table.add_row(vec!["Color".to_string(), output::swatch(s.color)]);
    table.add_row(vec![
        "Updated".to_string(),
        s.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    ]);

    println!("{}", table);
    Ok(())
}
