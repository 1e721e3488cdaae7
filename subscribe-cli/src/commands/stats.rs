//! Stats command - spending totals across billing cycles

use anyhow::Result;
use colored::Colorize;
use subscribe_core::BillingCycle;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let stats = ctx.stats_service.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let currency = &ctx.config.currency;

    println!("{}", "Subscription Spending".bold());
    println!();

    let mut totals = output::create_table();
    totals.set_header(vec!["Cadence", "Total"]);
    for cadence in BillingCycle::ALL {
        totals.add_row(vec![
            cadence.label().to_string(),
            currency.format(stats.total_for(cadence)),
        ]);
    }
    println!("{}", totals);
    println!();

    let mut summary = output::create_table();
    summary.add_row(vec!["Subscriptions".to_string(), stats.count.to_string()]);
    summary.add_row(vec!["Highest price".to_string(), currency.format(stats.max_price)]);
    summary.add_row(vec!["Lowest price".to_string(), currency.format(stats.min_price)]);
    summary.add_row(vec!["Average price".to_string(), currency.format(stats.average_price)]);
    summary.add_row(vec!["Average per month".to_string(), currency.format(stats.average_monthly)]);
    println!("{}", summary);

    if !stats.by_category.is_empty() {
        println!();
        println!("{}", "By Category".bold());
        let mut categories = output::create_table();
        categories.set_header(vec!["Category", "Count", "Monthly"]);
        for c in &stats.by_category {
            categories.add_row(vec![
                c.category.clone(),
                c.count.to_string(),
                currency.format(c.monthly_total),
            ]);
        }
        println!("{}", categories);
    }

    Ok(())
}
