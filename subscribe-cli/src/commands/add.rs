//! Add command - record a new subscription

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::Input;
use subscribe_core::domain::{catalog, parse_price};
use subscribe_core::{BillingCycle, Color, OperationResult, SubscriptionDraft};

use super::{get_context, short_id};
use crate::output;

pub struct AddArgs {
    pub name: Option<String>,
    pub price: Option<String>,
    pub cycle: BillingCycle,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub color: Option<Color>,
    pub from_catalog: Option<String>,
    pub json: bool,
}

pub fn run(args: AddArgs) -> Result<()> {
    let ctx = get_context()?;

    let preset = match &args.from_catalog {
        Some(query) => Some(
            catalog::find(query)
                .ok_or_else(|| anyhow!("'{}' is not in the catalog. Run 'sub catalog' to browse it.", query))?,
        ),
        None => None,
    };

    let name = match args.name.or_else(|| preset.map(|p| p.name.to_string())) {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .interact_text()?,
    };

    let price = match args.price {
        Some(p) => parse_price(&p)?,
        None => {
            let input: String = Input::new()
                .with_prompt(format!("Price per {}", args.cycle.as_str()))
                .validate_with(|s: &String| parse_price(s).map(|_| ()).map_err(|e| e.to_string()))
                .interact_text()?;
            parse_price(&input)?
        }
    };

    let mut draft = SubscriptionDraft::new(name, price, args.cycle);
    draft.billing_date = args.date;
    draft.link = args.link.or_else(|| preset.map(|p| p.link.to_string()));
    draft.category = args.category.or_else(|| preset.map(|p| p.category.to_string()));
    draft.color = args.color.or_else(|| preset.map(|p| p.color));

    let subscription = ctx.subscription_service.create(draft)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&subscription))?);
        return Ok(());
    }

    output::success(&format!("Added {}", subscription.name));
    println!("  ID: {}", short_id(&subscription.id).dimmed());
    println!(
        "  {} / {}",
        ctx.config.currency.format(subscription.price),
        subscription.cycle.as_str()
    );
    println!("  Category: {}", subscription.category);

    Ok(())
}
