//! Edit command - change fields of an existing subscription

use anyhow::Result;
use chrono::NaiveDate;
use subscribe_core::domain::parse_price;
use subscribe_core::{BillingCycle, Color, OperationResult, SubscriptionPatch};

use super::{found_or_notice, get_context};
use crate::output;

pub struct EditArgs {
    pub id: String,
    pub name: Option<String>,
    pub price: Option<String>,
    pub cycle: Option<BillingCycle>,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub color: Option<Color>,
    pub json: bool,
}

pub fn run(args: EditArgs) -> Result<()> {
    let ctx = get_context()?;

    let patch = SubscriptionPatch {
        name: args.name,
        price: args.price.as_deref().map(parse_price).transpose()?,
        cycle: args.cycle,
        billing_date: args.date,
        link: args.link,
        category: args.category,
        color: args.color,
    };

    if patch.is_empty() {
        output::warning("Nothing to change. Pass at least one field, e.g. --price 9900");
        return Ok(());
    }

    let Some(current) = found_or_notice(ctx.subscription_service.resolve(&args.id), args.json)? else {
        return Ok(());
    };
    let Some(updated) = found_or_notice(ctx.subscription_service.update(current.id, patch), args.json)? else {
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&updated))?);
    } else {
        output::success(&format!("Updated {}", updated.name));
    }
    Ok(())
}
