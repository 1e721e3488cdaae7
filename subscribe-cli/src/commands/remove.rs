//! Remove command - delete a subscription

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use subscribe_core::OperationResult;

use super::{found_or_notice, get_context};
use crate::output;

pub fn run(id: &str, force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let Some(subscription) = found_or_notice(ctx.subscription_service.resolve(id), json)? else {
        return Ok(());
    };

    // Confirm removal unless --force
    if !force && !json {
        println!(
            "\n{}",
            format!(
                "This will remove '{}' ({} / {}).",
                subscription.name,
                ctx.config.currency.format(subscription.price),
                subscription.cycle.as_str()
            )
            .yellow()
        );

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    if found_or_notice(ctx.subscription_service.delete(subscription.id), json)?.is_none() {
        return Ok(());
    }

    if json {
        let result = OperationResult::ok(subscription.id.to_string());
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::success(&format!("Removed {}", subscription.name));
    }

    Ok(())
}
