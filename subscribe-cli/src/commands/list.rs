//! List command - show tracked subscriptions

use anyhow::Result;
use chrono::Local;
use subscribe_core::{BillingCycle, SubscriptionFilter};

use super::{get_context, short_id};
use crate::output;

pub fn run(
    category: Option<String>,
    cycle: Option<BillingCycle>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let filter = SubscriptionFilter {
        category,
        cycle,
        name_contains: search,
    };
    let subscriptions = ctx.subscription_service.list(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subscriptions)?);
        return Ok(());
    }

    if subscriptions.is_empty() {
        output::info("No subscriptions yet. Use 'sub add' to record one.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Price", "Cycle", "Next billing", "Category", "Color"]);

    for s in &subscriptions {
        table.add_row(vec![
            short_id(&s.id),
            s.name.clone(),
            ctx.config.currency.format(s.price),
            s.cycle.label().to_string(),
            s.next_billing_date(today).to_string(),
            s.category.clone(),
            output::swatch(s.color),
        ]);
    }

    println!("{}", table);
    if ctx.config.sample_mode {
        output::warning("Sample mode is on. Run 'sub sample off' to see your own data.");
    }

    Ok(())
}
