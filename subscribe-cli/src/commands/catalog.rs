//! Catalog command - browse well-known services

use anyhow::Result;
use subscribe_core::domain::catalog;

use crate::output;

pub fn run(query: Option<String>, json: bool) -> Result<()> {
    let entries = catalog::search(query.as_deref().unwrap_or(""));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No matching services.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Name", "Category", "Link", "Color"]);
    for entry in entries {
        table.add_row(vec![
            entry.name.to_string(),
            entry.category.to_string(),
            entry.link.to_string(),
            output::swatch(entry.color),
        ]);
    }
    println!("{}", table);
    println!();
    println!("Add one with: sub add --from-catalog <name> --price <amount>");

    Ok(())
}
