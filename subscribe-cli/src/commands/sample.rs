//! Sample command - manage sample mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use subscribe_core::config::Config;
use subscribe_core::SubscribeContext;

use super::get_data_dir;

#[derive(Subcommand)]
pub enum SampleCommands {
    /// Switch to the sample store
    #[command(name = "on")]
    On,
    /// Switch back to your own data
    #[command(name = "off")]
    Off,
    /// Show sample mode status
    Status,
}

pub fn run(command: Option<SampleCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    match command {
        Some(SampleCommands::On) => {
            config.enable_sample_mode();
            config.save(&data_dir)?;
            // Opening the context seeds an empty sample store
            let ctx = SubscribeContext::with_config(&data_dir, config)?;
            let count = ctx.subscription_service.list_all()?.len();
            println!("{}", "Sample mode enabled".green());
            println!("{} sample subscriptions loaded. Run 'sub list' to see them.", count);
            Ok(())
        }
        Some(SampleCommands::Off) => {
            config.disable_sample_mode();
            config.save(&data_dir)?;
            println!("{}", "Sample mode disabled".yellow());
            Ok(())
        }
        Some(SampleCommands::Status) | None => {
            if config.sample_mode {
                println!("Sample mode is {}", "ON".green());
            } else {
                println!("Sample mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
