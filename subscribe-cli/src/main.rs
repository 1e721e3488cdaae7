//! Subscribe CLI - track recurring subscriptions in your terminal

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use subscribe_core::{BillingCycle, Color};

mod commands;
mod output;

use commands::{add, auth, catalog, edit, list, logs, remove, sample, show, stats};

/// Subscribe - keep track of what you pay for every month
#[derive(Parser)]
#[command(name = "sub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new subscription
    Add {
        /// Service name
        name: Option<String>,
        /// Price in whole currency units, e.g. 13900 or 13,900
        #[arg(long, short)]
        price: Option<String>,
        /// Billing cycle (monthly, quarterly, yearly)
        #[arg(long, short, default_value = "monthly")]
        cycle: BillingCycle,
        /// First billing date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Website of the service
        #[arg(long)]
        link: Option<String>,
        /// Category (defaults to the configured default)
        #[arg(long)]
        category: Option<String>,
        /// Card color: a name like "red" or a hex value like "#FF3B30"
        #[arg(long)]
        color: Option<Color>,
        /// Prefill name, link, category and color from the service catalog
        #[arg(long)]
        from_catalog: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List subscriptions sorted by name
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Only this billing cycle
        #[arg(long)]
        cycle: Option<BillingCycle>,
        /// Only names containing this text
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one subscription
    Show {
        /// Subscription ID or a unique prefix of it
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a subscription
    Edit {
        /// Subscription ID or a unique prefix of it
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short)]
        price: Option<String>,
        #[arg(long, short)]
        cycle: Option<BillingCycle>,
        /// Billing date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New link; pass "" to remove it
        #[arg(long)]
        link: Option<String>,
        /// New category; pass "" to reset to the default
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<Color>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a subscription
    Remove {
        /// Subscription ID or a unique prefix of it
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show monthly, quarterly and yearly totals
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search well-known services
    Catalog {
        /// Text to search for (shows everything when omitted)
        query: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a local account
    Signup {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "SUBSCRIBE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check local account credentials
    Login {
        #[arg(long)]
        id: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "SUBSCRIBE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage sample mode
    Sample {
        #[command(subcommand)]
        command: Option<sample::SampleCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Name recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Edit { .. } => "edit",
            Commands::Remove { .. } => "remove",
            Commands::Stats { .. } => "stats",
            Commands::Catalog { .. } => "catalog",
            Commands::Signup { .. } => "signup",
            Commands::Login { .. } => "login",
            Commands::Sample { .. } => "sample",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The log connection is closed again before the command runs
    let command = cli.command.name();
    commands::log_command(command);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_failure(command, &e);
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { name, price, cycle, date, link, category, color, from_catalog, json } => {
            add::run(add::AddArgs { name, price, cycle, date, link, category, color, from_catalog, json })
        }
        Commands::List { category, cycle, search, json } => list::run(category, cycle, search, json),
        Commands::Show { id, json } => show::run(&id, json),
        Commands::Edit { id, name, price, cycle, date, link, category, color, json } => {
            edit::run(edit::EditArgs { id, name, price, cycle, date, link, category, color, json })
        }
        Commands::Remove { id, force, json } => remove::run(&id, force, json),
        Commands::Stats { json } => stats::run(json),
        Commands::Catalog { query, json } => catalog::run(query, json),
        Commands::Signup { id, email, password, json } => auth::run_signup(id, email, password, json),
        Commands::Login { id, password, json } => auth::run_login(id, password, json),
        Commands::Sample { command } => sample::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
