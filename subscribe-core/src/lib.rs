//! Subscribe Core - Business logic for tracking recurring subscriptions
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Subscription, Login, etc.)
//! - **ports**: Trait definitions for external dependencies (Repository)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::Repository;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    BillingCycle, CatalogEntry, Color, CurrencyFormat, Login, SignupForm, Subscription,
    SubscriptionDraft, SubscriptionFilter, SubscriptionPatch,
};
pub use domain::result::{Error, OperationResult, Result};
pub use services::{EntryPoint, LogEvent, LoggingService, SpendStatistics};

/// Main context for Subscribe operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct SubscribeContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub subscription_service: SubscriptionService,
    pub stats_service: StatsService,
    pub auth_service: AuthService,
}

impl SubscribeContext {
    /// Create a new Subscribe context
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Self::with_config(data_dir, config)
    }

    /// Create a context with an already-loaded config
    pub fn with_config(data_dir: &Path, config: Config) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(config.db_filename());
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        let port: Arc<dyn Repository> = repository.clone();

        // Create services
        let subscription_service =
            SubscriptionService::new(Arc::clone(&port), config.default_category.clone());
        let stats_service = StatsService::new(Arc::clone(&port));
        let auth_service = AuthService::new(port, config.argon2.clone());

        if config.sample_mode {
            subscription_service.seed_samples()?;
        }

        Ok(Self {
            config,
            repository,
            subscription_service,
            stats_service,
            auth_service,
        })
    }
}
