//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
pub mod logging;
mod migration;
mod stats;
mod subscription;

pub use auth::{has_letter, hash_password, is_valid_email, verify_password, AuthService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use stats::{aggregate, CategorySpend, SpendStatistics, StatsService};
pub use subscription::SubscriptionService;
