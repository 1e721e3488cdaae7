//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod catalog;
mod credential;
mod cycle;
mod display;
mod login;
pub mod result;
mod subscription;

pub use catalog::CatalogEntry;
pub use credential::{Argon2Params, PasswordCredential, SALT_LEN};
pub use cycle::BillingCycle;
pub use display::{Color, CurrencyFormat, UnitPosition};
pub use login::{Login, SignupForm};
pub use subscription::{
    parse_price, Subscription, SubscriptionDraft, SubscriptionFilter, SubscriptionPatch,
    DEFAULT_CATEGORY,
};
