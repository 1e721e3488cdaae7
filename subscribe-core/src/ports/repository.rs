//! Repository port - storage abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Login, Subscription};

/// Record store abstraction
///
/// Every write is committed before the call returns. Implementations map
/// their own failures to `Error::Persistence`.
pub trait Repository: Send + Sync {
    // === Subscriptions ===

    /// Insert a new subscription
    fn insert_subscription(&self, subscription: &Subscription) -> Result<()>;

    /// All subscriptions, ordered by name then creation time
    fn get_subscriptions(&self) -> Result<Vec<Subscription>>;

    /// Get subscription by ID
    fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>>;

    /// Overwrite an existing subscription. Returns false if the ID is unknown.
    fn update_subscription(&self, subscription: &Subscription) -> Result<bool>;

    /// Delete a subscription. Returns false if the ID is unknown.
    fn delete_subscription(&self, id: Uuid) -> Result<bool>;

    fn count_subscriptions(&self) -> Result<i64>;

    // === Logins ===

    /// Insert a new login
    fn insert_login(&self, login: &Login) -> Result<()>;

    /// Get login by exact (case-sensitive) ID
    fn get_login(&self, id: &str) -> Result<Option<Login>>;

    /// Get login by email (case-insensitive)
    fn get_login_by_email(&self, email: &str) -> Result<Option<Login>>;
}
