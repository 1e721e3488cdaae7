//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, Connection};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, Login, PasswordCredential, Subscription};
use crate::migrations::MIGRATIONS;
use crate::ports::Repository;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const SUBSCRIPTION_COLUMNS: &str = "subscription_id, name, price, cycle, billing_date::VARCHAR, \
     link, category, color, created_at, updated_at";

const LOGIN_COLUMNS: &str =
    "login_id, email, password_hash, password_salt, password_params, created_at";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) a database file.
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut attempt = 0;
        loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    attempt += 1;
                    if !is_retryable_error(&err_msg) || attempt >= MAX_RETRIES {
                        return Err(Error::persistence(format!(
                            "Failed to open {}: {}",
                            db_path.display(),
                            err_msg
                        )));
                    }
                    let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt - 1));
                    eprintln!(
                        "[subscribe] Database busy, retrying in {}ms (attempt {}/{}): {}",
                        delay.as_millis(),
                        attempt,
                        MAX_RETRIES,
                        err_msg
                    );
                    thread::sleep(delay);
                }
            }
        }
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading stays off; nothing here needs extensions.
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::persistence(format!("Lock poisoned: {}", e)))
    }

    /// Run pending schema migrations
    pub fn ensure_schema(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Path of the backing file, `None` when in memory
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl Repository for DuckDbRepository {
    // === Subscriptions ===

    fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO subscriptions (subscription_id, name, price, cycle, billing_date,
                                        link, category, color, created_at, updated_at)
             VALUES (?, ?, ?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?)",
            params![
                subscription.id.to_string(),
                subscription.name,
                subscription.price,
                subscription.cycle.as_str(),
                format_date(subscription.billing_date),
                subscription.link,
                subscription.category,
                subscription.color.to_string(),
                subscription.created_at.to_rfc3339(),
                subscription.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subscriptions ORDER BY lower(name), name, created_at",
            SUBSCRIPTION_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], SubscriptionRow::from_row)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subscriptions WHERE subscription_id = ?",
            SUBSCRIPTION_COLUMNS
        ))?;

        let row = stmt
            .query_map([id.to_string()], SubscriptionRow::from_row)?
            .next()
            .transpose()?;

        row.map(Subscription::try_from).transpose()
    }

    fn update_subscription(&self, subscription: &Subscription) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE subscriptions
             SET name = ?, price = ?, cycle = ?, billing_date = CAST(? AS DATE),
                 link = ?, category = ?, color = ?, updated_at = ?
             WHERE subscription_id = ?",
            params![
                subscription.name,
                subscription.price,
                subscription.cycle.as_str(),
                format_date(subscription.billing_date),
                subscription.link,
                subscription.category,
                subscription.color.to_string(),
                subscription.updated_at.to_rfc3339(),
                subscription.id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_subscription(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM subscriptions WHERE subscription_id = ?",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    fn count_subscriptions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Logins ===

    fn insert_login(&self, login: &Login) -> Result<()> {
        let params_json = serde_json::to_string(&login.credential.params)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO logins (login_id, email, password_hash, password_salt, password_params, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                login.id,
                login.email,
                login.credential.hash,
                login.credential.salt,
                params_json,
                login.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_login(&self, id: &str) -> Result<Option<Login>> {
        self.query_one_login(
            &format!("SELECT {} FROM logins WHERE login_id = ?", LOGIN_COLUMNS),
            id,
        )
    }

    fn get_login_by_email(&self, email: &str) -> Result<Option<Login>> {
        self.query_one_login(
            &format!("SELECT {} FROM logins WHERE lower(email) = lower(?)", LOGIN_COLUMNS),
            email.trim(),
        )
    }
}

impl DuckDbRepository {
    fn query_one_login(&self, sql: &str, arg: &str) -> Result<Option<Login>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let row = stmt
            .query_map([arg], LoginRow::from_row)?
            .next()
            .transpose()?;

        row.map(Login::try_from).transpose()
    }
}

/// Raw column values, converted to domain types outside the row callback
/// so that bad values surface as `Error::Persistence`.
struct SubscriptionRow {
    id: String,
    name: String,
    price: i64,
    cycle: String,
    billing_date: String,
    link: Option<String>,
    category: String,
    color: String,
    created_at: String,
    updated_at: String,
}

impl SubscriptionRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            cycle: row.get(3)?,
            billing_date: row.get(4)?,
            link: row.get(5)?,
            category: row.get(6)?,
            color: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        let corrupt = |field: &str, value: &str| {
            Error::persistence(format!(
                "Stored subscription {} has an unreadable {}: '{}'",
                row.id, field, value
            ))
        };

        Ok(Subscription {
            id: Uuid::parse_str(&row.id).map_err(|_| corrupt("id", &row.id))?,
            cycle: row.cycle.parse().map_err(|_| corrupt("cycle", &row.cycle))?,
            billing_date: parse_date(&row.billing_date)
                .ok_or_else(|| corrupt("billing date", &row.billing_date))?,
            color: row.color.parse().map_err(|_| corrupt("color", &row.color))?,
            created_at: parse_timestamp(&row.created_at)
                .ok_or_else(|| corrupt("created_at", &row.created_at))?,
            updated_at: parse_timestamp(&row.updated_at)
                .ok_or_else(|| corrupt("updated_at", &row.updated_at))?,
            name: row.name,
            price: row.price,
            link: row.link,
            category: row.category,
        })
    }
}

struct LoginRow {
    id: String,
    email: String,
    hash: String,
    salt: String,
    params: String,
    created_at: String,
}

impl LoginRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            hash: row.get(2)?,
            salt: row.get(3)?,
            params: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<LoginRow> for Login {
    type Error = Error;

    fn try_from(row: LoginRow) -> Result<Self> {
        let params: Argon2Params = serde_json::from_str(&row.params).map_err(|e| {
            Error::persistence(format!("Stored login {} has unreadable hash parameters: {}", row.id, e))
        })?;
        let created_at = parse_timestamp(&row.created_at).ok_or_else(|| {
            Error::persistence(format!("Stored login {} has an unreadable created_at", row.id))
        })?;

        Ok(Login {
            id: row.id,
            email: row.email,
            credential: PasswordCredential {
                salt: row.salt,
                hash: row.hash,
                params,
            },
            created_at,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, Color, SubscriptionDraft, DEFAULT_CATEGORY};

    fn repo() -> DuckDbRepository {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    fn subscription(name: &str, price: i64) -> Subscription {
        let today = NaiveDate::from_ymd_opt(2024, 9, 5).unwrap();
        Subscription::from_draft(
            SubscriptionDraft::new(name, price, BillingCycle::Monthly),
            DEFAULT_CATEGORY,
            today,
        )
        .unwrap()
    }

    #[test]
    fn test_is_retryable_error() {
        assert!(is_retryable_error("IO Error: Could not set lock on file \"x.duckdb\""));
        assert!(is_retryable_error("The process cannot access the file because it is being used by another process"));
        assert!(!is_retryable_error("Catalog Error: Table with name foo does not exist"));
    }

    #[test]
    fn test_insert_and_get_preserves_fields() {
        let repo = repo();
        let mut sub = subscription("Netflix", 13900);
        sub.link = Some("https://www.netflix.com".to_string());
        sub.color = Color::rgba(1, 2, 3, 4);
        repo.insert_subscription(&sub).unwrap();

        let loaded = repo.get_subscription(sub.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Netflix");
        assert_eq!(loaded.price, 13900);
        assert_eq!(loaded.billing_date, sub.billing_date);
        assert_eq!(loaded.link, sub.link);
        assert_eq!(loaded.color, sub.color);
        assert_eq!(loaded.created_at.timestamp(), sub.created_at.timestamp());
    }

    #[test]
    fn test_list_sorted_by_name_case_insensitive() {
        let repo = repo();
        for name in ["spotify", "Apple Music", "Netflix"] {
            repo.insert_subscription(&subscription(name, 1000)).unwrap();
        }

        let names: Vec<_> = repo.get_subscriptions().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Apple Music", "Netflix", "spotify"]);
    }

    #[test]
    fn test_update_and_delete_report_missing_rows() {
        let repo = repo();
        let sub = subscription("Naver", 4900);
        assert!(!repo.update_subscription(&sub).unwrap());
        assert!(!repo.delete_subscription(sub.id).unwrap());

        repo.insert_subscription(&sub).unwrap();
        assert!(repo.update_subscription(&sub).unwrap());
        assert!(repo.delete_subscription(sub.id).unwrap());
        assert_eq!(repo.count_subscriptions().unwrap(), 0);
    }

    #[test]
    fn test_legacy_cycle_label_is_readable() {
        let repo = repo();
        let sub = subscription("Netflix", 13900);
        repo.insert_subscription(&sub).unwrap();
        {
            let conn = repo.conn().unwrap();
            conn.execute("UPDATE subscriptions SET cycle = '연별'", []).unwrap();
        }

        let loaded = repo.get_subscription(sub.id).unwrap().unwrap();
        assert_eq!(loaded.cycle, BillingCycle::Yearly);
    }

    #[test]
    fn test_login_lookup() {
        let repo = repo();
        let login = Login::new(
            "moon",
            "moon@example.com",
            PasswordCredential {
                salt: "c2FsdA==".to_string(),
                hash: "00ff".to_string(),
                params: Argon2Params::default(),
            },
        );
        repo.insert_login(&login).unwrap();

        assert!(repo.get_login("moon").unwrap().is_some());
        assert!(repo.get_login("Moon").unwrap().is_none());
        let by_email = repo.get_login_by_email("MOON@example.com").unwrap().unwrap();
        assert_eq!(by_email.credential, login.credential);
    }
}
