//! Subscription domain model

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cycle::BillingCycle;
use super::display::Color;
use super::result::{Error, Result};

/// Category used when the user leaves it blank
pub const DEFAULT_CATEGORY: &str = "Independent";

/// A recurring subscription tracked by the user.
///
/// `price` is in minor currency units and always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub cycle: BillingCycle,
    pub billing_date: NaiveDate,
    pub link: Option<String>,
    pub category: String,
    pub color: Color,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Build a validated record from user input.
    ///
    /// `id` is assigned here and never changes afterwards.
    pub fn from_draft(draft: SubscriptionDraft, default_category: &str, today: NaiveDate) -> Result<Self> {
        let now = Utc::now();
        let subscription = Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            price: draft.price,
            cycle: draft.cycle,
            billing_date: draft.billing_date.unwrap_or(today),
            link: normalize_link(draft.link)?,
            category: normalize_category(draft.category, default_category),
            color: draft.color.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        subscription.validate()?;
        Ok(subscription)
    }

    /// Check record invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Subscription name cannot be empty"));
        }
        if self.price <= 0 {
            return Err(Error::validation("Price must be a positive whole number"));
        }
        if let Some(link) = &self.link {
            validate_link(link)?;
        }
        Ok(())
    }

    /// Return a copy with the patch applied and invariants re-checked.
    /// Identity and creation time are never touched.
    pub fn patched(&self, patch: SubscriptionPatch, default_category: &str) -> Result<Self> {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(cycle) = patch.cycle {
            updated.cycle = cycle;
        }
        if let Some(date) = patch.billing_date {
            updated.billing_date = date;
        }
        if let Some(link) = patch.link {
            updated.link = normalize_link(Some(link))?;
        }
        if let Some(category) = patch.category {
            updated.category = normalize_category(Some(category), default_category);
        }
        if let Some(color) = patch.color {
            updated.color = color;
        }
        updated.validate()?;
        updated.updated_at = Utc::now();
        Ok(updated)
    }

    /// First billing date on or after `today`, stepping whole cycles from
    /// the stored date. Steps are taken from the original date so month-end
    /// dates do not drift.
    pub fn next_billing_date(&self, today: NaiveDate) -> NaiveDate {
        if self.billing_date >= today {
            return self.billing_date;
        }
        let step = self.cycle.months();
        let mut periods: u32 = 1;
        loop {
            match self.billing_date.checked_add_months(Months::new(step * periods)) {
                Some(date) if date >= today => return date,
                Some(_) => periods += 1,
                None => return self.billing_date,
            }
        }
    }
}

/// User input for a new subscription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    pub name: String,
    pub price: i64,
    pub cycle: BillingCycle,
    pub billing_date: Option<NaiveDate>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub color: Option<Color>,
}

impl SubscriptionDraft {
    pub fn new(name: impl Into<String>, price: i64, cycle: BillingCycle) -> Self {
        Self {
            name: name.into(),
            price,
            cycle,
            ..Default::default()
        }
    }

    pub fn with_billing_date(mut self, date: NaiveDate) -> Self {
        self.billing_date = Some(date);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Partial update: `None` leaves a field unchanged.
///
/// An empty `link` clears it; an empty `category` resets it to the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub cycle: Option<BillingCycle>,
    pub billing_date: Option<NaiveDate>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub color: Option<Color>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.cycle.is_none()
            && self.billing_date.is_none()
            && self.link.is_none()
            && self.category.is_none()
            && self.color.is_none()
    }
}

/// Optional restrictions for listing subscriptions
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    /// Case-insensitive exact category match
    pub category: Option<String>,
    pub cycle: Option<BillingCycle>,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
}

impl SubscriptionFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(category) = &self.category {
            if !subscription.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(cycle) = self.cycle {
            if subscription.cycle != cycle {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let needle = needle.trim().to_lowercase();
            if !subscription.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Parse a price typed by the user. Only positive whole numbers are accepted;
/// grouping separators (`13,900`) are tolerated.
pub fn parse_price(input: &str) -> Result<i64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    match cleaned.parse::<i64>() {
        Ok(price) if price > 0 => Ok(price),
        _ => Err(Error::validation("Price must be a positive whole number")),
    }
}

fn normalize_link(link: Option<String>) -> Result<Option<String>> {
    match link.map(|l| l.trim().to_string()) {
        Some(l) if l.is_empty() => Ok(None),
        Some(l) => {
            validate_link(&l)?;
            Ok(Some(l))
        }
        None => Ok(None),
    }
}

fn validate_link(link: &str) -> Result<()> {
    match url::Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(Error::validation(format!(
            "Link must be a full http(s) address (got '{}')",
            link
        ))),
    }
}

fn normalize_category(category: Option<String>, default_category: &str) -> String {
    match category.map(|c| c.trim().to_string()) {
        Some(c) if !c.is_empty() => c,
        _ => default_category.to_string(),
    }
}
