//! Stats service - spend totals normalized across billing cycles

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{BillingCycle, Subscription};
use crate::ports::Repository;

/// Months in a year; normalized sums are kept in twelfths of the target
/// cadence so every conversion factor is a whole number.
const TWELFTHS: u32 = 12;

/// Stats service for spend summaries
pub struct StatsService {
    repository: Arc<dyn Repository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Statistics over every stored subscription
    pub fn summary(&self) -> Result<SpendStatistics> {
        let subscriptions = self.repository.get_subscriptions()?;
        aggregate(&subscriptions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendStatistics {
    pub count: i64,
    pub monthly_total: i64,
    pub quarterly_total: i64,
    pub yearly_total: i64,
    /// Highest raw stored price
    pub max_price: i64,
    /// Lowest raw stored price
    pub min_price: i64,
    /// Mean raw stored price, truncated
    pub average_price: i64,
    /// Monthly total divided by count, truncated
    pub average_monthly: i64,
    pub by_category: Vec<CategorySpend>,
}

impl SpendStatistics {
    pub fn total_for(&self, cadence: BillingCycle) -> i64 {
        match cadence {
            BillingCycle::Monthly => self.monthly_total,
            BillingCycle::Quarterly => self.quarterly_total,
            BillingCycle::Yearly => self.yearly_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub count: i64,
    pub monthly_total: i64,
}

/// Price of one record expressed in twelfths of `cadence`.
///
/// `price * cadence.months / cycle.months`, scaled by twelve so that
/// quarterly-to-monthly (/3) and yearly-to-monthly (/12) stay exact.
fn normalized_twelfths(subscription: &Subscription, cadence: BillingCycle) -> Decimal {
    let factor = cadence.months() * TWELFTHS / subscription.cycle.months();
    Decimal::from(subscription.price) * Decimal::from(factor)
}

fn too_large() -> Error {
    Error::validation("Spending total is too large to compute")
}

/// Round a twelfths sum to a whole amount, once, half away from zero
fn round_twelfths(twelfths: Decimal) -> Result<i64> {
    (twelfths / Decimal::from(TWELFTHS))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(too_large)
}

fn add_twelfths(acc: Decimal, subscription: &Subscription, cadence: BillingCycle) -> Result<Decimal> {
    acc.checked_add(normalized_twelfths(subscription, cadence))
        .ok_or_else(too_large)
}

fn normalized_total(subscriptions: &[Subscription], cadence: BillingCycle) -> Result<i64> {
    let sum = subscriptions
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| add_twelfths(acc, s, cadence))?;
    round_twelfths(sum)
}

/// Compute spend statistics. Every value is zero for an empty input.
///
/// Fails with a validation error when a total does not fit in an `i64`.
pub fn aggregate(subscriptions: &[Subscription]) -> Result<SpendStatistics> {
    let count = subscriptions.len() as i64;
    let monthly_total = normalized_total(subscriptions, BillingCycle::Monthly)?;

    let raw_sum: i128 = subscriptions.iter().map(|s| s.price as i128).sum();
    let (average_price, average_monthly) = if count == 0 {
        (0, 0)
    } else {
        ((raw_sum / count as i128) as i64, monthly_total / count)
    };

    let mut categories: BTreeMap<&str, (i64, Decimal)> = BTreeMap::new();
    for subscription in subscriptions {
        let entry = categories
            .entry(subscription.category.as_str())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = add_twelfths(entry.1, subscription, BillingCycle::Monthly)?;
    }

    let by_category = categories
        .into_iter()
        .map(|(category, (count, twelfths))| {
            Ok(CategorySpend {
                category: category.to_string(),
                count,
                monthly_total: round_twelfths(twelfths)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SpendStatistics {
        count,
        monthly_total,
        quarterly_total: normalized_total(subscriptions, BillingCycle::Quarterly)?,
        yearly_total: normalized_total(subscriptions, BillingCycle::Yearly)?,
        max_price: subscriptions.iter().map(|s| s.price).max().unwrap_or(0),
        min_price: subscriptions.iter().map(|s| s.price).min().unwrap_or(0),
        average_price,
        average_monthly,
        by_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{SubscriptionDraft, DEFAULT_CATEGORY};

    fn sub(price: i64, cycle: BillingCycle) -> Subscription {
        sub_in(price, cycle, DEFAULT_CATEGORY)
    }

    fn sub_in(price: i64, cycle: BillingCycle, category: &str) -> Subscription {
        let today = NaiveDate::from_ymd_opt(2024, 9, 5).unwrap();
        Subscription::from_draft(
            SubscriptionDraft::new("Service", price, cycle).with_category(category),
            DEFAULT_CATEGORY,
            today,
        )
        .unwrap()
    }

    #[test]
    fn test_mixed_cycles_normalize() {
        let subs = vec![
            sub(1000, BillingCycle::Monthly),
            sub(3000, BillingCycle::Quarterly),
            sub(12000, BillingCycle::Yearly),
        ];
        let stats = aggregate(&subs).unwrap();

        assert_eq!(stats.monthly_total, 3000);
        assert_eq!(stats.quarterly_total, 9000);
        assert_eq!(stats.yearly_total, 36000);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max_price, 12000);
        assert_eq!(stats.min_price, 1000);
        assert_eq!(stats.average_price, 5333);
        assert_eq!(stats.average_monthly, 1000);
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let stats = aggregate(&[]).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.monthly_total, 0);
        assert_eq!(stats.quarterly_total, 0);
        assert_eq!(stats.yearly_total, 0);
        assert_eq!(stats.max_price, 0);
        assert_eq!(stats.min_price, 0);
        assert_eq!(stats.average_price, 0);
        assert_eq!(stats.average_monthly, 0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_rounds_once_at_the_end() {
        // 100/3 = 33.33 each; rounding per term would give 33 * 3 = 99
        let subs = vec![
            sub(100, BillingCycle::Quarterly),
            sub(100, BillingCycle::Quarterly),
            sub(100, BillingCycle::Quarterly),
        ];
        assert_eq!(aggregate(&subs).unwrap().monthly_total, 100);

        // 10/4 = 2.5 rounds half away from zero
        assert_eq!(aggregate(&[sub(10, BillingCycle::Yearly)]).unwrap().quarterly_total, 3);
    }

    #[test]
    fn test_monthly_total_independent_of_order() {
        let mut subs = vec![
            sub(13900, BillingCycle::Monthly),
            sub(4900, BillingCycle::Quarterly),
            sub(99000, BillingCycle::Yearly),
            sub(7, BillingCycle::Quarterly),
        ];
        let forward = aggregate(&subs).unwrap();
        subs.reverse();
        let reversed = aggregate(&subs).unwrap();
        subs.swap(0, 2);
        let shuffled = aggregate(&subs).unwrap();

        assert_eq!(forward.monthly_total, reversed.monthly_total);
        assert_eq!(forward.monthly_total, shuffled.monthly_total);
        assert_eq!(forward.yearly_total, shuffled.yearly_total);
    }

    #[test]
    fn test_by_category() {
        let subs = vec![
            sub_in(13900, BillingCycle::Monthly, "Entertainment"),
            sub_in(10900, BillingCycle::Monthly, "Music"),
            sub_in(120000, BillingCycle::Yearly, "Entertainment"),
        ];
        let stats = aggregate(&subs).unwrap();

        assert_eq!(
            stats.by_category,
            vec![
                CategorySpend {
                    category: "Entertainment".to_string(),
                    count: 2,
                    monthly_total: 23900,
                },
                CategorySpend {
                    category: "Music".to_string(),
                    count: 1,
                    monthly_total: 10900,
                },
            ]
        );
    }

    #[test]
    fn test_total_for() {
        let stats = aggregate(&[sub(1200, BillingCycle::Yearly)]).unwrap();
        assert_eq!(stats.total_for(BillingCycle::Monthly), 100);
        assert_eq!(stats.total_for(BillingCycle::Quarterly), 300);
        assert_eq!(stats.total_for(BillingCycle::Yearly), 1200);
    }

    #[test]
    fn test_total_too_large_is_an_error() {
        // One i64::MAX monthly fits, but twelve of them a year do not
        let err = aggregate(&[sub(i64::MAX, BillingCycle::Monthly)]).unwrap_err();
        assert!(err.is_validation());

        let err = aggregate(&[sub(i64::MAX, BillingCycle::Yearly), sub(i64::MAX, BillingCycle::Yearly)])
            .unwrap_err();
        assert!(err.is_validation());
    }
}
