//! Billing cycle (cadence) domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// How often a subscription is billed.
///
/// Also used as the target cadence when normalizing spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 3] = [Self::Monthly, Self::Quarterly, Self::Yearly];

    /// Length of one period in months
    pub fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }

    /// Stored representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BillingCycle {
    type Err = Error;

    /// Accepts the canonical names, single-letter shorthands and the
    /// Korean labels written by the mobile app.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" | "월별" => Ok(Self::Monthly),
            "quarterly" | "quarter" | "q" | "분기별" => Ok(Self::Quarterly),
            "yearly" | "annual" | "annually" | "year" | "y" | "연별" => Ok(Self::Yearly),
            other => Err(Error::validation(format!(
                "Billing cycle must be monthly, quarterly or yearly (got '{}')",
                other
            ))),
        }
    }
}
