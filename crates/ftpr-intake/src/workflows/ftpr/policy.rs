use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Money;

/// Business dials for intake decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Flat amount taken off the region price whenever the account carries a referral code.
    pub referral_discount: Money,
    /// Whole days required between today and the scheduled eviction.
    pub minimum_lead_days: i64,
    /// Most months of rent a subsidized-tenant claim may cover.
    pub redemption_cap_months: u32,
    /// Fixed offset of the zone used to decide what "today" is.
    pub utc_offset_minutes: i32,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            referral_discount: Money::from_dollars(25),
            minimum_lead_days: 17,
            redemption_cap_months: 12,
            utc_offset_minutes: 0,
        }
    }
}

impl IntakePolicy {
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }

    /// Earliest eviction date that satisfies the lead-time rule when evaluated on `today`.
    /// Saturates at the last representable date.
    pub fn earliest_eviction_date(&self, today: NaiveDate) -> NaiveDate {
        chrono::Duration::try_days(self.minimum_lead_days)
            .and_then(|delta| today.checked_add_signed(delta))
            .unwrap_or(NaiveDate::MAX)
    }
}
