use serde::{Deserialize, Serialize};

use super::domain::{Account, Money};
use super::policy::IntakePolicy;
use super::violation::{Violation, ViolationCode};

/// Price breakdown for a region the account may file in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub base_price: Money,
    pub discount: Money,
    pub price: Money,
}

/// Resolves what an account pays to file in a region.
#[derive(Debug, Clone, Copy)]
pub struct PricingResolver {
    referral_discount: Money,
}

impl PricingResolver {
    pub fn new(referral_discount: Money) -> Self {
        Self {
            referral_discount: referral_discount.clamp_non_negative(),
        }
    }

    pub fn from_policy(policy: &IntakePolicy) -> Self {
        Self::new(policy.referral_discount)
    }

    /// Any non-blank referral code earns the flat discount; codes are not checked against a
    /// registry. A result that clamps to zero is refused.
    pub fn resolve(&self, account: &Account, region: &str) -> Result<Quote, Violation> {
        let entry = account.region_price(region).ok_or_else(|| {
            Violation::domain(
                ViolationCode::RegionUnpriced,
                format!("filing is not priced for {region} on this account"),
            )
        })?;

        if !entry.unlocked {
            return Err(Violation::domain(
                ViolationCode::RegionLocked,
                format!("{region} is locked and not accepting new filings"),
            ));
        }

        let discount = if account.has_referral() {
            self.referral_discount
        } else {
            Money::ZERO
        };
        let price = entry.price.saturating_sub(discount).clamp_non_negative();

        if !price.is_positive() {
            return Err(Violation::domain(
                ViolationCode::NonPositivePrice,
                format!("resolved price for {region} is {price}; filing cannot be waived"),
            ));
        }

        Ok(Quote {
            base_price: entry.price,
            discount,
            price,
        })
    }
}

impl Default for PricingResolver {
    fn default() -> Self {
        Self::from_policy(&IntakePolicy::default())
    }
}
