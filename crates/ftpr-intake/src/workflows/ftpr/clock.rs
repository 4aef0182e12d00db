use chrono::{FixedOffset, NaiveDate, Utc};

use super::policy::IntakePolicy;

/// Source of "today" for lead-time checks.
pub trait IntakeClock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock pinned to a single fixed-offset zone so every check agrees on the date.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_policy(policy: &IntakePolicy) -> Self {
        Self::new(policy.utc_offset())
    }
}

impl IntakeClock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl IntakeClock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
