//! Default expiry policies for tokens issued without an explicit date

use chrono::{Months, NaiveDate, Utc};
use std::fmt::Debug;

/// Source of the expiry date used when the caller supplies none
pub trait DefaultExpiry: Send + Sync + Debug {
    fn default_expiry(&self) -> NaiveDate;
}

/// Expire a fixed number of years after today (UTC)
///
/// The default of 100 years acts as a "never expires" sentinel while still
/// storing a concrete date.
#[derive(Debug, Clone, Copy)]
pub struct YearsFromToday {
    years: u32,
}

impl YearsFromToday {
    pub const DEFAULT_YEARS: u32 = 100;

    pub fn new(years: u32) -> Self {
        Self { years }
    }
}

impl Default for YearsFromToday {
    fn default() -> Self {
        Self::new(Self::DEFAULT_YEARS)
    }
}

impl DefaultExpiry for YearsFromToday {
    fn default_expiry(&self) -> NaiveDate {
        let today = Utc::now().date_naive();

        self.years
            .checked_mul(12)
            .and_then(|months| today.checked_add_months(Months::new(months)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Always expire on the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedExpiry(pub NaiveDate);

impl DefaultExpiry for FixedExpiry {
    fn default_expiry(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_years_from_today() {
        let today = Utc::now().date_naive();
        let expiry = YearsFromToday::new(2).default_expiry();

        assert_eq!(expiry.year(), today.year() + 2);
        assert_eq!(expiry.month(), today.month());
    }

    #[test]
    fn test_default_is_far_future() {
        let today = Utc::now().date_naive();
        let expiry = YearsFromToday::default().default_expiry();

        assert_eq!(expiry.year(), today.year() + 100);
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(YearsFromToday::new(u32::MAX).default_expiry(), NaiveDate::MAX);
    }

    #[test]
    fn test_fixed_expiry() {
        let date = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap();
        assert_eq!(FixedExpiry(date).default_expiry(), date);
    }
}
