//! Donation records and exact currency amounts

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a textual amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,

    #[error("negative amount: {0}")]
    Negative(String),

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount {0} has more than two decimal places")]
    TooPrecise(String),
}

/// Non-negative currency amount held as whole cents
///
/// Integer cents keep every sum exact, so aggregation does not depend on the
/// order records are visited in. `+` saturates at `u64::MAX` cents; use
/// [`Amount::checked_add`] where overflow must be reported. Serialized as the
/// dollar string shown by `Display`, e.g. `"1500.00"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: u64) -> Self {
        Amount(cents)
    }

    /// Saturates at `u64::MAX` cents
    pub const fn from_dollars(dollars: u64) -> Self {
        Amount(dollars.saturating_mul(100))
    }

    /// `None` on overflow
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Amount in dollars as a float, for scaling and GraphML output
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts `1000`, `1000.5`, `1,000.50` and `$1,000.50`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        let digits: String = trimmed
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits.as_str(), ""),
        };

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(AmountError::Invalid(trimmed.to_string()));
        }
        if frac.len() > 2 {
            return Err(AmountError::TooPrecise(trimmed.to_string()));
        }

        let invalid = || AmountError::Invalid(trimmed.to_string());
        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Amount)
            .ok_or_else(invalid)
    }
}

/// One row of the donation disclosure return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    /// Donor as disclosed
    pub donor: String,
    /// Recipient as disclosed (or canonicalized, once the rules have run)
    pub recipient: String,
    /// Reporting period, e.g. `2014-15`
    pub financial_year: String,
    pub amount: Amount,
}

impl DonationRecord {
    pub fn new(
        donor: impl Into<String>,
        recipient: impl Into<String>,
        financial_year: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            donor: donor.into(),
            recipient: recipient.into(),
            financial_year: financial_year.into(),
            amount,
        }
    }
}
