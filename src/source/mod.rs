//! Donation record sources
//!
//! The pipeline only needs an in-memory sequence of [`DonationRecord`]s; where
//! they come from is behind the [`RecordSource`] trait. [`CsvSource`] reads a
//! CSV export of the disclosure spreadsheet.

mod csv_source;

pub use csv_source::{distinct_values, CsvSource};

use crate::record::DonationRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading records
#[derive(Error, Debug)]
pub enum SourceError {
    /// Missing column, unparseable or negative amount
    #[error("Input Schema error: {0}")]
    InputSchema(String),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Anything that can yield the full set of donation records
pub trait RecordSource {
    /// Read every record; fails without yielding a partial set
    fn records(&mut self) -> SourceResult<Vec<DonationRecord>>;
}

impl RecordSource for Vec<DonationRecord> {
    fn records(&mut self) -> SourceResult<Vec<DonationRecord>> {
        Ok(self.clone())
    }
}

/// Header names of the four required columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub donor: String,
    pub recipient: String,
    pub financial_year: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            donor: "Donor Name".to_string(),
            recipient: "Donation Made To".to_string(),
            financial_year: "Financial Year".to_string(),
            amount: "Amount".to_string(),
        }
    }
}

/// Keeps the records of a single reporting period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    period: Option<String>,
}

impl PeriodFilter {
    /// Filter on one financial year, e.g. `2014-15`
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
        }
    }

    /// Filter that keeps everything
    pub fn all() -> Self {
        Self { period: None }
    }

    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    pub fn matches(&self, record: &DonationRecord) -> bool {
        match &self.period {
            Some(period) => record.financial_year.trim() == period.trim(),
            None => true,
        }
    }

    pub fn apply(&self, records: Vec<DonationRecord>) -> Vec<DonationRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl From<Option<String>> for PeriodFilter {
    fn from(period: Option<String>) -> Self {
        Self { period }
    }
}
