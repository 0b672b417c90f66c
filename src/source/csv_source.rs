//! CSV export of the annual donations return

use super::{ColumnNames, RecordSource, SourceError, SourceResult};
use crate::record::{Amount, DonationRecord};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use indexmap::IndexSet;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// Record source over a CSV document with a header row
pub struct CsvSource<R> {
    reader: Reader<R>,
    columns: ColumnNames,
}

impl CsvSource<File> {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>, columns: ColumnNames) -> SourceResult<Self> {
        let path = path.as_ref();
        info!("Reading donation records from {:?}", path);
        let reader = builder().from_path(path)?;
        Ok(Self { reader, columns })
    }
}

impl<R: io::Read> CsvSource<R> {
    /// Read CSV from any reader
    pub fn from_reader(rdr: R, columns: ColumnNames) -> Self {
        Self {
            reader: builder().from_reader(rdr),
            columns,
        }
    }
}

impl<R: io::Read> RecordSource for CsvSource<R> {
    fn records(&mut self) -> SourceResult<Vec<DonationRecord>> {
        let headers = self.reader.headers()?.clone();
        let donor = column_index(&headers, &self.columns.donor)?;
        let recipient = column_index(&headers, &self.columns.recipient)?;
        let year = column_index(&headers, &self.columns.financial_year)?;
        let amount = column_index(&headers, &self.columns.amount)?;

        let mut records = Vec::new();
        for row in self.reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let field = |idx: usize| row.get(idx).unwrap_or_default();

            let parsed: Amount = field(amount).parse().map_err(|e| {
                SourceError::InputSchema(format!(
                    "line {}: column {:?}: {}",
                    line, self.columns.amount, e
                ))
            })?;

            let name = |idx: usize, column: &str| {
                let cleaned = clean_name(field(idx));
                if cleaned.is_empty() {
                    Err(SourceError::InputSchema(format!(
                        "line {}: column {:?} is empty",
                        line, column
                    )))
                } else {
                    Ok(cleaned)
                }
            };

            records.push(DonationRecord::new(
                name(donor, &self.columns.donor)?,
                name(recipient, &self.columns.recipient)?,
                field(year),
                parsed,
            ));
        }

        info!("Read {} donation records", records.len());
        Ok(records)
    }
}

/// Distinct values of `column`, in first-seen order
pub fn distinct_values<R: io::Read>(rdr: R, column: &str) -> SourceResult<Vec<String>> {
    let mut reader = builder().from_reader(rdr);
    let headers = reader.headers()?.clone();
    let idx = column_index(&headers, column)?;

    let mut seen = IndexSet::new();
    for row in reader.records() {
        let row = row?;
        seen.insert(row.get(idx).unwrap_or_default().to_string());
    }
    Ok(seen.into_iter().collect())
}

/// Control characters become spaces, then whitespace runs collapse
fn clean_name(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).trim(Trim::All);
    builder
}

fn column_index(headers: &StringRecord, name: &str) -> SourceResult<usize> {
    headers
        .iter()
        .position(|h| h == name.trim())
        .ok_or_else(|| {
            SourceError::InputSchema(format!(
                "missing required column {:?} (found: {})",
                name,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Donor Name,Donation Made To,Financial Year,Amount,Industry Sector
Acme Pty,Liberal Party Victoria,2014-15,1000,Mining
Acme Pty,lib vic branch,2014-15,\"$1,500.25\",Mining
Beta Ltd,Australian Greens,2015-16,20,Retail
";

    #[test]
    fn test_read_records() {
        let mut source = CsvSource::from_reader(SAMPLE.as_bytes(), ColumnNames::default());
        let records = source.records().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].donor, "Acme Pty");
        assert_eq!(records[0].recipient, "Liberal Party Victoria");
        assert_eq!(records[1].amount, Amount::from_cents(150_025));
        assert_eq!(records[2].financial_year, "2015-16");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "Donor,Donation Made To,Financial Year,Amount\nA,B,2014-15,1\n";
        let mut source = CsvSource::from_reader(csv.as_bytes(), ColumnNames::default());
        let err = source.records().unwrap_err();
        match err {
            SourceError::InputSchema(msg) => assert!(msg.contains("Donor Name"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_amount_is_schema_error() {
        let csv = "Donor Name,Donation Made To,Financial Year,Amount\nA,B,2014-15,-5\n";
        let mut source = CsvSource::from_reader(csv.as_bytes(), ColumnNames::default());
        assert!(matches!(source.records(), Err(SourceError::InputSchema(_))));
    }

    #[test]
    fn test_blank_names_are_schema_errors() {
        let blank_donor = "Donor Name,Donation Made To,Financial Year,Amount\n,Liberal Party Victoria,2014-15,10\n";
        let mut source = CsvSource::from_reader(blank_donor.as_bytes(), ColumnNames::default());
        match source.records().unwrap_err() {
            SourceError::InputSchema(msg) => {
                assert!(msg.contains("line 2"), "{msg}");
                assert!(msg.contains("Donor Name"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let blank_recipient = "Donor Name,Donation Made To,Financial Year,Amount\nAcme,Liberal Party Victoria,2014-15,10\nAcme,  ,2014-15,20\n";
        let mut source = CsvSource::from_reader(blank_recipient.as_bytes(), ColumnNames::default());
        match source.records().unwrap_err() {
            SourceError::InputSchema(msg) => {
                assert!(msg.contains("line 3"), "{msg}");
                assert!(msg.contains("Donation Made To"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_control_characters_in_names() {
        let csv = "Donor Name,Donation Made To,Financial Year,Amount\nAcme\u{b}Pty\u{1},Liberal  Party\u{7}Victoria,2014-15,10\n";
        let records = CsvSource::from_reader(csv.as_bytes(), ColumnNames::default())
            .records()
            .unwrap();
        assert_eq!(records[0].donor, "Acme Pty");
        assert_eq!(records[0].recipient, "Liberal Party Victoria");

        let only_controls = "Donor Name,Donation Made To,Financial Year,Amount\n\u{1},B,2014-15,10\n";
        let mut source = CsvSource::from_reader(only_controls.as_bytes(), ColumnNames::default());
        assert!(matches!(source.records(), Err(SourceError::InputSchema(_))));
    }

    #[test]
    fn test_custom_column_names() {
        let csv = "giver,taker,fy,aud\nA,B,2014-15,7\n";
        let columns = ColumnNames {
            donor: "giver".into(),
            recipient: "taker".into(),
            financial_year: "fy".into(),
            amount: "aud".into(),
        };
        let records = CsvSource::from_reader(csv.as_bytes(), columns).records().unwrap();
        assert_eq!(records[0].amount, Amount::from_dollars(7));
    }

    #[test]
    fn test_distinct_values() {
        let values = distinct_values(SAMPLE.as_bytes(), "Industry Sector").unwrap();
        assert_eq!(values, vec!["Mining", "Retail"]);
        assert!(distinct_values(SAMPLE.as_bytes(), "Nope").is_err());
    }
}
