//! Single-pass reductions over the donation records

use super::{GraphError, GraphResult};
use crate::record::{Amount, DonationRecord};
use indexmap::IndexMap;

/// Ordered (donor, recipient) pair
pub type EdgeKey = (String, String);

/// Totals derived from one period's records
///
/// Every map keeps first-seen order so downstream output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// Donor -> total given
    pub given: IndexMap<String, Amount>,
    /// Recipient -> total received
    pub received: IndexMap<String, Amount>,
    /// (donor, recipient) -> summed weight
    pub edges: IndexMap<EdgeKey, Amount>,
}

impl Aggregates {
    /// Reduce `records`; an empty set is [`GraphError::NoData`]
    pub fn from_records<'a, I>(records: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = &'a DonationRecord>,
    {
        let mut agg = Aggregates::default();

        for record in records {
            let overflow = || GraphError::AmountOverflow {
                donor: record.donor.clone(),
                recipient: record.recipient.clone(),
            };
            accumulate(agg.given.entry(record.donor.clone()).or_default(), record.amount)
                .ok_or_else(overflow)?;
            accumulate(agg.received.entry(record.recipient.clone()).or_default(), record.amount)
                .ok_or_else(overflow)?;
            accumulate(
                agg.edges
                    .entry((record.donor.clone(), record.recipient.clone()))
                    .or_default(),
                record.amount,
            )
            .ok_or_else(overflow)?;
        }

        if agg.edges.is_empty() {
            return Err(GraphError::NoData);
        }
        Ok(agg)
    }

    pub fn total_given(&self, name: &str) -> Amount {
        self.given.get(name).copied().unwrap_or_default()
    }

    pub fn total_received(&self, name: &str) -> Amount {
        self.received.get(name).copied().unwrap_or_default()
    }

    /// Given plus received; a name on both sides reports the combined figure
    pub fn total(&self, name: &str) -> Amount {
        self.total_given(name) + self.total_received(name)
    }

    /// Merged per-entity totals, donors first then recipients, first-seen order
    pub fn totals(&self) -> IndexMap<String, Amount> {
        self.given
            .keys()
            .chain(self.received.keys())
            .map(|name| (name.clone(), self.total(name)))
            .collect()
    }

    /// Sum of every record
    pub fn grand_total(&self) -> Amount {
        self.edges.values().sum()
    }
}

fn accumulate(total: &mut Amount, amount: Amount) -> Option<()> {
    *total = total.checked_add(amount)?;
    Some(())
}
