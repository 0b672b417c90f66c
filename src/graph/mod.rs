//! Donation flow graph
//!
//! - [`Aggregates`]: per-donor, per-recipient and per-pair sums
//! - [`DonationGraph`]: nodes and edges with their visual attributes
//! - [`Palette`]: party-prefix and role colors

pub mod aggregate;
pub mod builder;
pub mod palette;

pub use aggregate::{Aggregates, EdgeKey};
pub use builder::{DonationEdge, DonationGraph, GraphSummary, NodeAttributes, NodeRole, VisualConfig};
pub use palette::{Palette, PrefixColor};

use thiserror::Error;

/// Errors that can occur while building the graph
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("No Data: no donation records for the requested period")]
    NoData,

    #[error("Amount overflow: donations from {donor:?} to {recipient:?} exceed the representable total")]
    AmountOverflow { donor: String, recipient: String },

    #[error("Internal invariant violated: edge endpoint {0:?} has no node attributes")]
    MissingNode(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
