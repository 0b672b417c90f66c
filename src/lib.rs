//! Donorflow
//!
//! Turns a political donation disclosure dataset into a weighted, directed
//! donor -> recipient graph and exports it as GraphML, plus a yEd-styled
//! variant ready for visual layout.
//!
//! # Pipeline
//!
//! 1. Read records from a [`RecordSource`] (CSV by default)
//! 2. Keep one financial year ([`PeriodFilter`])
//! 3. Collapse recipient name variants to canonical party labels ([`Canonicalizer`])
//! 4. Sum donations per donor, per recipient and per pair ([`Aggregates`])
//! 5. Build the attributed graph: sizes, thicknesses, colors, wrapped labels
//!    ([`DonationGraph`])
//! 6. Serialize to standard GraphML, then enrich it with yEd node graphics
//!
//! ## Example Usage
//!
//! ```rust
//! use donorflow::{Amount, DonationRecord, Pipeline, PipelineConfig};
//!
//! let records = vec![
//!     DonationRecord::new("Acme Pty Ltd", "Liberal Party of Australia - Victorian Division",
//!         "2014-15", Amount::from_dollars(1000)),
//!     DonationRecord::new("Acme Pty Ltd", "Liberal Party (Vic Branch)",
//!         "2014-15", Amount::from_dollars(500)),
//! ];
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let output = pipeline.render(&mut records.clone()).unwrap();
//!
//! let edge = output.graph.edge("Acme Pty Ltd", "LIB-VIC").unwrap();
//! assert_eq!(edge.weight, Amount::from_dollars(1500));
//! assert!(output.yed.xml.contains("y:ShapeNode"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod config;
pub mod graph;
pub mod graphml;
pub mod pipeline;
pub mod record;
pub mod source;

// Re-export main types for convenience
pub use canonical::{default_rules, Canonicalizer, Rewrite, Rule, RuleError, RuleResult};

pub use config::{ConfigError, ConfigResult, OutputConfig, PipelineConfig};

pub use graph::{
    Aggregates, DonationEdge, DonationGraph, GraphError, GraphResult, GraphSummary,
    NodeAttributes, NodeRole, Palette, PrefixColor, VisualConfig,
};

pub use graphml::{enrich_yed, write_graphml, Enriched, SerializeError, SerializeResult};

pub use pipeline::{write_atomic, Pipeline, PipelineError, PipelineOutput, PipelineResult, RunReport};

pub use record::{Amount, AmountError, DonationRecord};

pub use source::{
    distinct_values, ColumnNames, CsvSource, PeriodFilter, RecordSource, SourceError,
    SourceResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
