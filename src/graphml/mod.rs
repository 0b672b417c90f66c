//! GraphML export with yEd styling
//!
//! Two documents are produced from a [`DonationGraph`](crate::graph::DonationGraph):
//! - the standard GraphML document ([`write_graphml`]), with label, size,
//!   amount and color on nodes and weight and thickness on edges
//! - a yEd variant ([`enrich_yed`]) that parses the standard document and
//!   grafts `y:ShapeNode` styling onto every node element

pub mod standard;
pub mod xml;
pub mod yed;

pub use standard::{graphml_tree, write_graphml};
pub use yed::{enrich_yed, Enriched};

use thiserror::Error;

/// GraphML namespace
pub const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
/// yWorks extension namespace understood by yEd
pub const YWORKS_NS: &str = "http://www.yworks.com/xml/graphml";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Key ids of the data fields
pub mod keys {
    pub const LABEL: &str = "d0";
    pub const SIZE: &str = "d1";
    pub const AMOUNT: &str = "d2";
    pub const COLOR: &str = "d3";
    pub const WEIGHT: &str = "d4";
    pub const THICKNESS: &str = "d5";
    /// yEd node graphics
    pub const NODE_GRAPHICS: &str = "d6";
}

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("not a GraphML document: root element is <{0}>")]
    NotGraphml(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// Format a double the way GraphML readers expect (`10.0`, `3.25`)
pub(crate) fn format_double(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(10.0), "10.0");
        assert_eq!(format_double(3.25), "3.25");
        assert_eq!(format_double(1500.5), "1500.5");
    }
}
