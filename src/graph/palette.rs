//! Node colors
//!
//! Party prefixes are tested case-insensitively in priority order; the first
//! match wins. Names without a party prefix are colored by role.

use super::builder::NodeRole;
use serde::{Deserialize, Serialize};

/// A name prefix and the hex color it selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixColor {
    pub prefix: String,
    pub color: String,
}

impl PrefixColor {
    pub fn new(prefix: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Checked in order
    pub parties: Vec<PrefixColor>,
    /// Nodes that only give
    pub donor: String,
    /// Nodes that receive (including those that also give)
    pub recipient: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            parties: vec![
                PrefixColor::new("lib-", "#1e90ff"),
                PrefixColor::new("nat-", "#3366ff"),
                PrefixColor::new("alp-", "#ff6600"),
                PrefixColor::new("green-", "#32cd32"),
            ],
            donor: "#c0c0c0".to_string(),
            recipient: "#ffcc00".to_string(),
        }
    }
}

impl Palette {
    /// Color for a node with the given name and role
    pub fn color_for(&self, name: &str, role: NodeRole) -> &str {
        let lowered = name.to_lowercase();
        self.parties
            .iter()
            .find(|p| lowered.contains(&p.prefix.to_lowercase()))
            .map(|p| p.color.as_str())
            .unwrap_or(match role {
                NodeRole::Donor => self.donor.as_str(),
                NodeRole::Recipient | NodeRole::Both => self.recipient.as_str(),
            })
    }
}
