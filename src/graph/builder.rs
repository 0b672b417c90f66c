//! Graph assembly and visual encoding
//!
//! Turns [`Aggregates`] into a [`DonationGraph`]:
//! 1. node set = every donor and recipient named by an edge, first-seen order
//! 2. node total = given + received
//! 3. node totals -> sizes, edge weights -> thicknesses (square-root scaled)
//! 4. node color from the [`Palette`]
//! 5. label = name wrapped to a fixed column width

use super::aggregate::Aggregates;
use super::palette::Palette;
use super::{GraphError, GraphResult};
use crate::record::Amount;
use donorflow_visual::{sqrt_scale, wrap_label, ScaleRange};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Visual encoding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Node size bounds
    pub size: ScaleRange,
    /// Edge thickness bounds
    pub thickness: ScaleRange,
    /// Label wrap width in characters
    pub wrap_width: usize,
    pub palette: Palette,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            size: ScaleRange::new(10.0, 100.0),
            thickness: ScaleRange::new(1.0, 10.0),
            wrap_width: 12,
            palette: Palette::default(),
        }
    }
}

/// Which side(s) of a donation a node appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Donor,
    Recipient,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAttributes {
    /// Wrapped display label
    pub label: String,
    /// Scaled node size
    pub size: f64,
    /// Total given plus received
    pub amount: Amount,
    /// Hex fill color
    pub color: String,
    pub role: NodeRole,
}

/// One donor -> recipient edge, carrying its own thickness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationEdge {
    pub donor: String,
    pub recipient: String,
    /// Summed donations between the pair
    pub weight: Amount,
    /// Scaled line thickness
    pub thickness: f64,
}

/// Attributed donation flow graph, at most one edge per ordered pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DonationGraph {
    /// Name -> attributes, in first-seen order
    pub nodes: IndexMap<String, NodeAttributes>,
    /// Edges in first-seen order
    pub edges: Vec<DonationEdge>,
}

/// Headline figures for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub total: Amount,
    pub top_donors: Vec<(String, Amount)>,
    pub top_recipients: Vec<(String, Amount)>,
}

impl DonationGraph {
    /// Build the attributed graph from aggregated totals
    pub fn build(agg: &Aggregates, config: &VisualConfig) -> GraphResult<Self> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for (donor, recipient) in agg.edges.keys() {
            names.insert(donor);
            names.insert(recipient);
        }
        if names.is_empty() {
            return Err(GraphError::NoData);
        }

        let totals: Vec<Amount> = names.iter().map(|name| agg.total(name)).collect();
        let sizes = sqrt_scale(
            &totals.iter().map(Amount::as_f64).collect::<Vec<_>>(),
            config.size,
        );

        let mut nodes = IndexMap::with_capacity(names.len());
        for ((name, amount), size) in names.iter().zip(totals).zip(sizes) {
            let role = match (agg.given.contains_key(*name), agg.received.contains_key(*name)) {
                (true, true) => NodeRole::Both,
                (true, false) => NodeRole::Donor,
                _ => NodeRole::Recipient,
            };
            let attrs = NodeAttributes {
                label: wrap_label(name, config.wrap_width),
                size,
                amount,
                color: config.palette.color_for(name, role).to_string(),
                role,
            };
            nodes.insert(name.to_string(), attrs);
        }

        let weights: Vec<f64> = agg.edges.values().map(Amount::as_f64).collect();
        let thicknesses = sqrt_scale(&weights, config.thickness);

        let mut edges = Vec::with_capacity(agg.edges.len());
        for (((donor, recipient), weight), thickness) in agg.edges.iter().zip(thicknesses) {
            for endpoint in [donor, recipient] {
                if !nodes.contains_key(endpoint) {
                    return Err(GraphError::MissingNode(endpoint.clone()));
                }
            }
            edges.push(DonationEdge {
                donor: donor.clone(),
                recipient: recipient.clone(),
                weight: *weight,
                thickness,
            });
        }

        info!(
            "Built donation graph: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        Ok(Self { nodes, edges })
    }

    pub fn node(&self, name: &str) -> Option<&NodeAttributes> {
        self.nodes.get(name)
    }

    pub fn edge(&self, donor: &str, recipient: &str) -> Option<&DonationEdge> {
        self.edges
            .iter()
            .find(|e| e.donor == donor && e.recipient == recipient)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Counts, overall total and the `top` largest donors and recipients
    pub fn summary(&self, top: usize) -> GraphSummary {
        let mut given: IndexMap<&str, Amount> = IndexMap::new();
        let mut received: IndexMap<&str, Amount> = IndexMap::new();
        for edge in &self.edges {
            *given.entry(&edge.donor).or_default() += edge.weight;
            *received.entry(&edge.recipient).or_default() += edge.weight;
        }

        let ranked = |map: IndexMap<&str, Amount>| {
            let mut entries: Vec<(String, Amount)> =
                map.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            entries.truncate(top);
            entries
        };

        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            total: self.edges.iter().map(|e| e.weight).sum(),
            top_donors: ranked(given),
            top_recipients: ranked(received),
        }
    }
}
