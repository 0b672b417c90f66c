//! yEd styling pass
//!
//! Parses a standard GraphML document and grafts a `y:ShapeNode` onto each
//! node element: square geometry sized by the node's scaled size, fill color,
//! a centered label carrying the node id and an ellipse shape. The pass is
//! idempotent: the node-graphics key is only declared once and a node's
//! existing graphics data is replaced rather than appended to.

use super::xml::{self, Element};
use super::{format_double, keys, SerializeError, SerializeResult, YWORKS_NS};
use crate::graph::{DonationGraph, NodeAttributes};
use tracing::{debug, warn};

/// Result of the styling pass
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched {
    /// The enriched document
    pub xml: String,
    /// Number of node elements that received styling
    pub styled: usize,
    /// Graph nodes with no matching element in the base document
    pub skipped: Vec<String>,
}

/// Qualified-name helper for one namespace prefix
struct Names {
    prefix: String,
}

impl Names {
    fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().to_string(),
        }
    }

    fn q(&self, local: &str) -> String {
        if self.prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", self.prefix, local)
        }
    }
}

/// Add yEd node styling to the GraphML document `base_xml`
pub fn enrich_yed(base_xml: &str, graph: &DonationGraph) -> SerializeResult<Enriched> {
    let mut root = xml::parse(base_xml)?;
    if root.local_name() != "graphml" {
        return Err(SerializeError::NotGraphml(root.name.clone()));
    }

    let g = Names::new(root.prefix());
    let y = Names::new(Some(yworks_prefix(&mut root)));

    let has_key = root.child_elements().any(|e| {
        e.local_name() == "key" && e.attr("id") == Some(keys::NODE_GRAPHICS)
    });
    if !has_key {
        let key = Element::new(g.q("key"))
            .with_attr("for", "node")
            .with_attr("id", keys::NODE_GRAPHICS)
            .with_attr("yfiles.type", "nodegraphics");
        root.children.insert(0, xml::XmlNode::Element(key));
    }

    let mut styled = 0;
    let mut skipped = Vec::new();

    for (id, attrs) in &graph.nodes {
        // Ids as written, without characters XML cannot carry
        let written = xml::xml_safe(id);
        let target = root.find_mut(&|e: &Element| {
            e.local_name() == "node" && e.attr("id") == Some(&*written)
        });
        match target {
            Some(node) => {
                style_node(node, id, attrs, &g, &y);
                styled += 1;
            }
            None => {
                warn!("No <node id={:?}> in base document, skipping yEd styling", id);
                skipped.push(id.clone());
            }
        }
    }

    debug!("Styled {} nodes for yEd ({} skipped)", styled, skipped.len());
    Ok(Enriched {
        xml: xml::to_document(&root),
        styled,
        skipped,
    })
}

/// Prefix bound to the yWorks namespace on the root, declaring `y` if absent
fn yworks_prefix(root: &mut Element) -> &str {
    if root.declared_prefix(YWORKS_NS).is_none() {
        root.set_attr("xmlns:y", YWORKS_NS);
    }
    root.declared_prefix(YWORKS_NS).unwrap_or("y")
}

fn style_node(node: &mut Element, id: &str, attrs: &NodeAttributes, g: &Names, y: &Names) {
    let size = format_double(attrs.size);

    let shape = Element::new(y.q("ShapeNode"))
        .with_child(
            Element::new(y.q("Geometry"))
                .with_attr("height", size.as_str())
                .with_attr("width", size.as_str())
                .with_attr("x", "0")
                .with_attr("y", "0"),
        )
        .with_child(
            Element::new(y.q("Fill"))
                .with_attr("color", attrs.color.as_str())
                .with_attr("transparent", "false"),
        )
        .with_child(
            Element::new(y.q("NodeLabel"))
                .with_attr("alignment", "center")
                .with_attr("autoSizePolicy", "content")
                .with_attr("fontFamily", "Dialog")
                .with_attr("fontSize", "12")
                .with_attr("fontStyle", "plain")
                .with_attr("hasBackgroundColor", "false")
                .with_attr("hasLineColor", "false")
                .with_attr("height", "4")
                .with_attr("modelName", "custom")
                .with_attr("textColor", "#000000")
                .with_attr("visible", "true")
                .with_text(id),
        )
        .with_child(Element::new(y.q("Shape")).with_attr("type", "ellipse"));

    let existing = node.child_elements_mut().find(|e| {
        e.local_name() == "data" && e.attr("key") == Some(keys::NODE_GRAPHICS)
    });
    match existing {
        Some(data) => {
            data.children.clear();
            data.push(shape);
        }
        None => node.push(
            Element::new(g.q("data"))
                .with_attr("key", keys::NODE_GRAPHICS)
                .with_child(shape),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Aggregates, VisualConfig};
    use crate::graphml::{write_graphml, GRAPHML_NS};
    use crate::record::{Amount, DonationRecord};

    fn graph() -> DonationGraph {
        let records = vec![
            DonationRecord::new("Acme Pty", "LIB-VIC", "2014-15", Amount::from_dollars(2500)),
            DonationRecord::new("Beta", "LIB-VIC", "2014-15", Amount::from_dollars(100)),
        ];
        let agg = Aggregates::from_records(&records).unwrap();
        DonationGraph::build(&agg, &VisualConfig::default()).unwrap()
    }

    #[test]
    fn test_every_node_is_styled() {
        let graph = graph();
        let enriched = enrich_yed(&write_graphml(&graph), &graph).unwrap();
        assert_eq!(enriched.styled, 3);
        assert!(enriched.skipped.is_empty());

        let doc = roxmltree::Document::parse(&enriched.xml).unwrap();
        let root = doc.root_element();

        let first = root.first_element_child().unwrap();
        assert!(first.has_tag_name((GRAPHML_NS, "key")));
        assert_eq!(first.attribute("id"), Some("d6"));
        assert_eq!(first.attribute("yfiles.type"), Some("nodegraphics"));

        let lib = root
            .descendants()
            .find(|n| n.has_tag_name("node") && n.attribute("id") == Some("LIB-VIC"))
            .unwrap();
        let shape = lib
            .descendants()
            .find(|n| n.has_tag_name((YWORKS_NS, "ShapeNode")))
            .unwrap();

        let geometry = shape.children().find(|n| n.has_tag_name((YWORKS_NS, "Geometry"))).unwrap();
        assert_eq!(geometry.attribute("height"), Some("100.0"));
        assert_eq!(geometry.attribute("width"), Some("100.0"));

        let fill = shape.children().find(|n| n.has_tag_name((YWORKS_NS, "Fill"))).unwrap();
        assert_eq!(fill.attribute("color"), Some("#1e90ff"));

        let label = shape.children().find(|n| n.has_tag_name((YWORKS_NS, "NodeLabel"))).unwrap();
        assert_eq!(label.text(), Some("LIB-VIC"));

        let kind = shape.children().find(|n| n.has_tag_name((YWORKS_NS, "Shape"))).unwrap();
        assert_eq!(kind.attribute("type"), Some("ellipse"));
    }

    #[test]
    fn test_prefixes_are_preserved() {
        let graph = graph();
        let enriched = enrich_yed(&write_graphml(&graph), &graph).unwrap();
        assert!(enriched.xml.contains("<y:ShapeNode>"));
        assert!(enriched.xml.contains(r#"<data key="d6">"#));
        assert!(enriched.xml.contains(r#"xsi:schemaLocation="#));
        assert_eq!(enriched.xml.matches("xmlns:y=").count(), 1);
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let graph = graph();
        let once = enrich_yed(&write_graphml(&graph), &graph).unwrap();
        let twice = enrich_yed(&once.xml, &graph).unwrap();
        assert_eq!(once.xml, twice.xml);
        assert_eq!(twice.xml.matches(r#"id="d6""#).count(), 1);
        assert_eq!(twice.xml.matches("<y:ShapeNode>").count(), 3);
    }

    #[test]
    fn test_missing_nodes_are_skipped() {
        let graph = graph();
        let base = write_graphml(&graph).replace(r#"<node id="Beta">"#, r#"<node id="Gamma">"#);
        let enriched = enrich_yed(&base, &graph).unwrap();

        assert_eq!(enriched.styled, 2);
        assert_eq!(enriched.skipped, vec!["Beta".to_string()]);
        assert_eq!(enriched.xml.matches("<y:ShapeNode>").count(), 2);
    }

    #[test]
    fn test_declares_yworks_namespace_when_absent() {
        let base = r#"<?xml version="1.0"?>
<g:graphml xmlns:g="http://graphml.graphdrawing.org/xmlns">
  <g:graph edgedefault="directed">
    <g:node id="Acme Pty" />
  </g:graph>
</g:graphml>"#;
        let enriched = enrich_yed(base, &graph()).unwrap();

        assert_eq!(enriched.styled, 1);
        assert_eq!(enriched.skipped.len(), 2);
        assert!(enriched.xml.contains(r#"xmlns:y="http://www.yworks.com/xml/graphml""#));
        assert!(enriched.xml.contains(r#"<g:key for="node" id="d6""#));
        assert!(enriched.xml.contains(r#"<g:data key="d6">"#));
        roxmltree::Document::parse(&enriched.xml).unwrap();
    }

    #[test]
    fn test_control_characters_in_names() {
        let records = vec![
            DonationRecord {
                donor: "Acme\u{1}Pty".to_string(),
                ..DonationRecord::new("", "LIB-VIC", "2014-15", Amount::from_dollars(10))
            },
            DonationRecord::new("Beta", "LIB-VIC", "2014-15", Amount::from_dollars(20)),
        ];
        let agg = Aggregates::from_records(&records).unwrap();
        let graph = DonationGraph::build(&agg, &VisualConfig::default()).unwrap();

        let base = write_graphml(&graph);
        roxmltree::Document::parse(&base).unwrap();

        let enriched = enrich_yed(&base, &graph).unwrap();
        assert_eq!(enriched.styled, 3);
        assert!(enriched.skipped.is_empty());
        let doc = roxmltree::Document::parse(&enriched.xml).unwrap();
        assert!(doc
            .descendants()
            .any(|n| n.has_tag_name("node") && n.attribute("id") == Some("AcmePty")));
    }

    #[test]
    fn test_rejects_non_graphml() {
        let err = enrich_yed("<svg />", &graph()).unwrap_err();
        assert!(matches!(err, SerializeError::NotGraphml(_)));
        assert!(matches!(enrich_yed("not xml", &graph()), Err(SerializeError::Xml(_))));
    }
}
