//! Standard GraphML document

use super::xml::{to_document, Element};
use super::{format_double, keys, GRAPHML_NS, SCHEMA_LOCATION, XSI_NS, YWORKS_NS};
use crate::graph::DonationGraph;

/// (id, domain, attribute name, attribute type)
const DATA_KEYS: &[(&str, &str, &str, &str)] = &[
    (keys::LABEL, "node", "label", "string"),
    (keys::SIZE, "node", "size", "double"),
    (keys::AMOUNT, "node", "amount", "double"),
    (keys::COLOR, "node", "color", "string"),
    (keys::WEIGHT, "edge", "weight", "double"),
    (keys::THICKNESS, "edge", "thickness", "double"),
];

fn data(key: &str, value: impl Into<String>) -> Element {
    Element::new("data").with_attr("key", key).with_text(value)
}

/// Element tree of the standard document
pub fn graphml_tree(graph: &DonationGraph) -> Element {
    let mut root = Element::new("graphml")
        .with_attr("xmlns", GRAPHML_NS)
        .with_attr("xmlns:xsi", XSI_NS)
        .with_attr("xmlns:y", YWORKS_NS)
        .with_attr("xsi:schemaLocation", SCHEMA_LOCATION);

    for (id, domain, name, ty) in DATA_KEYS {
        root.push(
            Element::new("key")
                .with_attr("id", *id)
                .with_attr("for", *domain)
                .with_attr("attr.name", *name)
                .with_attr("attr.type", *ty),
        );
    }

    let mut body = Element::new("graph").with_attr("edgedefault", "directed");

    for (name, attrs) in &graph.nodes {
        body.push(
            Element::new("node")
                .with_attr("id", name.as_str())
                .with_child(data(keys::LABEL, attrs.label.as_str()))
                .with_child(data(keys::SIZE, format_double(attrs.size)))
                .with_child(data(keys::AMOUNT, format_double(attrs.amount.as_f64())))
                .with_child(data(keys::COLOR, attrs.color.as_str())),
        );
    }

    for edge in &graph.edges {
        body.push(
            Element::new("edge")
                .with_attr("source", edge.donor.as_str())
                .with_attr("target", edge.recipient.as_str())
                .with_child(data(keys::WEIGHT, format_double(edge.weight.as_f64())))
                .with_child(data(keys::THICKNESS, format_double(edge.thickness))),
        );
    }

    root.push(body);
    root
}

/// Serialize `graph` as a standard GraphML document
pub fn write_graphml(graph: &DonationGraph) -> String {
    to_document(&graphml_tree(graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Aggregates, VisualConfig};
    use crate::record::{Amount, DonationRecord};

    fn graph() -> DonationGraph {
        let records = vec![
            DonationRecord::new("Acme Pty", "LIB-VIC", "2014-15", Amount::from_dollars(1500)),
            DonationRecord::new("Beta & Co", "ALP-FED", "2014-15", Amount::from_cents(2550)),
        ];
        let agg = Aggregates::from_records(&records).unwrap();
        DonationGraph::build(&agg, &VisualConfig::default()).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let xml = write_graphml(&graph());
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();

        assert_eq!(root.tag_name().name(), "graphml");
        assert_eq!(root.tag_name().namespace(), Some(GRAPHML_NS));
        assert_eq!(root.lookup_namespace_uri(Some("y")), Some(YWORKS_NS));

        let keys: Vec<_> = root.children().filter(|n| n.has_tag_name("key")).collect();
        assert_eq!(keys.len(), 6);

        let nodes: Vec<_> = root.descendants().filter(|n| n.has_tag_name("node")).collect();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].attribute("id"), Some("Acme Pty"));

        let edges: Vec<_> = root.descendants().filter(|n| n.has_tag_name("edge")).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].attribute("source"), Some("Beta & Co"));
        assert_eq!(edges[1].attribute("target"), Some("ALP-FED"));
    }

    #[test]
    fn test_data_values() {
        let xml = write_graphml(&graph());
        assert!(xml.contains(r#"<graph edgedefault="directed">"#));
        assert!(xml.contains(r#"<data key="d2">1500.0</data>"#));
        assert!(xml.contains(r#"<data key="d4">25.5</data>"#));
        assert!(xml.contains(r#"<data key="d3">#1e90ff</data>"#));
        assert!(xml.contains(r#"<node id="Beta &amp; Co">"#));
        assert!(xml.contains(r#"<data key="d5">10.0</data>"#));
    }
}
