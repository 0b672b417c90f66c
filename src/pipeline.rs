//! End-to-end pipeline: records -> graph -> GraphML + yEd documents
//!
//! Both documents are rendered in memory before anything touches the
//! filesystem, and each is written to a temporary file in its destination
//! directory and renamed into place. A failure at any stage leaves previous
//! outputs untouched.

use crate::canonical::{Canonicalizer, RuleError};
use crate::config::{ConfigError, OutputConfig, PipelineConfig};
use crate::graph::{Aggregates, DonationGraph, GraphError};
use crate::graphml::{enrich_yed, write_graphml, Enriched, SerializeError};
use crate::source::{RecordSource, SourceError};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Output error writing {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Everything produced by one pass, before it is written out
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: DonationGraph,
    /// Standard GraphML document
    pub graphml: String,
    /// yEd-enriched document
    pub yed: Enriched,
    /// Records read from the source
    pub records_read: usize,
    /// Records left after the period filter
    pub records_kept: usize,
}

/// What a completed run wrote
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub records_read: usize,
    pub records_kept: usize,
    pub nodes: usize,
    pub edges: usize,
    pub graphml_path: PathBuf,
    pub yed_path: PathBuf,
    /// Nodes the yEd pass could not find in the base document
    pub unstyled: Vec<String>,
}

pub struct Pipeline {
    config: PipelineConfig,
    canonicalizer: Canonicalizer,
}

impl Pipeline {
    /// Validate `config` and compile its rules
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let canonicalizer = config.validate()?;
        Ok(Self {
            config,
            canonicalizer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Read, filter, canonicalize and aggregate into the attributed graph
    pub fn build_graph(&self, source: &mut dyn RecordSource) -> PipelineResult<(DonationGraph, usize, usize)> {
        let records = source.records()?;
        let read = records.len();

        let filter = self.config.period_filter();
        let kept: Vec<_> = filter
            .apply(records)
            .into_iter()
            .map(|r| self.canonicalizer.apply(r, self.config.canonicalize_donors))
            .collect();
        info!(
            "Kept {} of {} records for period {}",
            kept.len(),
            read,
            filter.period().unwrap_or("(all)")
        );

        let agg = Aggregates::from_records(&kept)?;
        debug!(
            "Aggregated {} edges, grand total {}",
            agg.edges.len(),
            agg.grand_total()
        );
        let graph = DonationGraph::build(&agg, &self.config.visual)?;
        Ok((graph, read, kept.len()))
    }

    /// Produce both documents in memory
    pub fn render(&self, source: &mut dyn RecordSource) -> PipelineResult<PipelineOutput> {
        let (graph, records_read, records_kept) = self.build_graph(source)?;
        let graphml = write_graphml(&graph);
        let yed = enrich_yed(&graphml, &graph)?;
        Ok(PipelineOutput {
            graph,
            graphml,
            yed,
            records_read,
            records_kept,
        })
    }

    /// Render and write both documents to the configured paths
    pub fn run(&self, source: &mut dyn RecordSource) -> PipelineResult<RunReport> {
        let output = self.render(source)?;
        self.write_outputs(&output, &self.config.output)?;

        let report = RunReport {
            records_read: output.records_read,
            records_kept: output.records_kept,
            nodes: output.graph.node_count(),
            edges: output.graph.edge_count(),
            graphml_path: self.config.output.graphml.clone(),
            yed_path: self.config.output.yed.clone(),
            unstyled: output.yed.skipped,
        };
        info!(
            "Wrote {:?} and {:?} ({} nodes, {} edges)",
            report.graphml_path, report.yed_path, report.nodes, report.edges
        );
        Ok(report)
    }

    /// Write rendered documents to `paths`
    pub fn write_outputs(&self, output: &PipelineOutput, paths: &OutputConfig) -> PipelineResult<()> {
        write_atomic(&paths.graphml, output.graphml.as_bytes())?;
        write_atomic(&paths.yed, output.yed.xml.as_bytes())?;
        Ok(())
    }
}

/// Write `contents` to a temporary sibling of `path`, then rename it over `path`
pub fn write_atomic(path: &Path, contents: &[u8]) -> PipelineResult<()> {
    let output_err = |source: std::io::Error| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(output_err)?;

    let mut file = NamedTempFile::new_in(dir).map_err(output_err)?;
    file.write_all(contents).map_err(output_err)?;
    file.as_file().sync_all().map_err(output_err)?;
    file.persist(path).map_err(|e| output_err(e.error))?;

    debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Amount, DonationRecord};
    use tempfile::TempDir;

    fn records() -> Vec<DonationRecord> {
        vec![
            DonationRecord::new("Acme", "Liberal Party (Vic Branch)", "2014-15", Amount::from_dollars(1000)),
            DonationRecord::new("Acme", "LIBERAL PARTY OF AUSTRALIA VICTORIAN DIVISION", "2014-15", Amount::from_dollars(500)),
            DonationRecord::new("Beta", "Australian Labor Party (N.S.W. Branch)", "2014-15", Amount::from_dollars(40)),
            DonationRecord::new("Gamma", "Australian Greens", "2015-16", Amount::from_dollars(999)),
        ]
    }

    #[test]
    fn test_build_graph_filters_and_canonicalizes() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let (graph, read, kept) = pipeline.build_graph(&mut records()).unwrap();

        assert_eq!(read, 4);
        assert_eq!(kept, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.edge("Acme", "LIB-VIC").unwrap().weight,
            Amount::from_dollars(1500)
        );
        assert!(graph.node("ALP-NSW").is_some());
        assert!(graph.node("Gamma").is_none());
    }

    #[test]
    fn test_all_periods() {
        let config = PipelineConfig {
            period: None,
            ..Default::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let (graph, _, kept) = pipeline.build_graph(&mut records()).unwrap();
        assert_eq!(kept, 4);
        assert!(graph.edge("Gamma", "GREEN-FED").is_some());
    }

    #[test]
    fn test_empty_period_is_no_data() {
        let config = PipelineConfig {
            period: Some("1999-00".to_string()),
            ..Default::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let err = pipeline.render(&mut records()).unwrap_err();
        assert!(matches!(err, PipelineError::Graph(GraphError::NoData)));
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let config = PipelineConfig {
            rules: vec![crate::canonical::Rule::new("(", "X")],
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::Config(ConfigError::Rule(RuleError::InvalidPattern { .. })))
        ));
    }

    #[test]
    fn test_run_writes_both_documents() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            output: OutputConfig::in_dir(temp_dir.path().join("out")),
            ..Default::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let report = pipeline.run(&mut records()).unwrap();

        assert_eq!(report.nodes, 4);
        assert_eq!(report.edges, 2);
        assert!(report.unstyled.is_empty());

        let graphml = std::fs::read_to_string(&report.graphml_path).unwrap();
        let yed = std::fs::read_to_string(&report.yed_path).unwrap();
        assert!(graphml.contains(r#"<node id="LIB-VIC">"#));
        assert!(!graphml.contains("ShapeNode"));
        assert_eq!(yed.matches("<y:ShapeNode>").count(), 4);
    }

    #[test]
    fn test_failed_run_keeps_previous_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let output = OutputConfig::in_dir(temp_dir.path());
        std::fs::write(&output.graphml, "previous").unwrap();

        let config = PipelineConfig {
            period: Some("1999-00".to_string()),
            output: output.clone(),
            ..Default::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        assert!(pipeline.run(&mut records()).is_err());

        assert_eq!(std::fs::read_to_string(&output.graphml).unwrap(), "previous");
        assert!(!output.yed.exists());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.graphml");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        // No temporary files left behind
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
