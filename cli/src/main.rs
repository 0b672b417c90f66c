//! Donorflow CLI: build donation flow graphs from a disclosure CSV export

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use donorflow::{
    distinct_values, Canonicalizer, CsvSource, GraphSummary, Pipeline, PipelineConfig,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "donorflow", version, about = "Political donation flow graphs for yEd")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "DONORFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for reports
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Donations CSV export
    #[arg(long, short, env = "DONORFLOW_INPUT")]
    input: PathBuf,

    /// Financial year to keep, e.g. 2014-15
    #[arg(long, conflicts_with = "all_periods")]
    period: Option<String>,

    /// Keep every financial year
    #[arg(long)]
    all_periods: bool,

    /// Canonicalize donor names as well as recipients
    #[arg(long)]
    canonicalize_donors: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the GraphML and yEd documents
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Standard GraphML output path
        #[arg(long)]
        graphml: Option<PathBuf>,

        /// yEd-enriched output path
        #[arg(long)]
        yed: Option<PathBuf>,
    },
    /// Print node and edge counts and the largest donors and recipients
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Number of entries in each ranking
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// List the distinct values of one column
    Categories {
        /// Donations CSV export
        #[arg(long, short, env = "DONORFLOW_INPUT")]
        input: PathBuf,

        #[arg(long, default_value = "Industry Sector")]
        column: String,
    },
    /// Show the canonicalization rules, or trace one name through them
    Rules {
        /// Name to trace
        #[arg(long)]
        trace: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading configuration {:?}", path))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Build { input, graphml, yed } => {
            let mut config = apply_input_args(config, &input);
            if let Some(path) = graphml {
                config.output.graphml = path;
            }
            if let Some(path) = yed {
                config.output.yed = path;
            }
            run_build(config, &input.input, &cli.format)
        }
        Commands::Summary { input, top } => {
            let config = apply_input_args(config, &input);
            run_summary(config, &input.input, top, &cli.format)
        }
        Commands::Categories { input, column } => run_categories(&input, &column, &cli.format),
        Commands::Rules { trace } => run_rules(&config, trace.as_deref(), &cli.format),
    }
}

fn apply_input_args(mut config: PipelineConfig, args: &InputArgs) -> PipelineConfig {
    if args.all_periods {
        config.period = None;
    } else if let Some(period) = &args.period {
        config.period = Some(period.clone());
    }
    if args.canonicalize_donors {
        config.canonicalize_donors = true;
    }
    config
}

fn run_build(config: PipelineConfig, input: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let mut source = CsvSource::open(input, config.columns.clone())?;
    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(&mut source)?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "records_read": report.records_read,
                "records_kept": report.records_kept,
                "nodes": report.nodes,
                "edges": report.edges,
                "graphml": report.graphml_path,
                "yed": report.yed_path,
                "unstyled": report.unstyled,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            println!("Records: {} read, {} kept", report.records_read, report.records_kept);
            println!("Nodes:   {}", report.nodes);
            println!("Edges:   {}", report.edges);
            println!("GraphML: {}", report.graphml_path.display());
            println!("yEd:     {}", report.yed_path.display());
            if !report.unstyled.is_empty() {
                println!("Unstyled nodes: {}", report.unstyled.join(", "));
            }
        }
    }
    Ok(())
}

fn run_summary(
    config: PipelineConfig,
    input: &Path,
    top: usize,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut source = CsvSource::open(input, config.columns.clone())?;
    let pipeline = Pipeline::new(config)?;
    let (graph, _, _) = pipeline.build_graph(&mut source)?;
    let summary = graph.summary(top);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &GraphSummary) {
    println!("Nodes: {}", summary.nodes);
    println!("Edges: {}", summary.edges);
    println!("Total: ${}", summary.total);

    for (title, ranking) in [
        ("Donor", &summary.top_donors),
        ("Recipient", &summary.top_recipients),
    ] {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![title, "Amount"]);
        for (name, amount) in ranking {
            table.add_row(vec![name.clone(), amount.to_string()]);
        }
        println!("{}", table);
    }
}

fn run_categories(input: &Path, column: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("opening {:?}", input))?;
    let values = distinct_values(file, column)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&values)?),
        OutputFormat::Table => {
            for value in &values {
                println!("{}", value);
            }
            println!("{} distinct value(s)", values.len());
        }
    }
    Ok(())
}

fn run_rules(config: &PipelineConfig, trace: Option<&str>, format: &OutputFormat) -> anyhow::Result<()> {
    let canonicalizer = Canonicalizer::new(&config.rules)?;

    if let Some(name) = trace {
        let rewrites = canonicalizer.trace(name);
        match format {
            OutputFormat::Json => {
                let steps: Vec<_> = rewrites
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "rule": r.index,
                            "pattern": r.pattern,
                            "from": r.from,
                            "to": r.to,
                        })
                    })
                    .collect();
                let value = serde_json::json!({
                    "input": name,
                    "output": canonicalizer.canonicalize(name),
                    "rewrites": steps,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["#", "Pattern", "From", "To"]);
                for r in &rewrites {
                    table.add_row(vec![r.index.to_string(), r.pattern.clone(), r.from.clone(), r.to.clone()]);
                }
                println!("{}", table);
                println!("{:?} -> {:?}", name, canonicalizer.canonicalize(name));
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.rules)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["#", "Pattern", "Canonical"]);
            for (i, rule) in canonicalizer.rules().enumerate() {
                table.add_row(vec![i.to_string(), rule.pattern.clone(), rule.canonical.clone()]);
            }
            println!("{}", table);
            println!("{} rule(s)", canonicalizer.len());
        }
    }
    Ok(())
}
