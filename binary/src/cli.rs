use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quantity_net_graph::{
    ExportFormat, GraphBuilder, GraphDescriptor, GraphOptions, QuantityNet,
};
use tracing::info;

/// Draw quantity net snapshots with Graphviz
#[derive(Debug, Parser)]
#[command(name = "quantity-net-graph", version)]
pub struct Cli {
    /// Log level or filter directives (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a snapshot to an SVG, PNG or DOT file
    Render {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Output path (the format extension is appended if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Svg)]
        format: FormatChoice,

        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Print the DOT source of a snapshot
    Dot {
        /// Snapshot JSON file
        snapshot: PathBuf,

        #[command(flatten)]
        graph: GraphArgs,
    },
}

#[derive(Debug, clap::Args)]
pub struct GraphArgs {
    /// Label object places with their number of tokens
    #[arg(long)]
    pub marked: bool,

    /// JSON file with drawing options
    #[arg(long)]
    pub options: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Svg,
    Png,
    Dot,
}

impl From<FormatChoice> for ExportFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Svg => ExportFormat::Svg,
            FormatChoice::Png => ExportFormat::Png,
            FormatChoice::Dot => ExportFormat::Dot,
        }
    }
}

fn load_options(path: Option<&Path>) -> Result<GraphOptions> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("could not open options file {}", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(file))
                .with_context(|| format!("invalid options file {}", path.display()))
        }
        None => Ok(GraphOptions::default()),
    }
}

fn build_graph(snapshot: &Path, graph: &GraphArgs) -> Result<GraphDescriptor> {
    let options = load_options(graph.options.as_deref())?;
    let net = QuantityNet::import_json(snapshot)
        .with_context(|| format!("could not load snapshot {}", snapshot.display()))?;
    GraphBuilder::new(options)
        .build(&net, graph.marked)
        .with_context(|| format!("could not build graph for {}", snapshot.display()))
}

/// Execute a parsed command, writing DOT text to `out`
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::Render {
            snapshot,
            output,
            format,
            graph,
        } => {
            let mut descriptor = build_graph(&snapshot, &graph)?;
            let path = descriptor
                .export(&output, format.into())
                .with_context(|| format!("could not export {}", output.display()))?;
            info!(path = %path.display(), "rendered quantity net");
            writeln!(out, "{}", path.display())?;
        }
        Commands::Dot { snapshot, graph } => {
            let mut descriptor = build_graph(&snapshot, &graph)?;
            descriptor.create_graph();
            let text = descriptor.get_text()?;
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}
