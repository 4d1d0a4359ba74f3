#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "assetgraph: asset dependency graphs, layout and freshness",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build the asset graph",
        long_about = "Build the dependency graph from asset definitions and summarise it.",
        after_help = "EXAMPLES:\n    # Summarise a pipeline\n    assetgraph graph --assets assets.json\n\n    # Dump the full graph\n    assetgraph graph --assets assets.json --full --format json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        about = "List dependency cycles",
        long_about = "Check the asset graph for cycles and list every cyclic component.",
        after_help = "EXAMPLES:\n    assetgraph cycles --assets assets.json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Lay out the asset graph",
        long_about = "Compute node boxes and edge endpoints for a top-to-bottom drawing.",
        after_help = "EXAMPLES:\n    # Default spacing\n    assetgraph layout --assets assets.json\n\n    # Compact mode with a small margin\n    assetgraph layout --assets assets.json --compact --margin 20 --format json"
    )]
    Layout(cmd::layout::LayoutArgs),

    #[command(
        about = "Resolve live freshness status",
        long_about = "Merge live materialization and run records into the graph and resolve each asset's compute status.",
        after_help = "EXAMPLES:\n    assetgraph live --assets assets.json --live live.json"
    )]
    Live(cmd::live::LiveArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let output = output::resolve_output_mode(cli.format, cli.json);
    let project_root = env::current_dir()?;

    match &cli.command {
        Commands::Graph(args) => cmd::graph::run_graph(args, output),
        Commands::Cycles(args) => cmd::cycles::run_cycles(args, output),
        Commands::Layout(args) => cmd::layout::run_layout(args, output, &project_root),
        Commands::Live(args) => cmd::live::run_live(args, output),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ASSETGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "assetgraph=debug,info"
        } else {
            "assetgraph=info,warn"
        })
    });

    let format = env::var("ASSETGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
