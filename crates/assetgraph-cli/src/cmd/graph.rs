//! `assetgraph graph`: build and summarise the asset graph.

use std::io::Write;
use std::path::PathBuf;

use assetgraph_core::GraphData;
use clap::Args;
use serde::Serialize;

use crate::input::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `assetgraph graph`.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// JSON file with the pipeline's asset definitions.
    #[arg(long, required_unless_present = "single", conflicts_with = "single")]
    pub assets: Option<PathBuf>,

    /// JSON file with one asset and its direct neighbours.
    #[arg(long)]
    pub single: Option<PathBuf>,

    /// Include the full node and adjacency maps.
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphOutput {
    nodes: usize,
    edges: usize,
    real_nodes: usize,
    content_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph: Option<GraphData>,
}

/// Execute `assetgraph graph`.
pub fn run_graph(args: &GraphArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(args.assets.as_deref(), args.single.as_deref())?;
    let payload = summarize(graph, args.full);
    render(output, &payload, render_graph_human)
}

fn summarize(graph: GraphData, full: bool) -> GraphOutput {
    GraphOutput {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        real_nodes: graph.nodes.keys().filter(|id| graph.is_real(id)).count(),
        content_hash: graph.content_hash(),
        graph: full.then_some(graph),
    }
}

fn render_graph_human(
    payload: &GraphOutput,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if !mode.is_pretty() {
        writeln!(
            w,
            "nodes={} edges={} real={} hash={}",
            payload.nodes, payload.edges, payload.real_nodes, payload.content_hash
        )?;
    } else {
        pretty_section(w, "Asset graph")?;
        pretty_kv(w, "Nodes", payload.nodes.to_string())?;
        pretty_kv(w, "Real nodes", payload.real_nodes.to_string())?;
        pretty_kv(w, "Edges", payload.edges.to_string())?;
        pretty_kv(w, "Content hash", &payload.content_hash)?;
    }

    if let Some(graph) = &payload.graph {
        for (upstream, downstream) in &graph.downstream {
            for id in downstream {
                writeln!(w, "{upstream}\t{id}")?;
            }
        }
    }
    Ok(())
}
