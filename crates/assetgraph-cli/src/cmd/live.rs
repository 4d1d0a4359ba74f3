//! `assetgraph live`: resolve live freshness status for every asset.

use std::io::Write;
use std::path::PathBuf;

use assetgraph_core::key::display_name_for_id;
use assetgraph_core::{ComputeStatus, LiveData, build_live_data};
use clap::Args;

use crate::cmd::require_acyclic;
use crate::input::{load_graph, read_live};
use crate::output::{OutputMode, pretty_section, render};

/// Arguments for `assetgraph live`.
#[derive(Args, Debug, Default)]
pub struct LiveArgs {
    /// JSON file with the pipeline's asset definitions.
    #[arg(long)]
    pub assets: PathBuf,

    /// JSON file with `assetNodes` and `inProgressRunsByStep`.
    #[arg(long)]
    pub live: PathBuf,
}

/// Execute `assetgraph live`.
pub fn run_live(args: &LiveArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(Some(&args.assets), None)?;
    require_acyclic(&graph, output)?;

    let live = read_live(&args.live)?;
    let data = build_live_data(&graph, &live.asset_nodes, &live.in_progress_runs_by_step);
    render(output, &data, render_live_human)
}

const fn status_marker(status: ComputeStatus) -> &'static str {
    match status {
        ComputeStatus::Good => "ok",
        ComputeStatus::Old => "stale",
        ComputeStatus::None => "-",
        ComputeStatus::Unknown => "?",
    }
}

fn render_live_human(data: &LiveData, mode: OutputMode, w: &mut dyn Write) -> std::io::Result<()> {
    if !mode.is_pretty() {
        for (id, node) in data {
            writeln!(
                w,
                "{id}\t{}\t{}\t{}",
                node.compute_status,
                node.in_progress_run_ids.len(),
                node.unstarted_run_ids.len()
            )?;
        }
        return Ok(());
    }

    pretty_section(w, "Live status")?;
    if data.is_empty() {
        writeln!(w, "No live records.")?;
        return Ok(());
    }
    for (id, node) in data {
        write!(
            w,
            "  {:<6} {:<32}",
            status_marker(node.compute_status),
            display_name_for_id(id)
        )?;
        if !node.in_progress_run_ids.is_empty() {
            write!(w, "  running: {}", node.in_progress_run_ids.join(", "))?;
        }
        if !node.unstarted_run_ids.is_empty() {
            write!(w, "  queued: {}", node.unstarted_run_ids.join(", "))?;
        }
        writeln!(w)?;
    }
    Ok(())
}
