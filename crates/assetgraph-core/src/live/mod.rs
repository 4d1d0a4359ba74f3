//! Live freshness status for every asset.
//!
//! [`build_live_data`] joins live records with the run listing, seeds each
//! node's status, then resolves the `unknown` ones against their upstream
//! assets. An asset is `old` when an upstream asset started computing after
//! it did, or when any upstream asset is itself not `good`.

mod records;
mod resolve;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::GraphData;

pub use records::{
    InProgressRunsByStep, LiveAssetNode, Materialization, MaterializationEvent, RunRef, StepStats,
};

/// Freshness of an asset relative to its upstream assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeStatus {
    Good,
    Old,
    None,
    Unknown,
}

impl std::fmt::Display for ComputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Old => "old",
            Self::None => "none",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDataForNode {
    pub compute_status: ComputeStatus,
    pub unstarted_run_ids: Vec<String>,
    pub in_progress_run_ids: Vec<String>,
    pub last_materialization: Option<Materialization>,
    pub last_step_start: f64,
}

/// Live state keyed by the same ids as [`GraphData::nodes`].
pub type LiveData = BTreeMap<String, LiveDataForNode>;

/// Build fresh live data for `live_nodes`.
///
/// Partitioned-ness comes from the graph's definition for the node; a node
/// the graph does not know is treated as unpartitioned.
#[instrument(skip_all, fields(graph_nodes = graph.node_count(), live_nodes = live_nodes.len()))]
#[must_use]
pub fn build_live_data(
    graph: &GraphData,
    live_nodes: &[LiveAssetNode],
    in_progress_runs_by_step: &[InProgressRunsByStep],
) -> LiveData {
    let mut data: LiveData = live_nodes
        .iter()
        .map(|node| (node.id.clone(), seed(graph, node, in_progress_runs_by_step)))
        .collect();

    let statuses = resolve::resolve_all(graph, &data);
    for (id, status) in statuses {
        if let Some(entry) = data.get_mut(&id) {
            entry.compute_status = status;
        }
    }

    debug!(
        old = data.values().filter(|d| d.compute_status == ComputeStatus::Old).count(),
        "resolved live data"
    );
    data
}

fn seed(
    graph: &GraphData,
    node: &LiveAssetNode,
    in_progress_runs_by_step: &[InProgressRunsByStep],
) -> LiveDataForNode {
    let last_materialization = node.asset_materializations.first().cloned();
    let last_step_start = last_materialization
        .as_ref()
        .map_or(0.0, Materialization::step_start);

    let runs = node
        .op_name
        .as_deref()
        .and_then(|op| in_progress_runs_by_step.iter().find(|r| r.step_key == op));

    let partitioned = graph
        .nodes
        .get(&node.id)
        .is_some_and(|n| n.definition.is_partitioned());

    let compute_status = if node.op_name.is_none() {
        ComputeStatus::Good
    } else if partitioned {
        ComputeStatus::None
    } else if last_materialization.is_some() {
        ComputeStatus::Unknown
    } else {
        ComputeStatus::None
    };

    LiveDataForNode {
        compute_status,
        unstarted_run_ids: runs.map(|r| run_ids(&r.unstarted_runs)).unwrap_or_default(),
        in_progress_run_ids: runs.map(|r| run_ids(&r.in_progress_runs)).unwrap_or_default(),
        last_materialization,
        last_step_start,
    }
}

fn run_ids(runs: &[RunRef]) -> Vec<String> {
    runs.iter().map(|run| run.id.clone()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
