//! Graph construction from asset definitions.
//!
//! # Overview
//!
//! Two entry points produce a [`GraphData`]:
//!
//! - [`build_graph_data`]: the full graph of a loaded pipeline. Every
//!   definition becomes a node; every declared dependency key becomes an
//!   edge `dependency → asset`.
//! - [`build_graph_data_from_single_node`]: the one-hop neighbourhood of a
//!   single asset, for detail views where fetching the whole graph is not
//!   worth it.
//!
//! Neither builder validates references. An edge may point at an id that
//! never appears in `nodes`; see the module docs of [`crate::graph`].

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument};

use super::GraphData;
use crate::model::{AssetDefinition, AssetNode, AssetNodeDetail};

/// Build a [`GraphData`] from a list of definitions.
///
/// Later definitions with the same key replace earlier ones in `nodes`;
/// their edges are unioned.
#[instrument(skip_all, fields(definitions = definitions.len()))]
#[must_use]
pub fn build_graph_data(definitions: &[AssetDefinition]) -> GraphData {
    let mut data = GraphData::default();

    for definition in definitions {
        let id = definition.id();
        for dependency in &definition.dependency_keys {
            data.add_edge(&dependency.to_id(), &id);
        }
        data.insert_node(AssetNode::new(definition.clone()));
    }

    debug!(
        nodes = data.node_count(),
        edges = data.edge_count(),
        "built asset graph"
    );
    data
}

/// Build the one-hop neighbourhood of `center`.
///
/// Upstream neighbours (`dependencies`) get an edge `neighbour → center`,
/// downstream neighbours (`depended_by`) an edge `center → neighbour`.
/// Every inserted definition, the centre's included, has its
/// `dependency_keys` cleared: only the edges listed on the centre are real
/// here, and the neighbours' own dependencies were never fetched.
#[instrument(skip_all, fields(
    dependencies = center.dependencies.len(),
    depended_by = center.depended_by.len(),
))]
#[must_use]
pub fn build_graph_data_from_single_node(center: &AssetNodeDetail) -> GraphData {
    let mut data = GraphData::default();
    let center_id = center.definition.id();

    data.downstream.entry(center_id.clone()).or_default();
    data.upstream.entry(center_id.clone()).or_default();
    data.insert_node(AssetNode::new(without_dependencies(&center.definition)));

    for neighbour in &center.dependencies {
        data.add_edge(&neighbour.id(), &center_id);
        data.insert_node(AssetNode::new(without_dependencies(neighbour)));
    }
    for neighbour in &center.depended_by {
        data.add_edge(&center_id, &neighbour.id());
        data.insert_node(AssetNode::new(without_dependencies(neighbour)));
    }

    debug!(
        nodes = data.node_count(),
        edges = data.edge_count(),
        "built single-asset neighbourhood"
    );
    data
}

fn without_dependencies(definition: &AssetDefinition) -> AssetDefinition {
    AssetDefinition {
        dependency_keys: Vec::new(),
        ..definition.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
