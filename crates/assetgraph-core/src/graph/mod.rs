//! Asset dependency graph: construction and structural validation.
//!
//! # Overview
//!
//! [`GraphData`] is the normalized form every later stage consumes: a map of
//! nodes plus symmetric `upstream`/`downstream` adjacency keyed by canonical
//! asset id.
//!
//! ## Pipeline
//!
//! ```text
//! [AssetDefinition]            AssetNodeDetail
//!        ↓ build_graph_data()         ↓ build_graph_data_from_single_node()
//!        └──────────────┬─────────────┘
//!                   GraphData
//!                       ↓ graph_has_cycles() / ensure_acyclic()
//!             layout + live status
//! ```
//!
//! ## Edge Direction
//!
//! `u → d` (recorded as `d ∈ downstream[u]` and `u ∈ upstream[d]`) means
//! "`d` is computed from `u`".
//!
//! ## Dangling References
//!
//! Adjacency may name ids that have no entry in `nodes` (an upstream key
//! that was never loaded). The builder records such edges as-is and never
//! synthesizes placeholder nodes; layout turns them into foreign boxes and
//! status resolution assumes them current.

pub mod build;
pub mod cycles;

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::model::AssetNode;

pub use build::{build_graph_data, build_graph_data_from_single_node};
pub use cycles::{ensure_acyclic, find_cycles, graph_has_cycles};

/// Nodes plus bidirectional adjacency.
///
/// Invariant: `d ∈ downstream[u] ⇔ u ∈ upstream[d]`. Only [`GraphData::add_edge`]
/// mutates adjacency, and it always writes both sides.
///
/// Ordered collections keep iteration, and therefore every derived output,
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: BTreeMap<String, AssetNode>,
    pub downstream: BTreeMap<String, BTreeSet<String>>,
    pub upstream: BTreeMap<String, BTreeSet<String>>,
}

impl GraphData {
    /// Record `upstream_id → downstream_id` on both sides.
    pub fn add_edge(&mut self, upstream_id: &str, downstream_id: &str) {
        self.downstream
            .entry(upstream_id.to_string())
            .or_default()
            .insert(downstream_id.to_string());
        self.upstream
            .entry(downstream_id.to_string())
            .or_default()
            .insert(upstream_id.to_string());
    }

    /// Insert (or replace) a node under its own id.
    pub fn insert_node(&mut self, node: AssetNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed edges, dangling ones included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.downstream.values().map(BTreeSet::len).sum()
    }

    /// Ids `id` is computed from.
    pub fn upstream_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.upstream
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Ids computed from `id`.
    pub fn downstream_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.downstream
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// `true` if `id` is a loaded node whose definition names an op.
    ///
    /// Dangling ids and foreign definitions are both "not real".
    #[must_use]
    pub fn is_real(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| !node.definition.is_foreign())
    }

    /// Every id mentioned anywhere: nodes and both sides of every edge.
    #[must_use]
    pub fn all_ids(&self) -> BTreeSet<&str> {
        self.nodes
            .keys()
            .chain(self.downstream.keys())
            .chain(self.upstream.keys())
            .map(String::as_str)
            .collect()
    }

    /// BLAKE3 hash of node ids and the edge list, for memoizing derived
    /// values by input identity.
    ///
    /// Definitions are not hashed; two graphs with the same topology but
    /// different metadata hash equal.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for id in self.nodes.keys() {
            hasher.update(b"n\x00");
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        for (from, targets) in &self.downstream {
            for to in targets {
                hasher.update(b"e\x00");
                hasher.update(from.as_bytes());
                hasher.update(b"\x00");
                hasher.update(to.as_bytes());
                hasher.update(b"\x00");
            }
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Project onto a petgraph `DiGraph` whose node weights are ids.
    ///
    /// Dangling ids become nodes too, so the projection has exactly
    /// [`GraphData::edge_count`] edges.
    #[must_use]
    pub fn to_digraph(&self) -> (DiGraph<String, ()>, BTreeMap<String, NodeIndex>) {
        let ids = self.all_ids();
        let mut graph = DiGraph::<String, ()>::with_capacity(ids.len(), self.edge_count());
        let mut node_map = BTreeMap::new();
        for id in ids {
            let idx = graph.add_node(id.to_string());
            node_map.insert(id.to_string(), idx);
        }
        for (from, targets) in &self.downstream {
            for to in targets {
                if let (Some(&a), Some(&b)) = (node_map.get(from), node_map.get(to)) {
                    graph.add_edge(a, b, ());
                }
            }
        }
        (graph, node_map)
    }
}
