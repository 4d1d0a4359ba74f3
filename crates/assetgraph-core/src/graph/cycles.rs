//! Cycle detection for asset graphs.
//!
//! Layout and live-status resolution both assume an acyclic graph and do not
//! check for themselves. A host calls [`graph_has_cycles`] (or the
//! error-returning [`ensure_acyclic`]) before handing a graph to either.
//!
//! # Edge Direction
//!
//! Walks follow `downstream` edges (`dependency → dependent`).

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashSet};

use petgraph::algo::tarjan_scc;
use tracing::{debug, instrument};

use super::GraphData;
use crate::error::GraphError;

/// `true` if any cycle exists among the graph's nodes.
///
/// Depth-first walks along `downstream` edges, each launched from an
/// arbitrary node not yet seen. A node leaves the unvisited set the first
/// time *any* walk reaches it and is never expanded again, so total work is
/// linear in nodes plus edges. Reaching a node that is on the current path
/// is a cycle. Walks use an explicit stack; deep chains do not grow the call
/// stack.
///
/// Dangling ids (edges to ids absent from `nodes`) are never expanded; they
/// can only be sources, so no cycle passes through them.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[must_use]
pub fn graph_has_cycles(graph: &GraphData) -> bool {
    let mut unvisited: BTreeSet<&str> = graph.nodes.keys().map(String::as_str).collect();

    while let Some(start) = unvisited.pop_first() {
        if walk_finds_cycle(graph, start, &mut unvisited) {
            debug!(start, "dependency cycle detected");
            return true;
        }
    }
    false
}

struct Frame<'a> {
    id: &'a str,
    children: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(graph: &'a GraphData, id: &'a str) -> Self {
        Self {
            id,
            children: graph.downstream_of(id).collect(),
            next: 0,
        }
    }
}

fn walk_finds_cycle<'a>(
    graph: &'a GraphData,
    start: &'a str,
    unvisited: &mut BTreeSet<&'a str>,
) -> bool {
    let mut on_path: HashSet<&str> = HashSet::from([start]);
    let mut stack = vec![Frame::new(graph, start)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            if on_path.contains(child) {
                return true;
            }
            if unvisited.remove(child) {
                on_path.insert(child);
                stack.push(Frame::new(graph, child));
            }
        } else {
            let done = frame.id;
            stack.pop();
            on_path.remove(done);
        }
    }
    false
}

/// List every dependency cycle in `graph`.
///
/// Each entry is the sorted member ids of one strongly connected component
/// with more than one member, or a single id with a self-edge. The list is
/// sorted. Empty iff [`graph_has_cycles`] is `false`.
#[must_use]
pub fn find_cycles(graph: &GraphData) -> Vec<Vec<String>> {
    let (digraph, _) = graph.to_digraph();

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&node| digraph.find_edge(node, node).is_some())
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| digraph[idx].clone())
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

/// Reject cyclic graphs before layout or status resolution.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] listing the offending components.
pub fn ensure_acyclic(graph: &GraphData) -> Result<(), GraphError> {
    if graph_has_cycles(graph) {
        return Err(GraphError::CycleDetected {
            cycles: find_cycles(graph),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
