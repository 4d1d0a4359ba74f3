//! Hierarchical layout of an asset graph for on-screen rendering.
//!
//! # Overview
//!
//! [`layout_graph`] decides which nodes get a box, hands them to the layered
//! engine in [`layered`] and converts its centred coordinates into the
//! top-left boxes and two-point edges a renderer paints.
//!
//! ## Real and foreign nodes
//!
//! A node is *real* when its definition names an op. Every real node gets a
//! box sized by the [`NodeSizer`]. A node that is foreign (no op) or dangling
//! (referenced but never loaded) only gets a placeholder box when an edge
//! connects it to a real node; edges between two non-real nodes are dropped.

pub mod layered;
pub mod size;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LayoutOptions;
use crate::graph::GraphData;

use layered::{LayeredConfig, LayeredGraph};
pub use size::{DefaultSizer, NodeSizer};

/// A point in top-left-origin canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A node's box: `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An edge reduced to its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IEdge {
    pub from: Point,
    pub to: Point,
    /// Always `false` from this layer; renderers may restyle.
    pub dashed: bool,
}

/// Output of [`layout_graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<IEdge>,
    /// Canvas size: right/bottom content extent plus one margin.
    pub width: f64,
    pub height: f64,
}

impl GraphLayout {
    fn empty(margin: f64) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            width: margin,
            height: margin,
        }
    }
}

/// Lay out `graph` top to bottom.
///
/// The host must reject cyclic graphs first (see
/// [`crate::graph::graph_has_cycles`]); cycles are not an error here but the
/// drawing of a cyclic graph is unspecified.
#[instrument(skip_all, fields(nodes = graph.node_count(), compact = options.compact))]
#[must_use]
pub fn layout_graph(graph: &GraphData, options: &LayoutOptions, sizer: &dyn NodeSizer) -> GraphLayout {
    let mut layered = LayeredGraph::new();

    for (id, node) in &graph.nodes {
        if !node.definition.is_foreign() {
            layered.set_node(id, sizer.asset_size(&node.definition, options.compact));
        }
    }

    let mut foreign: BTreeSet<&str> = BTreeSet::new();
    let mut dropped = 0_usize;
    for (upstream_id, targets) in &graph.downstream {
        for downstream_id in targets {
            let upstream_real = graph.is_real(upstream_id);
            let downstream_real = graph.is_real(downstream_id);
            if !upstream_real && !downstream_real {
                dropped += 1;
                continue;
            }
            layered.set_edge(upstream_id, downstream_id);
            if !downstream_real {
                foreign.insert(downstream_id);
            } else if !upstream_real {
                foreign.insert(upstream_id);
            }
        }
    }
    for id in &foreign {
        layered.set_node(id, sizer.foreign_size(id, options.compact));
    }

    debug!(
        boxes = layered.node_count(),
        foreign = foreign.len(),
        edges = layered.edge_count(),
        dropped_foreign_edges = dropped,
        "prepared layered graph"
    );

    if layered.is_empty() {
        return GraphLayout::empty(options.margin);
    }

    let config = LayeredConfig {
        node_sep: options.spacing.node_sep,
        edge_sep: options.spacing.edge_sep,
        rank_sep: options.spacing.rank_sep,
        margin_x: options.margin,
        margin_y: options.margin,
    };
    let placed = layered::layout(&layered, &config);

    let mut max_width = 0.0_f64;
    let mut max_height = 0.0_f64;
    let nodes = placed
        .nodes
        .into_iter()
        .map(|node| {
            let (half_w, half_h) = (node.size.width / 2.0, node.size.height / 2.0);
            max_width = max_width.max(node.center.x + half_w);
            max_height = max_height.max(node.center.y + half_h);
            LayoutNode {
                id: node.id,
                x: node.center.x - half_w,
                y: node.center.y - half_h,
                width: node.size.width,
                height: node.size.height,
            }
        })
        .collect();

    let edges = placed
        .edges
        .into_iter()
        .filter_map(|edge| {
            let from = *edge.points.first()?;
            let to = *edge.points.last()?;
            Some(IEdge {
                from,
                to,
                dashed: false,
            })
        })
        .collect();

    GraphLayout {
        nodes,
        edges,
        width: max_width + options.margin,
        height: max_height + options.margin,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph_data;
    use crate::key::AssetKey;
    use crate::model::AssetDefinition;

    struct FixedSizer;

    impl NodeSizer for FixedSizer {
        fn asset_size(&self, _: &AssetDefinition, _: bool) -> Size {
            Size::new(200.0, 60.0)
        }
        fn foreign_size(&self, _: &str, _: bool) -> Size {
            Size::new(120.0, 30.0)
        }
    }

    fn def(path: &str, op: bool, deps: &[&str]) -> AssetDefinition {
        let mut d = AssetDefinition::foreign(AssetKey::new([path]));
        if op {
            d.op_name = Some(path.to_string());
        }
        d.dependency_keys = deps.iter().map(|p| AssetKey::new([*p])).collect();
        d
    }

    fn id(path: &str) -> String {
        AssetKey::new([path]).to_id()
    }

    #[test]
    fn no_real_nodes_yields_margin_only() {
        let graph = build_graph_data(&[def("a", false, &[]), def("b", false, &["a"])]);
        let out = layout_graph(&graph, &LayoutOptions::default(), &FixedSizer);
        assert!(out.nodes.is_empty());
        assert!(out.edges.is_empty());
        assert!((out.width - 100.0).abs() < f64::EPSILON);
        assert!((out.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_real_nodes_one_edge() {
        let graph = build_graph_data(&[def("a", true, &[]), def("b", true, &["a"])]);
        let options = LayoutOptions::default();
        let out = layout_graph(&graph, &options, &FixedSizer);
        assert_eq!(out.nodes.len(), 2);
        assert_eq!(out.edges.len(), 1);
        assert!(!out.edges[0].dashed);

        let a = out.nodes.iter().find(|n| n.id == id("a")).expect("a");
        let b = out.nodes.iter().find(|n| n.id == id("b")).expect("b");
        // Top-left corner sits at the margin.
        assert!((a.x - options.margin).abs() < 1e-9);
        assert!((a.y - options.margin).abs() < 1e-9);
        assert!(b.y > a.y + a.height);
        assert!(out.height >= options.margin + a.height + b.height);
        assert!(out.width >= options.margin + a.width);
        // Edge runs from a's bottom edge to b's top edge.
        assert!((out.edges[0].from.y - (a.y + a.height)).abs() < 1e-9);
        assert!((out.edges[0].to.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn canvas_is_extent_plus_one_margin() {
        let graph = build_graph_data(&[def("a", true, &[])]);
        let options = LayoutOptions::new(40.0, false);
        let out = layout_graph(&graph, &options, &FixedSizer);
        let a = &out.nodes[0];
        assert!((out.width - (a.x + a.width + 40.0)).abs() < 1e-9);
        assert!((out.height - (a.y + a.height + 40.0)).abs() < 1e-9);
    }

    #[test]
    fn foreign_to_foreign_edges_are_dropped() {
        let graph = build_graph_data(&[
            def("f1", false, &[]),
            def("f2", false, &["f1"]),
            def("r", true, &[]),
        ]);
        let out = layout_graph(&graph, &LayoutOptions::default(), &FixedSizer);
        assert_eq!(out.nodes.len(), 1);
        assert!(out.edges.is_empty());
    }

    #[test]
    fn foreign_upstream_gets_placeholder_box() {
        // "ext" is never loaded: a dangling dependency of a real asset.
        let graph = build_graph_data(&[def("r", true, &["ext"])]);
        let out = layout_graph(&graph, &LayoutOptions::default(), &FixedSizer);
        assert_eq!(out.nodes.len(), 2);
        assert_eq!(out.edges.len(), 1);
        let ext = out.nodes.iter().find(|n| n.id == id("ext")).expect("placeholder");
        assert!((ext.width - 120.0).abs() < f64::EPSILON);
        assert!((ext.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn foreign_node_between_real_nodes_bridges_them() {
        let graph = build_graph_data(&[
            def("a", true, &[]),
            def("f", false, &["a"]),
            def("b", true, &["f"]),
        ]);
        let out = layout_graph(&graph, &LayoutOptions::default(), &FixedSizer);
        assert_eq!(out.nodes.len(), 3);
        assert_eq!(out.edges.len(), 2);
    }

    #[test]
    fn compact_layout_is_smaller() {
        let graph = build_graph_data(&[
            def("a", true, &[]),
            def("b", true, &["a"]),
            def("c", true, &["a"]),
        ]);
        let normal = layout_graph(&graph, &LayoutOptions::default(), &FixedSizer);
        let compact = layout_graph(&graph, &LayoutOptions::compact(), &FixedSizer);
        assert!(compact.width < normal.width);
        assert!(compact.height < normal.height);
    }

    #[test]
    fn layout_is_idempotent() {
        let graph = build_graph_data(&[
            def("a", true, &[]),
            def("b", true, &["a", "ext"]),
            def("c", true, &["a", "b"]),
        ]);
        let options = LayoutOptions::default();
        assert_eq!(
            layout_graph(&graph, &options, &DefaultSizer),
            layout_graph(&graph, &options, &DefaultSizer)
        );
    }
}
