//! Layered ("Sugiyama") drawing of a directed graph, ranks top to bottom.
//!
//! # Pipeline
//! 1. Cycle breaking: greedy source/sink peeling; back edges are reversed
//!    for the remaining phases and restored when routing.
//! 2. Rank assignment: longest path from the sources, then sources with
//!    outgoing edges are pulled down next to their nearest successor.
//! 3. Normalization: edges spanning several ranks are split by zero-size
//!    dummy nodes, one per intermediate rank.
//! 4. Ordering: barycenter sweeps, alternating down and up, keeping the
//!    ordering with the fewest crossings.
//! 5. Coordinates: ranks are stacked with `rank_sep` between them; within a
//!    rank each node is pulled toward the median of its neighbours while
//!    keeping order and separation (isotonic regression per rank).
//! 6. Routing: an edge's points are its dummy centres, with the ends
//!    clipped to the boundary of the source and target boxes.
//!
//! The engine is deterministic: node and edge insertion order fully decide
//! the output. No hashing order or randomness leaks into coordinates.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{Point, Size};

/// Alternating barycenter sweeps before giving up on fewer crossings.
const MAX_ORDER_SWEEPS: usize = 24;
/// Median-alignment passes during coordinate assignment.
const COORDINATE_PASSES: usize = 8;

/// Separation and margin settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayeredConfig {
    pub node_sep: f64,
    pub edge_sep: f64,
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

/// Input graph: sized nodes keyed by id plus directed edges.
#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    ids: Vec<String>,
    sizes: Vec<Size>,
    index: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
    edge_set: HashSet<(usize, usize)>,
}

impl LayeredGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or resize an existing one.
    pub fn set_node(&mut self, id: &str, size: Size) {
        let idx = self.ensure_node(id);
        self.sizes[idx] = size;
    }

    /// Add `from → to`. Unknown endpoints are added with zero size.
    /// Returns `false` if the edge already existed.
    pub fn set_edge(&mut self, from: &str, to: &str) -> bool {
        let u = self.ensure_node(from);
        let v = self.ensure_node(to);
        if !self.edge_set.insert((u, v)) {
            return false;
        }
        self.edges.push((u, v));
        true
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.to_string());
        self.sizes.push(Size::ZERO);
        self.index.insert(id.to_string(), idx);
        idx
    }
}

/// A positioned input node; `center` is in final canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub center: Point,
    pub size: Size,
}

/// A routed input edge, points ordered from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub from: String,
    pub to: String,
    pub points: Vec<Point>,
}

/// Output of [`layout`]: nodes and edges in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<RoutedEdge>,
    /// Content extent plus margin on both sides.
    pub width: f64,
    pub height: f64,
}

/// Working graph after normalization. Indices below `real_count` are input
/// nodes; the rest are dummies.
struct Proper {
    real_count: usize,
    sizes: Vec<Size>,
    rank: Vec<usize>,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl Proper {
    fn is_dummy(&self, v: usize) -> bool {
        v >= self.real_count
    }

    fn link(&mut self, u: usize, v: usize) {
        self.succ[u].push(v);
        self.pred[v].push(u);
    }

    fn add_dummy(&mut self, rank: usize) -> usize {
        let d = self.sizes.len();
        self.sizes.push(Size::ZERO);
        self.rank.push(rank);
        self.succ.push(Vec::new());
        self.pred.push(Vec::new());
        d
    }
}

/// One input edge's path through the proper graph, in acyclic direction.
struct Chain {
    nodes: Vec<usize>,
    reversed: bool,
}

/// Lay out `graph`.
#[must_use]
pub fn layout(graph: &LayeredGraph, config: &LayeredConfig) -> LayeredLayout {
    let n = graph.node_count();
    if n == 0 {
        return LayeredLayout {
            nodes: Vec::new(),
            edges: Vec::new(),
            width: 2.0 * config.margin_x,
            height: 2.0 * config.margin_y,
        };
    }

    // Phase 1: orientation for every non-loop edge.
    let order_pos = acyclic_positions(n, &graph.edges);
    let oriented: Vec<Option<(usize, usize, bool)>> = graph
        .edges
        .iter()
        .map(|&(u, v)| {
            if u == v {
                None
            } else if order_pos[u] > order_pos[v] {
                Some((v, u, true))
            } else {
                Some((u, v, false))
            }
        })
        .collect();

    // Phase 2: ranks.
    let acyclic: Vec<(usize, usize)> = oriented
        .iter()
        .flatten()
        .map(|&(a, b, _)| (a, b))
        .collect();
    let rank = assign_ranks(n, &acyclic);

    // Phase 3: split long edges.
    let mut proper = Proper {
        real_count: n,
        sizes: graph.sizes.clone(),
        rank,
        succ: vec![Vec::new(); n],
        pred: vec![Vec::new(); n],
    };
    let chains: Vec<Option<Chain>> = oriented
        .iter()
        .map(|edge| {
            edge.map(|(a, b, reversed)| {
                let mut nodes = vec![a];
                let mut prev = a;
                for r in proper.rank[a] + 1..proper.rank[b] {
                    let d = proper.add_dummy(r);
                    proper.link(prev, d);
                    nodes.push(d);
                    prev = d;
                }
                proper.link(prev, b);
                nodes.push(b);
                Chain { nodes, reversed }
            })
        })
        .collect();

    // Phase 4: ordering.
    let layers = order_layers(&proper);

    // Phase 5: coordinates.
    let xs = assign_x(&proper, &layers, config);
    let ys = assign_y(&proper, &layers, config);

    let min_x = (0..proper.sizes.len())
        .map(|v| xs[v] - proper.sizes[v].width / 2.0)
        .fold(f64::INFINITY, f64::min);
    let shift_x = config.margin_x - min_x;
    let shift_y = config.margin_y;
    let centers: Vec<Point> = (0..proper.sizes.len())
        .map(|v| Point::new(xs[v] + shift_x, ys[v] + shift_y))
        .collect();

    let (max_x, max_y) = (0..proper.sizes.len()).fold((0.0_f64, 0.0_f64), |(mx, my), v| {
        (
            mx.max(centers[v].x + proper.sizes[v].width / 2.0),
            my.max(centers[v].y + proper.sizes[v].height / 2.0),
        )
    });

    // Phase 6: routing.
    let edges = graph
        .edges
        .iter()
        .zip(&chains)
        .map(|(&(u, v), chain)| RoutedEdge {
            from: graph.ids[u].clone(),
            to: graph.ids[v].clone(),
            points: chain.as_ref().map_or_else(
                || self_loop_points(centers[u], proper.sizes[u], config.node_sep),
                |chain| chain_points(chain, &centers, &proper.sizes),
            ),
        })
        .collect();

    let nodes = (0..n)
        .map(|v| PlacedNode {
            id: graph.ids[v].clone(),
            center: centers[v],
            size: proper.sizes[v],
        })
        .collect();

    trace!(
        nodes = n,
        dummies = proper.sizes.len() - n,
        ranks = layers.len(),
        "layered layout complete"
    );

    LayeredLayout {
        nodes,
        edges,
        width: max_x + config.margin_x,
        height: max_y + config.margin_y,
    }
}

// ---------------------------------------------------------------------------
// Phase 1: cycle breaking: greedy source/sink peeling
// ---------------------------------------------------------------------------

/// Degree bookkeeping for greedy source/sink peeling.
struct Peeler {
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
    out_deg: Vec<usize>,
    in_deg: Vec<usize>,
    removed: Vec<bool>,
    sinks: Vec<usize>,
    sources: Vec<usize>,
}

impl Peeler {
    fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        let mut out_deg = vec![0_usize; n];
        let mut in_deg = vec![0_usize; n];
        for &(u, v) in edges {
            if u != v {
                succ[u].push(v);
                pred[v].push(u);
                out_deg[u] += 1;
                in_deg[v] += 1;
            }
        }
        // Stacks, so reversed to pop the lowest index first.
        let sinks = (0..n).rev().filter(|&v| out_deg[v] == 0).collect();
        let sources = (0..n)
            .rev()
            .filter(|&v| in_deg[v] == 0 && out_deg[v] > 0)
            .collect();
        Self {
            succ,
            pred,
            out_deg,
            in_deg,
            removed: vec![false; n],
            sinks,
            sources,
        }
    }

    fn remove(&mut self, v: usize) {
        self.removed[v] = true;
        for &s in &self.succ[v] {
            if !self.removed[s] {
                self.in_deg[s] -= 1;
                if self.in_deg[s] == 0 {
                    self.sources.push(s);
                }
            }
        }
        for &p in &self.pred[v] {
            if !self.removed[p] {
                self.out_deg[p] -= 1;
                if self.out_deg[p] == 0 {
                    self.sinks.push(p);
                }
            }
        }
    }

    /// Live node with the largest out-minus-in degree, lowest index on ties.
    fn best_cycle_breaker(&self) -> Option<usize> {
        (0..self.removed.len())
            .filter(|&v| !self.removed[v])
            .max_by(|&a, &b| {
                let da = self.out_deg[a] as isize - self.in_deg[a] as isize;
                let db = self.out_deg[b] as isize - self.in_deg[b] as isize;
                da.cmp(&db).then_with(|| b.cmp(&a))
            })
    }
}

/// Position of every node in a linear order where few edges point backward.
fn acyclic_positions(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut peeler = Peeler::new(n, edges);
    let mut left: Vec<usize> = Vec::with_capacity(n);
    let mut right: Vec<usize> = Vec::new();
    let mut remaining = n;

    while remaining > 0 {
        if let Some(v) = peeler.sinks.pop() {
            if !peeler.removed[v] {
                peeler.remove(v);
                right.push(v);
                remaining -= 1;
            }
            continue;
        }
        if let Some(v) = peeler.sources.pop() {
            if !peeler.removed[v] {
                peeler.remove(v);
                left.push(v);
                remaining -= 1;
            }
            continue;
        }
        // Only cycles remain.
        let Some(v) = peeler.best_cycle_breaker() else {
            break;
        };
        peeler.remove(v);
        left.push(v);
        remaining -= 1;
    }

    right.reverse();
    left.extend(right);

    let mut pos = vec![0_usize; n];
    for (i, &v) in left.iter().enumerate() {
        pos[v] = i;
    }
    pos
}

// ---------------------------------------------------------------------------
// Phase 2: rank assignment
// ---------------------------------------------------------------------------

fn assign_ranks(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut succ = vec![Vec::new(); n];
    let mut has_pred = vec![false; n];
    let mut in_deg = vec![0_usize; n];
    for &(a, b) in edges {
        succ[a].push(b);
        in_deg[b] += 1;
        has_pred[b] = true;
    }

    // Kahn's algorithm, smallest index first.
    let mut ready: Vec<usize> = (0..n).rev().filter(|&v| in_deg[v] == 0).collect();
    let mut topo = Vec::with_capacity(n);
    while let Some(u) = ready.pop() {
        topo.push(u);
        for &v in succ[u].iter().rev() {
            in_deg[v] -= 1;
            if in_deg[v] == 0 {
                ready.push(v);
            }
        }
    }

    let mut rank = vec![0_usize; n];
    for &u in &topo {
        for &v in &succ[u] {
            rank[v] = rank[v].max(rank[u] + 1);
        }
    }

    // Pull sources down so an upstream that only feeds a deep node sits
    // directly above it instead of on the first rank.
    for &u in topo.iter().rev() {
        if !has_pred[u] {
            if let Some(nearest) = succ[u].iter().map(|&v| rank[v]).min() {
                rank[u] = nearest - 1;
            }
        }
    }

    let min = rank.iter().copied().min().unwrap_or(0);
    for r in &mut rank {
        *r -= min;
    }
    rank
}

// ---------------------------------------------------------------------------
// Phase 4: ordering: barycenter sweeps
// ---------------------------------------------------------------------------

fn order_layers(graph: &Proper) -> Vec<Vec<usize>> {
    let rank_count = graph.rank.iter().copied().max().map_or(0, |r| r + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for (v, &r) in graph.rank.iter().enumerate() {
        layers[r].push(v);
    }

    let mut pos = vec![0_usize; graph.rank.len()];
    refresh_positions(&layers, &mut pos);

    let mut best_crossings = count_crossings(&layers, &graph.succ, &pos);
    let mut best = layers.clone();

    for sweep in 0..MAX_ORDER_SWEEPS {
        if best_crossings == 0 {
            break;
        }
        if sweep % 2 == 0 {
            for r in 1..rank_count {
                sort_by_barycenter(&mut layers[r], &graph.pred, &mut pos);
            }
        } else {
            for r in (0..rank_count.saturating_sub(1)).rev() {
                sort_by_barycenter(&mut layers[r], &graph.succ, &mut pos);
            }
        }

        let crossings = count_crossings(&layers, &graph.succ, &pos);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
    }

    best
}

fn refresh_positions(layers: &[Vec<usize>], pos: &mut [usize]) {
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }
}

/// Reorder `layer` by mean neighbour position. Nodes without neighbours
/// keep their current slot as their key.
fn sort_by_barycenter(layer: &mut [usize], neighbours: &[Vec<usize>], pos: &mut [usize]) {
    let mut keyed: Vec<(f64, usize, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let ns = &neighbours[v];
            let key = if ns.is_empty() {
                i as f64
            } else {
                ns.iter().map(|&u| pos[u] as f64).sum::<f64>() / ns.len() as f64
            };
            (key, i, v)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    for (i, (_, _, v)) in keyed.into_iter().enumerate() {
        layer[i] = v;
        pos[v] = i;
    }
}

/// Crossings between every pair of adjacent ranks, counted as inversions
/// of the lower endpoints with a Fenwick tree.
fn count_crossings(layers: &[Vec<usize>], succ: &[Vec<usize>], pos: &[usize]) -> usize {
    let mut total = 0;
    for pair in layers.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        let mut tree = vec![0_usize; lower.len() + 1];
        let mut seen = 0;
        for &u in upper {
            let mut targets: Vec<usize> = succ[u].iter().map(|&v| pos[v]).collect();
            targets.sort_unstable();
            for t in targets {
                // Earlier endpoints strictly to the right of `t` cross this edge.
                let mut at_or_left = 0;
                let mut i = t + 1;
                while i > 0 {
                    at_or_left += tree[i];
                    i &= i - 1;
                }
                total += seen - at_or_left;
                let mut i = t + 1;
                while i < tree.len() {
                    tree[i] += 1;
                    i += i & i.wrapping_neg();
                }
                seen += 1;
            }
        }
    }
    total
}

// ---------------------------------------------------------------------------
// Phase 5: coordinates
// ---------------------------------------------------------------------------

/// Minimum centre-to-centre distance between neighbours `a` and `b`.
fn separation(graph: &Proper, a: usize, b: usize, config: &LayeredConfig) -> f64 {
    let gap = |v: usize| {
        if graph.is_dummy(v) {
            config.edge_sep / 2.0
        } else {
            config.node_sep / 2.0
        }
    };
    (graph.sizes[a].width + graph.sizes[b].width) / 2.0 + gap(a) + gap(b)
}

fn assign_x(graph: &Proper, layers: &[Vec<usize>], config: &LayeredConfig) -> Vec<f64> {
    let mut x = vec![0.0_f64; graph.sizes.len()];
    for layer in layers {
        let desired: Vec<f64> = vec![0.0; layer.len()];
        place_layer(graph, layer, &desired, &mut x, config);
    }

    for pass in 0..COORDINATE_PASSES {
        let (ranks, neighbours): (Vec<usize>, &[Vec<usize>]) = if pass % 2 == 0 {
            ((1..layers.len()).collect(), graph.pred.as_slice())
        } else {
            (
                (0..layers.len().saturating_sub(1)).rev().collect(),
                graph.succ.as_slice(),
            )
        };
        for r in ranks {
            let layer = &layers[r];
            let desired: Vec<f64> = layer
                .iter()
                .map(|&v| median(neighbours[v].iter().map(|&u| x[u])).unwrap_or(x[v]))
                .collect();
            place_layer(graph, layer, &desired, &mut x, config);
        }
    }
    x
}

/// Place `layer` as close to `desired` as possible (least squares) while
/// keeping its order and minimum separations.
///
/// Subtracting each node's cumulative separation turns the constraints
/// into "non-decreasing", which pool-adjacent-violators solves exactly.
fn place_layer(
    graph: &Proper,
    layer: &[usize],
    desired: &[f64],
    x: &mut [f64],
    config: &LayeredConfig,
) {
    let mut offsets = Vec::with_capacity(layer.len());
    let mut acc = 0.0;
    for (i, &v) in layer.iter().enumerate() {
        if i > 0 {
            acc += separation(graph, layer[i - 1], v, config);
        }
        offsets.push(acc);
    }

    // Blocks of (sum, count) whose means are non-decreasing.
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(layer.len());
    for (d, o) in desired.iter().zip(&offsets) {
        blocks.push((d - o, 1));
        while blocks.len() > 1 {
            let (s2, c2) = blocks[blocks.len() - 1];
            let (s1, c1) = blocks[blocks.len() - 2];
            if s1 / c1 as f64 <= s2 / c2 as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (s1 + s2, c1 + c2);
        }
    }

    let mut i = 0;
    for (sum, count) in blocks {
        let mean = sum / count as f64;
        for _ in 0..count {
            x[layer[i]] = mean + offsets[i];
            i += 1;
        }
    }
}

fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Centre y of every node: ranks stacked top-down, each as tall as its
/// tallest node, `rank_sep` apart.
fn assign_y(graph: &Proper, layers: &[Vec<usize>], config: &LayeredConfig) -> Vec<f64> {
    let mut y = vec![0.0_f64; graph.sizes.len()];
    let mut top = 0.0;
    for layer in layers {
        let height = layer
            .iter()
            .map(|&v| graph.sizes[v].height)
            .fold(0.0_f64, f64::max);
        for &v in layer {
            y[v] = top + height / 2.0;
        }
        top += height + config.rank_sep;
    }
    y
}

// ---------------------------------------------------------------------------
// Phase 6: routing
// ---------------------------------------------------------------------------

fn chain_points(chain: &Chain, centers: &[Point], sizes: &[Size]) -> Vec<Point> {
    let (Some(&head), Some(&tail)) = (chain.nodes.first(), chain.nodes.last()) else {
        return Vec::new();
    };
    let inner: Vec<Point> = chain.nodes[1..chain.nodes.len() - 1]
        .iter()
        .map(|&d| centers[d])
        .collect();

    let toward_head = inner.first().copied().unwrap_or(centers[tail]);
    let toward_tail = inner.last().copied().unwrap_or(centers[head]);

    let mut points = Vec::with_capacity(inner.len() + 2);
    points.push(intersect_rect(centers[head], sizes[head], toward_head));
    points.extend(inner);
    points.push(intersect_rect(centers[tail], sizes[tail], toward_tail));

    if chain.reversed {
        points.reverse();
    }
    points
}

/// Where the segment from the box centre toward `point` leaves the box.
fn intersect_rect(center: Point, size: Size, point: Point) -> Point {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return center;
    }
    let (mut w, mut h) = (size.width / 2.0, size.height / 2.0);
    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Point::new(center.x + sx, center.y + sy)
}

/// A small loop off the right side of the box.
fn self_loop_points(center: Point, size: Size, node_sep: f64) -> Vec<Point> {
    let right = center.x + size.width / 2.0;
    vec![
        Point::new(right, center.y - size.height / 4.0),
        Point::new(right + node_sep / 2.0, center.y),
        Point::new(right, center.y + size.height / 4.0),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: LayeredConfig = LayeredConfig {
        node_sep: 50.0,
        edge_sep: 10.0,
        rank_sep: 50.0,
        margin_x: 20.0,
        margin_y: 20.0,
    };

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> LayeredGraph {
        let mut g = LayeredGraph::new();
        for id in nodes {
            g.set_node(id, Size::new(100.0, 40.0));
        }
        for (a, b) in edges {
            g.set_edge(a, b);
        }
        g
    }

    fn node<'a>(layout: &'a LayeredLayout, id: &str) -> &'a PlacedNode {
        layout
            .nodes
            .iter()
            .find(|n| n.id == id)
            .expect("node present")
    }

    fn overlap(a: &PlacedNode, b: &PlacedNode) -> bool {
        (a.center.x - b.center.x).abs() < (a.size.width + b.size.width) / 2.0
            && (a.center.y - b.center.y).abs() < (a.size.height + b.size.height) / 2.0
    }

    #[test]
    fn empty_graph_is_just_margins() {
        let out = layout(&LayeredGraph::new(), &CONFIG);
        assert!(out.nodes.is_empty());
        assert!((out.width - 40.0).abs() < 1e-9);
        assert!((out.height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn single_node_sits_inside_margin() {
        let out = layout(&graph(&["a"], &[]), &CONFIG);
        let a = node(&out, "a");
        assert!((a.center.x - 70.0).abs() < 1e-9);
        assert!((a.center.y - 40.0).abs() < 1e-9);
        assert!((out.width - 140.0).abs() < 1e-9);
        assert!((out.height - 80.0).abs() < 1e-9);
    }

    #[test]
    fn edge_points_down_between_ranks() {
        let out = layout(&graph(&["a", "b"], &[("a", "b")]), &CONFIG);
        let (a, b) = (node(&out, "a"), node(&out, "b"));
        assert!(b.center.y > a.center.y);
        // rank gap: a bottom to b top is exactly rank_sep.
        let gap = (b.center.y - b.size.height / 2.0) - (a.center.y + a.size.height / 2.0);
        assert!((gap - CONFIG.rank_sep).abs() < 1e-9);

        let edge = &out.edges[0];
        let first = edge.points[0];
        let last = edge.points[edge.points.len() - 1];
        assert!((first.y - (a.center.y + 20.0)).abs() < 1e-9, "leaves a's bottom");
        assert!((last.y - (b.center.y - 20.0)).abs() < 1e-9, "enters b's top");
    }

    #[test]
    fn long_edge_gets_bend_points() {
        let out = layout(
            &graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]),
            &CONFIG,
        );
        let long = out.edges.iter().find(|e| e.from == "a" && e.to == "c").expect("edge");
        assert_eq!(long.points.len(), 3, "one dummy for one skipped rank");
    }

    #[test]
    fn siblings_do_not_overlap() {
        let out = layout(
            &graph(&["root", "x", "y", "z"], &[("root", "x"), ("root", "y"), ("root", "z")]),
            &CONFIG,
        );
        let kids: Vec<&PlacedNode> = ["x", "y", "z"].iter().map(|id| node(&out, id)).collect();
        for i in 0..kids.len() {
            for j in i + 1..kids.len() {
                assert!(!overlap(kids[i], kids[j]), "{} overlaps {}", kids[i].id, kids[j].id);
                let dist = (kids[i].center.x - kids[j].center.x).abs();
                assert!(dist >= 100.0 + CONFIG.node_sep - 1e-9);
            }
        }
    }

    #[test]
    fn cycle_is_laid_out_with_original_direction() {
        let out = layout(&graph(&["a", "b"], &[("a", "b"), ("b", "a")]), &CONFIG);
        assert_eq!(out.nodes.len(), 2);
        for edge in &out.edges {
            let from = node(&out, &edge.from);
            let first = edge.points[0];
            // First point lies on the boundary of the `from` box.
            assert!((first.y - from.center.y).abs() <= from.size.height / 2.0 + 1e-9);
            assert!((first.x - from.center.x).abs() <= from.size.width / 2.0 + 1e-9);
        }
    }

    #[test]
    fn self_loop_is_routed_on_the_right() {
        let out = layout(&graph(&["a"], &[("a", "a")]), &CONFIG);
        let a = node(&out, "a");
        let edge = &out.edges[0];
        assert_eq!(edge.points.len(), 3);
        assert!(edge.points.iter().all(|p| p.x >= a.center.x + 50.0 - 1e-9));
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut g = graph(&["a", "b"], &[("a", "b")]);
        assert!(!g.set_edge("a", "b"));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn crossing_free_order_is_found() {
        // a→d, b→c drawn in insertion order would cross.
        let out = layout(&graph(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]), &CONFIG);
        let (a, b, c, d) = (node(&out, "a"), node(&out, "b"), node(&out, "c"), node(&out, "d"));
        assert_eq!(a.center.x < b.center.x, d.center.x < c.center.x);
    }

    #[test]
    fn count_crossings_counts_inversions() {
        // upper [0, 1], lower [2, 3]; 0→3 and 1→2 cross once.
        let layers = vec![vec![0, 1], vec![2, 3]];
        let succ = vec![vec![3], vec![2], vec![], vec![]];
        let pos = vec![0, 1, 0, 1];
        assert_eq!(count_crossings(&layers, &succ, &pos), 1);
    }

    #[test]
    fn intersect_rect_hits_each_side() {
        let c = Point::new(0.0, 0.0);
        let s = Size::new(100.0, 40.0);
        assert_eq!(intersect_rect(c, s, Point::new(0.0, 100.0)), Point::new(0.0, 20.0));
        assert_eq!(intersect_rect(c, s, Point::new(0.0, -100.0)), Point::new(0.0, -20.0));
        assert_eq!(intersect_rect(c, s, Point::new(500.0, 0.0)), Point::new(50.0, 0.0));
        assert_eq!(intersect_rect(c, s, Point::new(-500.0, 0.0)), Point::new(-50.0, 0.0));
        assert_eq!(intersect_rect(c, s, c), c);
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median([3.0, 1.0, 2.0].into_iter()), Some(2.0));
        assert_eq!(median([4.0, 1.0].into_iter()), Some(2.5));
        assert_eq!(median(std::iter::empty()), None);
    }

    #[test]
    fn sources_are_pulled_toward_their_successor() {
        // chain a→b→c plus a source s feeding only c: s lands one rank above c.
        let out = layout(
            &graph(&["a", "b", "c", "s"], &[("a", "b"), ("b", "c"), ("s", "c")]),
            &CONFIG,
        );
        let (b, s) = (node(&out, "b"), node(&out, "s"));
        assert!((b.center.y - s.center.y).abs() < 1e-9);
    }

    #[test]
    fn layout_is_deterministic() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "c"), ("b", "c"), ("c", "d"), ("a", "e"), ("e", "d")],
        );
        assert_eq!(layout(&g, &CONFIG), layout(&g, &CONFIG));
    }
}
