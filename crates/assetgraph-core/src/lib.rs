#![forbid(unsafe_code)]
//! assetgraph-core library.
//!
//! Builds a dependency graph over pipeline assets, checks it for cycles,
//! lays it out as a top-to-bottom layered drawing and derives a freshness
//! status for every asset from its materialization history.
//!
//! ```text
//! [AssetDefinition]
//!        ↓  graph::build_graph_data()
//! GraphData (nodes + upstream/downstream adjacency)
//!        ↓  graph::graph_has_cycles()      (host rejects cyclic graphs)
//!        ├─ layout::layout_graph()  → GraphLayout (boxes + edges)
//!        └─ live::build_live_data() → LiveData  (computeStatus per asset)
//! ```
//!
//! Every operation is a pure, synchronous function of its inputs: calling it
//! twice with equal inputs yields equal outputs.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums; the pipeline operations themselves
//!   are infallible and fall back to documented defaults.
//! - **Logging**: `tracing` macros (`debug!`, `trace!`); no subscriber is
//!   installed here.

pub mod config;
pub mod error;
pub mod graph;
pub mod key;
pub mod layout;
pub mod live;
pub mod model;

pub use config::{GraphConfig, LayoutConfig, LayoutOptions, Spacing};
pub use error::{AssetKeyError, GraphError};
pub use graph::{
    GraphData, build_graph_data, build_graph_data_from_single_node, ensure_acyclic, find_cycles,
    graph_has_cycles,
};
pub use key::AssetKey;
pub use layout::{DefaultSizer, GraphLayout, IEdge, LayoutNode, NodeSizer, Point, Size, layout_graph};
pub use live::{
    ComputeStatus, InProgressRunsByStep, LiveAssetNode, LiveData, LiveDataForNode, build_live_data,
};
pub use model::{AssetDefinition, AssetNode, AssetNodeDetail};
