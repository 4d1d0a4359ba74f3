//! JSON input files.

use std::path::Path;

use anyhow::{Context, Result};
use assetgraph_core::{
    AssetDefinition, AssetNodeDetail, GraphData, InProgressRunsByStep, LiveAssetNode,
    build_graph_data, build_graph_data_from_single_node,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Either a bare list of definitions or the query response shape
/// `{ "assetNodes": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetsFile {
    List(Vec<AssetDefinition>),
    Wrapped {
        #[serde(rename = "assetNodes")]
        asset_nodes: Vec<AssetDefinition>,
    },
}

/// Live records file: `{ "assetNodes": [...], "inProgressRunsByStep": [...] }`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFile {
    #[serde(default)]
    pub asset_nodes: Vec<LiveAssetNode>,
    #[serde(default)]
    pub in_progress_runs_by_step: Vec<InProgressRunsByStep>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn read_assets(path: &Path) -> Result<Vec<AssetDefinition>> {
    let definitions = match read_json::<AssetsFile>(path)? {
        AssetsFile::List(list) => list,
        AssetsFile::Wrapped { asset_nodes } => asset_nodes,
    };
    debug!(path = %path.display(), definitions = definitions.len(), "read asset definitions");
    Ok(definitions)
}

pub fn read_live(path: &Path) -> Result<LiveFile> {
    read_json(path)
}

/// Build the graph from `--assets` or `--single`, whichever was given.
pub fn load_graph(assets: Option<&Path>, single: Option<&Path>) -> Result<GraphData> {
    match (assets, single) {
        (_, Some(path)) => {
            let detail: AssetNodeDetail = read_json(path)?;
            Ok(build_graph_data_from_single_node(&detail))
        }
        (Some(path), None) => Ok(build_graph_data(&read_assets(path)?)),
        (None, None) => anyhow::bail!("one of --assets or --single is required"),
    }
}
