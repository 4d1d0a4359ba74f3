//! Asset definitions as supplied by the query layer, and graph nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::AssetKey;

/// Pipeline metadata for one asset.
///
/// Field names are camelCase on the wire to match the records produced by
/// the query transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDefinition {
    pub asset_key: AssetKey,
    /// Name of the op that computes this asset. `None` marks a foreign asset:
    /// referenced by the loaded pipeline but defined elsewhere.
    #[serde(default)]
    pub op_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Opaque partition descriptor; presence alone marks the asset
    /// partitioned.
    #[serde(default)]
    pub partition_definition: Option<Value>,
    /// Keys of the assets this one is computed from.
    #[serde(default)]
    pub dependency_keys: Vec<AssetKey>,
}

impl AssetDefinition {
    /// A definition with only a key: foreign, unpartitioned, no upstreams.
    #[must_use]
    pub const fn foreign(asset_key: AssetKey) -> Self {
        Self {
            asset_key,
            op_name: None,
            description: None,
            partition_definition: None,
            dependency_keys: Vec::new(),
        }
    }

    /// Canonical node id of this asset.
    #[must_use]
    pub fn id(&self) -> String {
        self.asset_key.to_id()
    }

    /// `true` if the asset is computed by an op outside the loaded pipeline.
    #[must_use]
    pub const fn is_foreign(&self) -> bool {
        self.op_name.is_none()
    }

    #[must_use]
    pub const fn is_partitioned(&self) -> bool {
        self.partition_definition.is_some()
    }
}

/// A node of [`crate::GraphData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetNode {
    pub id: String,
    pub asset_key: AssetKey,
    pub definition: AssetDefinition,
}

impl AssetNode {
    /// Wrap a definition, deriving the id from its key.
    #[must_use]
    pub fn new(definition: AssetDefinition) -> Self {
        Self {
            id: definition.id(),
            asset_key: definition.asset_key.clone(),
            definition,
        }
    }
}

/// A single asset fetched together with its immediate neighbours.
///
/// Neighbours carry their own keys and metadata but not their further
/// dependencies; the one-hop frontier is all the caller has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetNodeDetail {
    #[serde(flatten)]
    pub definition: AssetDefinition,
    /// Upstream neighbours.
    #[serde(default)]
    pub dependencies: Vec<AssetDefinition>,
    /// Downstream neighbours.
    #[serde(default)]
    pub depended_by: Vec<AssetDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_parses_camel_case_with_defaults() {
        let json = r#"{
            "assetKey": {"path": ["raw", "users"]},
            "opName": "load_users",
            "partitionDefinition": null
        }"#;
        let def: AssetDefinition = serde_json::from_str(json).expect("parse");
        assert_eq!(def.op_name.as_deref(), Some("load_users"));
        assert!(!def.is_foreign());
        assert!(!def.is_partitioned());
        assert!(def.dependency_keys.is_empty());
        assert_eq!(def.id(), r#"["raw","users"]"#);
    }

    #[test]
    fn node_detail_flattens_definition() {
        let json = r#"{
            "assetKey": {"path": ["b"]},
            "opName": "b",
            "dependencyKeys": [{"path": ["a"]}],
            "dependencies": [{"assetKey": {"path": ["a"]}}],
            "dependedBy": [{"assetKey": {"path": ["c"]}, "opName": "c"}]
        }"#;
        let detail: AssetNodeDetail = serde_json::from_str(json).expect("parse");
        assert_eq!(detail.definition.asset_key, AssetKey::new(["b"]));
        assert_eq!(detail.dependencies.len(), 1);
        assert!(detail.dependencies[0].is_foreign());
        assert_eq!(detail.depended_by[0].op_name.as_deref(), Some("c"));
    }

    #[test]
    fn node_id_matches_key() {
        let node = AssetNode::new(AssetDefinition::foreign(AssetKey::new(["x", "y"])));
        assert_eq!(node.id, node.asset_key.to_id());
        assert!(node.definition.is_foreign());
    }
}
