//! Asset keys and their canonical node identifiers.
//!
//! # Canonical id
//!
//! A key's node id is the compact JSON encoding of its path segments:
//!
//! ```text
//! ["warehouse","orders"]
//! ```
//!
//! JSON string escaping makes the encoding injective: a segment containing
//! `","` or a quote is escaped, so `["a\",\"b"]` (one segment) can never
//! collide with `["a","b"]` (two segments). Anything that compares or joins
//! records by id must use [`AssetKey::to_id`]; never build ids by joining
//! segments with a separator.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AssetKeyError;

/// An ordered sequence of path segments uniquely identifying an asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    /// Path segments, outermost first.
    pub path: Vec<String>,
}

impl AssetKey {
    /// Build a key from path segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical node id for this key.
    #[must_use]
    pub fn to_id(&self) -> String {
        let mut id = String::with_capacity(2 + self.path.iter().map(|s| s.len() + 3).sum::<usize>());
        id.push('[');
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                id.push(',');
            }
            // Value's Display is the compact JSON encoding, quotes included.
            id.push_str(&Value::String(segment.clone()).to_string());
        }
        id.push(']');
        id
    }

    /// Parse a canonical node id back into a key.
    ///
    /// # Errors
    ///
    /// Returns [`AssetKeyError::MalformedId`] if `id` is not a JSON array of
    /// strings, and [`AssetKeyError::Empty`] if the array has no elements.
    pub fn from_id(id: &str) -> Result<Self, AssetKeyError> {
        let path: Vec<String> =
            serde_json::from_str(id).map_err(|e| AssetKeyError::MalformedId {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        if path.is_empty() {
            return Err(AssetKeyError::Empty);
        }
        Ok(Self { path })
    }

    /// Human-facing label: segments joined with `/`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path.join("/")
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Display label for a node id, falling back to the raw id when it is not a
/// canonical key encoding.
#[must_use]
pub fn display_name_for_id(id: &str) -> String {
    AssetKey::from_id(id).map_or_else(|_| id.to_string(), |key| key.display_name())
}
