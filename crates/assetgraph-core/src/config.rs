//! Layout options and their file-backed configuration.
//!
//! [`LayoutOptions`] is what [`crate::layout_graph`] takes. [`GraphConfig`]
//! is the serde shape of a config file; every field is optional so a
//! partial file overlays the defaults. Reading files is the host's job.

use serde::{Deserialize, Serialize};

/// Default canvas margin, in layout units, applied on every side.
pub const DEFAULT_MARGIN: f64 = 100.0;

/// Separation distances used by the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    /// Horizontal gap between two adjacent asset boxes in a rank.
    pub node_sep: f64,
    /// Horizontal gap between two adjacent edge bend points in a rank.
    pub edge_sep: f64,
    /// Vertical gap between the bottom of one rank and the top of the next.
    pub rank_sep: f64,
}

impl Spacing {
    pub const NORMAL: Self = Self {
        node_sep: 50.0,
        edge_sep: 10.0,
        rank_sep: 50.0,
    };

    pub const COMPACT: Self = Self {
        node_sep: 20.0,
        edge_sep: 5.0,
        rank_sep: 20.0,
    };

    #[must_use]
    pub const fn for_mode(compact: bool) -> Self {
        if compact { Self::COMPACT } else { Self::NORMAL }
    }
}

/// Options for one layout call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Blank border around the content; reserved on the top/left by the
    /// layered layout and added once more to the right/bottom extent.
    pub margin: f64,
    /// Tighter spacing and narrower boxes, for thumbnails and sidebars.
    pub compact: bool,
    /// Separation distances; defaults to [`Spacing::for_mode`].
    pub spacing: Spacing,
}

impl LayoutOptions {
    #[must_use]
    pub const fn new(margin: f64, compact: bool) -> Self {
        Self {
            margin,
            compact,
            spacing: Spacing::for_mode(compact),
        }
    }

    #[must_use]
    pub const fn compact() -> Self {
        Self::new(DEFAULT_MARGIN, true)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN, false)
    }
}

/// Top-level configuration file shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// `[layout]` table. Unset values fall back to the mode's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub compact: Option<bool>,
    #[serde(default)]
    pub node_sep: Option<f64>,
    #[serde(default)]
    pub edge_sep: Option<f64>,
    #[serde(default)]
    pub rank_sep: Option<f64>,
}

impl LayoutConfig {
    /// Overlay `other` on `self`: values set in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            margin: other.margin.or(self.margin),
            compact: other.compact.or(self.compact),
            node_sep: other.node_sep.or(self.node_sep),
            edge_sep: other.edge_sep.or(self.edge_sep),
            rank_sep: other.rank_sep.or(self.rank_sep),
        }
    }

    /// Resolve to concrete options. Spacing starts from the preset for the
    /// resolved mode; explicit separations then override it.
    #[must_use]
    pub fn to_options(&self) -> LayoutOptions {
        let mut options = LayoutOptions::new(
            self.margin.unwrap_or(DEFAULT_MARGIN),
            self.compact.unwrap_or(false),
        );
        if let Some(v) = self.node_sep {
            options.spacing.node_sep = v;
        }
        if let Some(v) = self.edge_sep {
            options.spacing.edge_sep = v;
        }
        if let Some(v) = self.rank_sep {
            options.spacing.rank_sep = v;
        }
        options
    }
}
