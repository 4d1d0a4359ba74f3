//! Typed errors for the asset graph core.
//!
//! The pipeline operations (build, cycle check, layout, live status) never
//! fail; these errors cover parsing canonical ids and the host-side
//! acyclicity guard.

/// Errors from parsing or constructing an [`crate::AssetKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetKeyError {
    /// The canonical id was not a JSON array of strings.
    #[error("malformed asset id {id:?}: {reason}")]
    MalformedId {
        /// The offending id.
        id: String,
        /// Parser message.
        reason: String,
    },

    /// An asset key must have at least one path segment.
    #[error("asset key has no path segments")]
    Empty,
}

/// Errors from validating a [`crate::GraphData`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The graph contains at least one dependency cycle. Layout and status
    /// resolution must not be attempted on it.
    #[error("asset graph contains {} dependency cycle(s): {}", cycles.len(), format_cycles(cycles))]
    CycleDetected {
        /// Sorted member ids of each strongly connected component.
        cycles: Vec<Vec<String>>,
    },
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|members| members.join(" -> "))
        .collect::<Vec<_>>()
        .join("; ")
}
