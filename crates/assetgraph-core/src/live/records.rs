//! Live records as the query layer delivers them.

use serde::{Deserialize, Serialize};

/// One asset's live record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAssetNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_name: Option<String>,
    /// Newest first.
    #[serde(default)]
    pub asset_materializations: Vec<Materialization>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Materialization {
    #[serde(default)]
    pub materialization_event: MaterializationEvent,
}

impl Materialization {
    /// Step start time, `0` when the event carries none.
    #[must_use]
    pub fn step_start(&self) -> f64 {
        self.materialization_event
            .step_stats
            .as_ref()
            .and_then(|stats| stats.start_time)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_stats: Option<StepStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

/// Runs touching one step, keyed by the step's op name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InProgressRunsByStep {
    pub step_key: String,
    #[serde(default)]
    pub unstarted_runs: Vec<RunRef>,
    #[serde(default)]
    pub in_progress_runs: Vec<RunRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRef {
    pub id: String,
}
