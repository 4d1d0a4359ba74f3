pub mod cycles;
pub mod graph;
pub mod layout;
pub mod live;

use assetgraph_core::{GraphData, GraphError, ensure_acyclic, key::display_name_for_id};

use crate::output::{CliError, OutputMode, render_error};

/// Refuse to go further on a cyclic graph, listing the cycles.
pub(crate) fn require_acyclic(graph: &GraphData, output: OutputMode) -> anyhow::Result<()> {
    match ensure_acyclic(graph) {
        Ok(()) => Ok(()),
        Err(GraphError::CycleDetected { cycles }) => {
            let mut error = CliError::with_details(
                format!("asset graph contains {} dependency cycle(s)", cycles.len()),
                "run `assetgraph cycles` for details and remove one dependency per cycle",
                "cycle_detected",
            );
            for cycle in &cycles {
                let names: Vec<String> = cycle.iter().map(String::as_str).map(display_name_for_id).collect();
                error = error.detail(names.join(" -> "));
            }
            render_error(output, &error)?;
            Err(GraphError::CycleDetected { cycles }.into())
        }
    }
}
