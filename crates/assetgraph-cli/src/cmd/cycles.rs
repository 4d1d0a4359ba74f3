//! `assetgraph cycles`: list dependency cycles (strongly connected components).

use std::io::Write;
use std::path::PathBuf;

use assetgraph_core::key::display_name_for_id;
use assetgraph_core::{find_cycles, graph_has_cycles};
use clap::Args;
use serde::Serialize;

use crate::input::load_graph;
use crate::output::{OutputMode, render};

/// Arguments for `assetgraph cycles`.
#[derive(Args, Debug, Default)]
pub struct CyclesArgs {
    /// JSON file with the pipeline's asset definitions.
    #[arg(long)]
    pub assets: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CyclesOutput {
    has_cycles: bool,
    cycles: Vec<Vec<String>>,
}

/// Execute `assetgraph cycles`.
pub fn run_cycles(args: &CyclesArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(Some(&args.assets), None)?;
    let payload = CyclesOutput {
        has_cycles: graph_has_cycles(&graph),
        cycles: find_cycles(&graph),
    };
    render(output, &payload, render_cycles_human)
}

fn render_cycles_human(
    payload: &CyclesOutput,
    _mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Dependency cycles ({})", payload.cycles.len())?;

    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}:", idx + 1)?;
        for id in cycle {
            writeln!(w, "  - {}", display_name_for_id(id))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_args_require_assets() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CyclesArgs,
        }

        assert!(Wrapper::try_parse_from(["test"]).is_err());
        let parsed = Wrapper::try_parse_from(["test", "--assets", "x.json"]).expect("parse");
        assert_eq!(parsed.args.assets, PathBuf::from("x.json"));
    }

    #[test]
    fn human_output_lists_display_names() {
        let payload = CyclesOutput {
            has_cycles: true,
            cycles: vec![vec![r#"["a","x"]"#.to_string(), r#"["b"]"#.to_string()]],
        };
        let mut buf = Vec::new();
        render_cycles_human(&payload, OutputMode::Pretty, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Dependency cycles (1)"));
        assert!(text.contains("  - a/x"));
        assert!(text.contains("  - b"));
    }

    #[test]
    fn human_output_without_cycles() {
        let payload = CyclesOutput {
            has_cycles: false,
            cycles: Vec::new(),
        };
        let mut buf = Vec::new();
        render_cycles_human(&payload, OutputMode::Text, &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No dependency cycles found.\n");
    }
}
