//! `assetgraph layout`: lay out the asset graph top to bottom.

use std::io::Write;
use std::path::{Path, PathBuf};

use assetgraph_core::key::display_name_for_id;
use assetgraph_core::{DefaultSizer, GraphLayout, LayoutConfig, LayoutOptions, layout_graph};
use clap::Args;
use tracing::debug;

use crate::cmd::require_acyclic;
use crate::config::load_layout_config;
use crate::input::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `assetgraph layout`.
#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// JSON file with the pipeline's asset definitions.
    #[arg(long, required_unless_present = "single", conflicts_with = "single")]
    pub assets: Option<PathBuf>,

    /// JSON file with one asset and its direct neighbours.
    #[arg(long)]
    pub single: Option<PathBuf>,

    /// Use the tighter compact spacing and box widths.
    #[arg(long)]
    pub compact: bool,

    /// Canvas margin around the drawing.
    #[arg(long)]
    pub margin: Option<f64>,

    /// Config file to use instead of ./assetgraph.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl LayoutArgs {
    fn flag_overrides(&self) -> LayoutConfig {
        LayoutConfig {
            margin: self.margin,
            compact: self.compact.then_some(true),
            ..LayoutConfig::default()
        }
    }
}

/// Execute `assetgraph layout`.
pub fn run_layout(args: &LayoutArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let options = resolve_options(args, project_root)?;
    debug!(?options, "resolved layout options");

    let graph = load_graph(args.assets.as_deref(), args.single.as_deref())?;
    require_acyclic(&graph, output)?;

    let layout = layout_graph(&graph, &options, &DefaultSizer);
    render(output, &layout, render_layout_human)
}

fn resolve_options(args: &LayoutArgs, project_root: &Path) -> anyhow::Result<LayoutOptions> {
    let files = load_layout_config(args.config.as_deref(), project_root)?;
    Ok(files.merged_with(&args.flag_overrides()).to_options())
}

fn render_layout_human(
    layout: &GraphLayout,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if !mode.is_pretty() {
        writeln!(w, "canvas\t{:.1}\t{:.1}", layout.width, layout.height)?;
        for node in &layout.nodes {
            writeln!(
                w,
                "node\t{}\t{:.1}\t{:.1}\t{:.1}\t{:.1}",
                node.id, node.x, node.y, node.width, node.height
            )?;
        }
        for edge in &layout.edges {
            writeln!(
                w,
                "edge\t{:.1}\t{:.1}\t{:.1}\t{:.1}",
                edge.from.x, edge.from.y, edge.to.x, edge.to.y
            )?;
        }
        return Ok(());
    }

    pretty_section(w, "Layout")?;
    pretty_kv(w, "Canvas", format!("{:.1} x {:.1}", layout.width, layout.height))?;
    pretty_kv(w, "Boxes", layout.nodes.len().to_string())?;
    pretty_kv(w, "Edges", layout.edges.len().to_string())?;
    if layout.nodes.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    for node in &layout.nodes {
        writeln!(
            w,
            "  {:<32} at ({:>7.1}, {:>7.1})  {:.0}x{:.0}",
            display_name_for_id(&node.id),
            node.x,
            node.y,
            node.width,
            node.height
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: LayoutArgs,
    }

    #[test]
    fn flags_parse() {
        let parsed = Wrapper::try_parse_from([
            "test", "--assets", "a.json", "--compact", "--margin", "20",
        ])
        .expect("parse");
        assert!(parsed.args.compact);
        assert_eq!(parsed.args.margin, Some(20.0));
    }

    #[test]
    fn flags_override_project_file() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("assetgraph.toml"),
            "[layout]\nmargin = 7.0\nnode_sep = 3.0\n",
        )
        .expect("write");

        let from_file = resolve_options(&LayoutArgs::default(), dir.path()).expect("options");
        assert!((from_file.margin - 7.0).abs() < f64::EPSILON);
        assert!((from_file.spacing.node_sep - 3.0).abs() < f64::EPSILON);

        let args = LayoutArgs {
            margin: Some(40.0),
            compact: true,
            ..LayoutArgs::default()
        };
        let with_flags = resolve_options(&args, dir.path()).expect("options");
        assert!((with_flags.margin - 40.0).abs() < f64::EPSILON);
        assert!(with_flags.compact);
        assert!((with_flags.spacing.node_sep - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn text_mode_emits_rows() {
        let layout = GraphLayout {
            nodes: Vec::new(),
            edges: Vec::new(),
            width: 100.0,
            height: 100.0,
        };
        let mut buf = Vec::new();
        render_layout_human(&layout, OutputMode::Text, &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "canvas\t100.0\t100.0\n");
    }
}
