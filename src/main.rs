//! Blockscape — folder to 3D block layout.
//!
//! Thin binary entry point. All logic lives in the `blockscape-core` crate;
//! this host scans a folder, lays out its top level and prints the
//! placement records as JSON for a renderer to consume.

use anyhow::{bail, Context};
use blockscape_core::aggregate::select;
use blockscape_core::classify::Classifier;
use blockscape_core::config::BlockscapeConfig;
use blockscape_core::layout::{LayoutEngine, LayoutItem, Marks};
use blockscape_core::model::size::{format_count, format_size};
use blockscape_core::model::Layout;
use blockscape_core::scanner::start_scan;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the binary prints.
#[derive(Serialize)]
struct Output<'a> {
    root: &'a Path,
    size_bytes: u64,
    files: u64,
    hidden_in_others: usize,
    layout: &'a Layout,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BlockscapeConfig> {
    let config: BlockscapeConfig = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => BlockscapeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging. Stdout carries the JSON, so logs go to
    // stderr.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args_os().skip(1);
    let Some(root) = args.next().map(PathBuf::from) else {
        bail!("usage: blockscape <folder> [config.json]");
    };
    let config_path = args.next().map(PathBuf::from);
    let mut config = load_config(config_path.as_deref())?;

    tracing::info!("Blockscape starting: {}", root.display());

    let tree = start_scan(root.clone(), config.scan.clone())
        .context("spawning scan thread")?
        .wait()
        .with_context(|| format!("scanning {}", root.display()))?;

    tracing::info!(
        "Scanned {} files, {}",
        format_count(tree.file_count()),
        format_size(tree.size_bytes)
    );

    let classifier = Classifier::new(config.classifier.clone());
    let mut batch = classifier.begin_batch();
    let selection = select(
        &tree.children,
        &config.selection.enabled_families,
        config.selection.limit,
        |node| classifier.classify(node, &mut batch).family,
    );

    let items: Vec<LayoutItem<'_>> = selection
        .layout_items()
        .into_iter()
        .map(|node| LayoutItem {
            node,
            tag: classifier.classify(node, &mut batch),
        })
        .collect();

    // Layout never reads the clock itself.
    if config.layout.reference_time.is_none() {
        config.layout.reference_time = Some(chrono::Utc::now());
    }
    let layout = LayoutEngine::new(config.layout).layout(&items, &Marks::default());

    let output = Output {
        root: &tree.path,
        size_bytes: tree.size_bytes,
        files: tree.file_count(),
        hidden_in_others: selection.others.len(),
        layout: &layout,
    };
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &output).context("writing layout")?;
    println!();
    Ok(())
}
