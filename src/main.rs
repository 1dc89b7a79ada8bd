//! Opens a document store, applies an external identity and prints what
//! the session shows.
//!
//! ```text
//! threatkit [<document-id> | new] [--store-dir <dir>] [--config <file>]
//! ```

mod args;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use threatkit::{init_logging, Config, EditorSession, EditorState, EventBus, FileDocumentStore};
use threatkit::{SystemClock, VERSION};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;
    tracing::debug!(?args, "Parsed arguments");

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    if let Some(dir) = args.store_dir {
        config.store.directory = dir;
    }
    config.validate()?;

    tracing::info!(version = VERSION, store = %config.store.directory.display(), "Starting");

    let store = Arc::new(FileDocumentStore::new(&config.store.directory));
    let state = EditorState::new(&config, Arc::new(EventBus::new()), Arc::new(SystemClock));
    let session = EditorSession::new(state, store);

    session
        .navigate(&args.identity)
        .await
        .with_context(|| format!("opening '{}'", args.identity))?;

    session.with_state(|s| {
        println!("{} ({})", s.document_name, s.kind);
        println!("  state:   {}", s.session_state().label());
        println!("  nodes:   {}", s.graph().node_count());
        println!("  edges:   {}", s.graph().edge_count());
        println!("  reports: {}", s.reports.len());
        println!("  camera:  {}", s.viewport());
        for id in s.stacking_order() {
            if let Some(node) = s.graph().node(&id) {
                println!("    {:<36} {:<16} {}", node.id, node.type_tag, node.label());
            }
        }
    });

    let documents = session.list_documents().await?;
    println!("{} stored document(s)", documents.len());
    for summary in documents {
        println!(
            "  {}  {:<24} {:>4} components  {}",
            summary.id,
            summary.name,
            summary.component_count,
            summary.modified.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
