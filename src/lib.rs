//! # ThreatKit
//!
//! Diagram session engine for threat-model graphs.
//!
//! ## Architecture
//!
//! ThreatKit is organized as a workspace with multiple crates:
//!
//! 1. **threatkit-core** - Error taxonomy, event bus, clocks, shared defaults
//! 2. **threatkit-settings** - Editor configuration file and validation
//! 3. **threatkit-designer** - Graph view-model, document mapping,
//!    hit-testing, session state machine and the async editor driver
//! 4. **threatkit** - This crate: logging setup, re-exports and a small
//!    command-line front end

pub use threatkit_designer as designer;
pub use threatkit_settings as settings;

pub use threatkit_core::{
    AppEvent, Clock, ErrorKind, EventBus, EventBusConfig, EventFilter, GraphError, ManualClock,
    ModelKind, SessionError, SharedClock, SystemClock, ValidationError,
};

pub use threatkit_designer::{
    Document, DocumentId, DocumentStore, EditorSession, EditorState, ExternalIdentity,
    FileDocumentStore, MemoryDocumentStore, SessionState,
};

pub use threatkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to `info`)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
