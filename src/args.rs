//! Command-line arguments for the `threatkit` binary.

use std::path::PathBuf;

use clap::Parser;

/// Opens a threat-model document and prints what the session shows
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Document id to open, or `new` for a blank diagram
    #[arg(default_value = "new")]
    pub identity: String,

    /// Directory of the document store (overrides the config file)
    #[arg(short, long)]
    pub store_dir: Option<PathBuf>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
