use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Builds an in-memory directory tree, looks nodes up, removes a directory
/// and prints the tree before and after.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML layout to build instead of the built-in sample tree
    #[clap(long)]
    pub layout: Option<PathBuf>,

    /// Name of a directory to search for; repeatable
    #[clap(long = "find-dir", value_name = "NAME")]
    pub find_dirs: Vec<String>,

    /// Name of a file to search for; repeatable
    #[clap(long = "find-file", value_name = "NAME")]
    pub find_files: Vec<String>,

    /// Slash-separated path of a directory to remove after the first listing
    #[clap(long, short, value_name = "PATH")]
    pub remove: Option<String>,

    /// Disable colored output
    #[clap(long)]
    pub no_color: bool,
}
