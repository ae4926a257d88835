use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

const SAMPLE_DIRECTORY_LOOKUP: &str = "work";
const SAMPLE_FILE_LOOKUP: &str = "vacation.jpg";
const SAMPLE_REMOVAL: &str = "documents/work";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub layout: Option<PathBuf>,
    pub find_dirs: Vec<String>,
    pub find_files: Vec<String>,
    pub remove: Option<String>,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    /// Without a layout file the sample tree is used, and any action left
    /// unspecified falls back to the sample walkthrough.
    fn from(cli: Cli) -> Self {
        let color = !cli.no_color && supports_color::on(Stream::Stdout).is_some();
        let mut config = Self {
            layout: cli.layout,
            find_dirs: cli.find_dirs,
            find_files: cli.find_files,
            remove: cli.remove,
            color,
        };

        if config.layout.is_none() {
            if config.find_dirs.is_empty() {
                config.find_dirs.push(SAMPLE_DIRECTORY_LOOKUP.to_string());
            }
            if config.find_files.is_empty() {
                config.find_files.push(SAMPLE_FILE_LOOKUP.to_string());
            }
            if config.remove.is_none() {
                config.remove = Some(SAMPLE_REMOVAL.to_string());
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn sample_run_gets_default_actions() {
        let config = RuntimeConfig::from(Cli::parse_from(["dirtree", "--no-color"]));

        assert_eq!(config.layout, None);
        assert_eq!(config.find_dirs, vec!["work"]);
        assert_eq!(config.find_files, vec!["vacation.jpg"]);
        assert_eq!(config.remove.as_deref(), Some("documents/work"));
        assert!(!config.color);
    }

    #[test]
    fn layout_run_keeps_only_requested_actions() {
        let config = RuntimeConfig::from(Cli::parse_from(["dirtree", "--layout", "tree.yaml"]));

        assert_eq!(config.layout, Some(PathBuf::from("tree.yaml")));
        assert!(config.find_dirs.is_empty());
        assert!(config.find_files.is_empty());
        assert_eq!(config.remove, None);
    }

    #[test]
    fn explicit_actions_override_sample_defaults() {
        let config = RuntimeConfig::from(Cli::parse_from([
            "dirtree",
            "--find-file",
            "family.jpg",
            "--remove",
            "pictures",
        ]));

        assert_eq!(config.find_dirs, vec!["work"]);
        assert_eq!(config.find_files, vec!["family.jpg"]);
        assert_eq!(config.remove.as_deref(), Some("pictures"));
    }
}
