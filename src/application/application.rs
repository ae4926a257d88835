use dirtree::tree::{Tree, TreeError};
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::config::{Layout, LayoutError};

pub struct Application;

impl Application {
    pub fn run(config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = config.into();
        let layout = match &config.layout {
            Some(path) => Layout::read(path),
            None => Layout::sample(),
        }
        .context(LayoutSnafu)?;
        debug!("Loaded layout: {:?}", layout);

        let mut tree = Tree::new().with_destroy(|path: String| debug!("Released '{}'", path));
        layout.build(&mut tree).context(LayoutSnafu)?;
        info!("Built tree rooted at '{}'", layout.root_name());

        println!("{}", tree.view().colored(config.color));

        for name in &config.find_dirs {
            match tree.search_directory(None, name) {
                Ok(dir) => println!(
                    "Found directory '{}' at path: {}",
                    name,
                    tree.get_node_path(dir).unwrap_or_default()
                ),
                Err(e) => warn!("{}", e),
            }
        }
        for name in &config.find_files {
            match tree.find_leaf(None, name) {
                Ok(leaf) => println!(
                    "Found file '{}' at path: {}",
                    name,
                    tree.get_node_path(leaf).unwrap_or_default()
                ),
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(path) = &config.remove {
            match tree.find_directory(path) {
                Ok(dir) => {
                    println!("\nRemoving '{}' directory...", path);
                    tree.remove_directory(dir)
                        .context(RemovalSnafu { path: path.as_str() })?;
                    println!("{}", tree.view().colored(config.color));
                }
                Err(e) => warn!("Skipping removal: {}", e),
            }
        }

        tree.destroy();
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the tree layout"))]
    LayoutError { source: LayoutError },
    #[snafu(display("Failed to remove directory '{}'", path))]
    RemovalError { path: String, source: TreeError },
}
