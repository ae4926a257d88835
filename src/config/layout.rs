use std::{borrow::Cow, fs, path::Path};

use dirtree::tree::{DirectoryId, Tree, TreeError};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

/// Tree built when no layout file is given.
const SAMPLE_LAYOUT: &str = r#"
root: root
tree:
  documents:
    resume.pdf: 500
    work:
      project.doc: 250
  pictures:
    vacation.jpg: 1024
    family.jpg: 2048
  readme.txt: 100
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEntry {
    Directory {
        name: String,
        entries: Vec<LayoutEntry>,
    },
    Leaf {
        name: String,
        size: u16,
    },
}

/// Description of a tree to build: a root name and its entries, in file order.
///
/// In the `tree` section a mapping (or an empty value) is a directory and an
/// integer is the size of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: String,
    entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn read(path: &Path) -> Result<Self, LayoutError> {
        debug!("Opening layout file: {}", path.display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read layout file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    pub fn sample() -> Result<Self, LayoutError> {
        SAMPLE_LAYOUT.try_into()
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Creates the layout's root and entries in `tree`. Each file's value is its path.
    pub fn build(&self, tree: &mut Tree<String>) -> Result<DirectoryId, LayoutError> {
        let root = tree.create_directory(None, &self.root).context(BuildSnafu)?;
        Self::build_entries(tree, root, &self.entries)?;
        Ok(root)
    }

    fn build_entries(
        tree: &mut Tree<String>,
        parent: DirectoryId,
        entries: &[LayoutEntry],
    ) -> Result<(), LayoutError> {
        for entry in entries {
            match entry {
                LayoutEntry::Directory { name, entries } => {
                    let directory = tree
                        .create_directory(Some(parent), name)
                        .context(BuildSnafu)?;
                    Self::build_entries(tree, directory, entries)?;
                }
                LayoutEntry::Leaf { name, size } => {
                    let value = tree
                        .get_node_path(parent)
                        .map(|parent_path| format!("{parent_path}/{name}"));
                    tree.create_leaf(parent, name, value, *size)
                        .context(BuildSnafu)?;
                }
            }
        }
        Ok(())
    }

    fn parse_entries(
        parent: &str,
        mapping: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<LayoutEntry>, LayoutError> {
        mapping
            .iter()
            .map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    return InvalidEntrySnafu {
                        parent,
                        entry: format!("{key:?}"),
                    }
                    .fail();
                };

                match value {
                    Yaml::Mapping(children) => Ok(LayoutEntry::Directory {
                        name: name.to_string(),
                        entries: Self::parse_entries(name, children)?,
                    }),
                    Yaml::Value(Scalar::Null) => Ok(LayoutEntry::Directory {
                        name: name.to_string(),
                        entries: Vec::new(),
                    }),
                    Yaml::Value(Scalar::Integer(size)) => {
                        let size = u16::try_from(*size).ok().context(SizeOutOfRangeSnafu {
                            name: name.to_string(),
                            size: *size,
                        })?;
                        Ok(LayoutEntry::Leaf {
                            name: name.to_string(),
                            size,
                        })
                    }
                    _ => {
                        debug!("Rejecting layout entry {:?}: {:?}", name, value);
                        InvalidEntrySnafu {
                            parent,
                            entry: name.to_string(),
                        }
                        .fail()
                    }
                }
            })
            .collect()
    }
}

impl TryFrom<&str> for Layout {
    type Error = LayoutError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedLayoutSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let root = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("root"))))
            .and_then(|root| root.as_str())
            .context(MissingRootSnafu)?;

        let tree_section = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("tree"))));
        let entries = match tree_section {
            None | Some(Yaml::Value(Scalar::Null)) => Vec::new(),
            Some(Yaml::Mapping(tree)) => Self::parse_entries(root, tree)?,
            Some(_) => return TreeNotMapSnafu.fail(),
        };

        Ok(Layout {
            root: root.to_string(),
            entries,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum LayoutError {
    #[snafu(display("Failed to read the layout file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the layout file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted layout file"))]
    MalformedLayout,
    #[snafu(display("Top level of layout should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Layout does not name its root directory"))]
    MissingRoot,
    #[snafu(display("Tree section should be a map"))]
    TreeNotMap,
    #[snafu(display(
        "Entry '{}' in '{}' is neither a directory nor a file size",
        entry,
        parent
    ))]
    InvalidEntry { parent: String, entry: String },
    #[snafu(display("Size {} of file '{}' is outside 0..=65535", size, name))]
    SizeOutOfRange { name: String, size: i64 },
    #[snafu(display("Failed to build the tree from the layout"))]
    BuildError { source: TreeError },
}
