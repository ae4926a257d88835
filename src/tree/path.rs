use snafu::OptionExt;
use tracing::{trace, warn};

use crate::tree::Tree;
use crate::tree::error::{InvalidPathSnafu, NotFoundSnafu, TreeError};
use crate::tree::node::{DirectoryId, NodeId, NodeKind};

/// Components beyond this count are dropped by [`split_path`].
pub const MAX_PATH_COMPONENTS: usize = 64;

/// Splits `path` on `/`, skipping the empty components left by leading,
/// trailing or repeated slashes.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut components = path
        .split('/')
        .filter(|component| !component.is_empty())
        .take(MAX_PATH_COMPONENTS + 1)
        .collect::<Vec<_>>();

    if components.len() > MAX_PATH_COMPONENTS {
        warn!(
            "Path '{}' has more than {} components, truncating",
            path, MAX_PATH_COMPONENTS
        );
        components.truncate(MAX_PATH_COMPONENTS);
    }
    components
}

impl<V> Tree<V> {
    /// Full path of `node` from the root, e.g. `root/documents/work`.
    pub fn get_node_path(&self, node: impl Into<NodeId>) -> Option<String> {
        let (name, mut parent) = match node.into() {
            NodeId::Directory(id) => {
                let directory = self.directories.get(id.0)?;
                (directory.name.as_str(), directory.parent)
            }
            NodeId::Leaf(id) => {
                let leaf = self.leaves.get(id.0)?;
                (leaf.name.as_str(), Some(leaf.parent))
            }
        };

        let mut names = vec![name];
        while let Some(id) = parent {
            let directory = self.directories.get(id.0)?;
            names.push(directory.name.as_str());
            parent = directory.parent;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Resolves `path` to a directory or, failing that, to a leaf in the
    /// directory named by all but its last component.
    pub fn get_node_by_path(&self, path: &str) -> Result<NodeId, TreeError> {
        let components = split_path(path);
        let (last, parents) = components.split_last().context(InvalidPathSnafu { path })?;

        if let Some(directory) = self.resolve_directory(&components) {
            return Ok(directory.into());
        }

        self.resolve_directory(parents)
            .and_then(|parent| self.directories.get(parent.0))
            .and_then(|parent| parent.leaves.get(*last).copied())
            .map(NodeId::from)
            .context(NotFoundSnafu {
                kind: NodeKind::Leaf,
                target: path,
            })
    }

    /// Walks `components` down from the root.
    ///
    /// A first component equal to the root's name addresses the root itself,
    /// otherwise resolution starts among the root's children.
    pub(crate) fn resolve_directory(&self, components: &[&str]) -> Option<DirectoryId> {
        let root = self.root?;
        let rest = match components.split_first() {
            Some((first, rest)) if self.directories.get(root.0)?.name == *first => rest,
            _ => components,
        };

        rest.iter().try_fold(root, |current, name| {
            trace!("Resolving '{}' under {}", name, current);
            self.child_directory(current, name)
        })
    }

    pub(crate) fn child_directory(&self, parent: DirectoryId, name: &str) -> Option<DirectoryId> {
        self.directories
            .get(parent.0)?
            .directories
            .get(name)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("/a//b/", vec!["a", "b"])]
    #[case("a/b/c", vec!["a", "b", "c"])]
    #[case("///", vec![])]
    #[case("", vec![])]
    #[case("single", vec!["single"])]
    #[case("with space/x.txt", vec!["with space", "x.txt"])]
    fn split_path_discards_empty_components(#[case] path: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_path(path), expected);
    }

    #[test]
    fn split_path_truncates_long_paths() {
        let path = vec!["d"; MAX_PATH_COMPONENTS + 10].join("/");
        assert_eq!(split_path(&path).len(), MAX_PATH_COMPONENTS);
    }

    fn sample() -> (Tree<()>, DirectoryId, DirectoryId) {
        let mut tree = Tree::new();
        let root = tree.create_directory(None, "root").unwrap();
        let documents = tree.create_directory(Some(root), "documents").unwrap();
        let work = tree.create_directory(Some(documents), "work").unwrap();
        tree.create_leaf(work, "project.doc", None, 250).unwrap();
        tree.create_leaf(root, "readme.txt", None, 100).unwrap();
        (tree, root, work)
    }

    #[test]
    fn node_path_has_no_leading_slash() {
        let (tree, root, work) = sample();
        let project = tree.find_leaf(None, "project.doc").unwrap();

        assert_eq!(tree.get_node_path(root).as_deref(), Some("root"));
        assert_eq!(
            tree.get_node_path(work).as_deref(),
            Some("root/documents/work")
        );
        assert_eq!(
            tree.get_node_path(project).as_deref(),
            Some("root/documents/work/project.doc")
        );
    }

    #[test]
    fn node_path_of_removed_node_is_none() {
        let (mut tree, _, work) = sample();
        tree.remove_directory(work).unwrap();
        assert_eq!(tree.get_node_path(work), None);
    }

    #[rstest]
    #[case("root/documents/work")]
    #[case("documents/work")]
    #[case("/root/documents/work/")]
    fn node_by_path_finds_directories(#[case] path: &str) {
        let (tree, _, work) = sample();
        let node = tree.get_node_by_path(path).unwrap();
        assert_eq!(node.as_directory(), Some(work));
        assert_eq!(node.as_leaf(), None);
    }

    #[rstest]
    #[case("root/readme.txt")]
    #[case("readme.txt")]
    #[case("documents/work/project.doc")]
    fn node_by_path_finds_leaves(#[case] path: &str) {
        let (tree, _, _) = sample();
        let node = tree.get_node_by_path(path).unwrap();
        let leaf = node.as_leaf().unwrap();
        assert_eq!(node.as_directory(), None);
        assert!(tree.get_node_path(leaf).unwrap().ends_with(path));
    }

    #[test]
    fn node_by_path_reports_missing_and_empty_paths() {
        let (tree, _, _) = sample();
        assert!(matches!(
            tree.get_node_by_path("documents/missing.txt"),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.get_node_by_path("//"),
            Err(TreeError::InvalidPath { .. })
        ));
    }

    #[test]
    fn directory_wins_over_leaf_of_same_name() {
        let (mut tree, root, _) = sample();
        let shared = tree.create_directory(Some(root), "shared").unwrap();
        tree.create_leaf(root, "shared", None, 1).unwrap();
        assert_eq!(
            tree.get_node_by_path("shared").unwrap(),
            NodeId::Directory(shared)
        );
    }
}
