use snafu::{OptionExt, ResultExt, ensure};
use tracing::debug;

use crate::tree::Tree;
use crate::tree::error::{
    AllocationFailureSnafu, DuplicateNameSnafu, InvalidArgumentSnafu, NotFoundSnafu, TreeError,
};
use crate::tree::node::{DirectoryId, Leaf, LeafId, NodeKind, validate_name};

impl<V> Tree<V> {
    /// Adds a leaf of `size` bytes to `parent`, growing the size of `parent`,
    /// each of its ancestors and the tree.
    ///
    /// On failure `value` is dropped without reaching the destroy callback.
    pub fn create_leaf(
        &mut self,
        parent: DirectoryId,
        name: &str,
        value: Option<V>,
        size: u16,
    ) -> Result<LeafId, TreeError> {
        validate_name(name)?;

        let parent_directory = self.directory(parent)?;
        ensure!(
            !parent_directory.leaves.contains_key(name),
            DuplicateNameSnafu {
                kind: NodeKind::Leaf,
                name,
                parent: parent_directory.name.as_str(),
            }
        );

        let leaf = Leaf {
            name: name.to_owned(),
            parent,
            value,
            size,
        };
        let id = self
            .leaves
            .insert(leaf)
            .map(LeafId)
            .context(AllocationFailureSnafu {
                kind: NodeKind::Leaf,
            })?;
        self.directory_mut(parent)?.leaves.insert(name.to_owned(), id);
        self.propagate_size(parent, |total| total + u64::from(size));

        debug!("Created leaf '{}' ({} bytes) as {} under {}", name, size, id, parent);
        Ok(id)
    }

    /// Unlinks `leaf`, takes its size off every ancestor and hands its value
    /// to the destroy callback.
    pub fn remove_leaf(&mut self, leaf: LeafId) -> Result<(), TreeError> {
        let removed = self.leaves.remove(leaf.0).with_context(|| NotFoundSnafu {
            kind: NodeKind::Leaf,
            target: leaf.to_string(),
        })?;

        if let Some(parent) = self.directories.get_mut(removed.parent.0) {
            parent.leaves.remove(&removed.name);
        }
        let size = u64::from(removed.size);
        self.propagate_size(removed.parent, |total| total - size);
        self.release_value(removed.value);

        debug!("Removed leaf '{}' ({} bytes)", removed.name, size);
        Ok(())
    }

    /// Depth-first search for a leaf called `name` below `start` (the root when
    /// `None`). Each directory's own leaves are checked before its subdirectories.
    pub fn find_leaf(&self, start: Option<DirectoryId>, name: &str) -> Result<LeafId, TreeError> {
        ensure!(
            !name.is_empty(),
            InvalidArgumentSnafu {
                reason: "leaf name must not be empty"
            }
        );

        start
            .or(self.root)
            .and_then(|start| self.find_leaf_from(start, name))
            .context(NotFoundSnafu {
                kind: NodeKind::Leaf,
                target: name,
            })
    }

    fn find_leaf_from(&self, start: DirectoryId, name: &str) -> Option<LeafId> {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let Some(directory) = self.directories.get(id.0) else {
                continue;
            };
            if let Some(&leaf) = directory.leaves.get(name) {
                return Some(leaf);
            }
            let first = pending.len();
            pending.extend(directory.directories.values().copied());
            pending[first..].reverse();
        }
        None
    }

    pub fn leaf_size(&self, leaf: LeafId) -> Option<u16> {
        self.leaves.get(leaf.0).map(|leaf| leaf.size)
    }

    pub fn leaf_parent(&self, leaf: LeafId) -> Option<DirectoryId> {
        self.leaves.get(leaf.0).map(|leaf| leaf.parent)
    }

    pub fn leaf_value(&self, leaf: LeafId) -> Option<&V> {
        self.leaves.get(leaf.0)?.value.as_ref()
    }

    pub fn leaf_value_mut(&mut self, leaf: LeafId) -> Option<&mut V> {
        self.leaves.get_mut(leaf.0)?.value.as_mut()
    }
}
