use snafu::{OptionExt, ResultExt, ensure};
use tracing::debug;

use crate::tree::Tree;
use crate::tree::error::{
    AllocationFailureSnafu, DuplicateNameSnafu, InvalidArgumentSnafu, InvalidPathSnafu,
    NotEmptySnafu, NotFoundSnafu, RootExistsSnafu, TreeError,
};
use crate::tree::node::{Directory, DirectoryId, LeafId, NodeKind, validate_name};
use crate::tree::path::split_path;

impl<V> Tree<V> {
    /// Creates `name` under `parent`, or the root directory when `parent` is `None`.
    ///
    /// New directories are appended after their existing siblings and start
    /// with a size of zero.
    pub fn create_directory(
        &mut self,
        parent: Option<DirectoryId>,
        name: &str,
    ) -> Result<DirectoryId, TreeError> {
        validate_name(name)?;

        let Some(parent) = parent else {
            return self.create_root(name);
        };

        let parent_directory = self.directory(parent)?;
        ensure!(
            !parent_directory.directories.contains_key(name),
            DuplicateNameSnafu {
                kind: NodeKind::Directory,
                name,
                parent: parent_directory.name.as_str(),
            }
        );

        let id = self
            .directories
            .insert(Directory::new(name, Some(parent)))
            .map(DirectoryId)
            .context(AllocationFailureSnafu {
                kind: NodeKind::Directory,
            })?;
        self.directory_mut(parent)?
            .directories
            .insert(name.to_owned(), id);
        self.total_directories += 1;

        debug!("Created directory '{}' as {} under {}", name, id, parent);
        Ok(id)
    }

    fn create_root(&mut self, name: &str) -> Result<DirectoryId, TreeError> {
        if let Some(root) = self.root {
            return RootExistsSnafu {
                root: self.directory(root)?.name.as_str(),
            }
            .fail();
        }

        let id = self
            .directories
            .insert(Directory::new(name, None))
            .map(DirectoryId)
            .context(AllocationFailureSnafu {
                kind: NodeKind::Root,
            })?;
        self.root = Some(id);
        self.total_directories += 1;

        debug!("Created root directory '{}' as {}", name, id);
        Ok(id)
    }

    /// Finds or creates every directory along `path`, creating the root from
    /// the first component when the tree is empty.
    ///
    /// Not atomic: directories created before a failing component are kept.
    pub fn create_nested_directory(&mut self, path: &str) -> Result<DirectoryId, TreeError> {
        let components = split_path(path);
        let (first, rest) = components.split_first().context(InvalidPathSnafu { path })?;

        let root = self.root;
        let (mut current, rest) = match root {
            None => (self.create_directory(None, first)?, rest),
            Some(root) if self.directory(root)?.name == *first => (root, rest),
            Some(root) => (root, components.as_slice()),
        };

        for name in rest {
            current = match self.child_directory(current, name) {
                Some(existing) => existing,
                None => self.create_directory(Some(current), name)?,
            };
        }
        Ok(current)
    }

    /// Resolves a `/`-separated directory path from the root.
    ///
    /// The root's own name may lead the path (`root/documents`) or be left
    /// out (`documents`).
    pub fn find_directory(&self, path: &str) -> Result<DirectoryId, TreeError> {
        let components = split_path(path);
        ensure!(!components.is_empty(), InvalidPathSnafu { path });

        self.resolve_directory(&components).context(NotFoundSnafu {
            kind: NodeKind::Directory,
            target: path,
        })
    }

    /// Searches `start` (the root when `None`) and its descendants for a
    /// directory called `name`, in pre-order.
    pub fn search_directory(
        &self,
        start: Option<DirectoryId>,
        name: &str,
    ) -> Result<DirectoryId, TreeError> {
        ensure!(
            !name.is_empty(),
            InvalidArgumentSnafu {
                reason: "directory name must not be empty"
            }
        );

        start
            .or(self.root)
            .and_then(|start| self.search_directory_from(start, name))
            .context(NotFoundSnafu {
                kind: NodeKind::Directory,
                target: name,
            })
    }

    fn search_directory_from(&self, start: DirectoryId, name: &str) -> Option<DirectoryId> {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let Some(directory) = self.directories.get(id.0) else {
                continue;
            };
            if directory.name == name {
                return Some(id);
            }
            // Reversed so the first child is popped first.
            let first = pending.len();
            pending.extend(directory.directories.values().copied());
            pending[first..].reverse();
        }
        None
    }

    /// Removes `dir` with its whole subtree.
    ///
    /// The root can only be removed once it is empty. Sizes of the removed
    /// subtree are taken off every ancestor and every contained leaf value is
    /// handed to the destroy callback.
    pub fn remove_directory(&mut self, dir: DirectoryId) -> Result<(), TreeError> {
        let directory = self.directory(dir)?;
        ensure!(
            directory.parent.is_some() || directory.is_empty(),
            NotEmptySnafu {
                name: directory.name.as_str(),
            }
        );

        let parent = directory.parent;
        let size = directory.total_size;
        let name = directory.name.clone();

        match parent {
            Some(parent) => {
                self.directory_mut(parent)?.directories.remove(&name);
                self.propagate_size(parent, |total| total - size);
            }
            None => {
                self.root = None;
                self.total_size -= size;
            }
        }

        let destroyed = self.destroy_directory(dir);
        self.total_directories -= destroyed;

        debug!(
            "Removed directory '{}' ({} directories, {} bytes)",
            name, destroyed, size
        );
        Ok(())
    }

    pub fn get_parent_directory(&self, dir: DirectoryId) -> Option<DirectoryId> {
        self.directories.get(dir.0)?.parent
    }

    /// Immediate subdirectories of `dir` in creation order.
    pub fn child_directories(&self, dir: DirectoryId) -> impl Iterator<Item = DirectoryId> + '_ {
        self.directories
            .get(dir.0)
            .into_iter()
            .flat_map(|directory| directory.directories.values().copied())
    }

    /// Leaves directly inside `dir` in creation order.
    pub fn leaves(&self, dir: DirectoryId) -> impl Iterator<Item = LeafId> + '_ {
        self.directories
            .get(dir.0)
            .into_iter()
            .flat_map(|directory| directory.leaves.values().copied())
    }
}
