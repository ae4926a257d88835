use std::cmp::Ordering;
use std::fmt;

use snafu::OptionExt;
use tracing::debug;

use crate::tree::arena::Arena;
use crate::tree::error::{NotFoundSnafu, TreeError};
use crate::tree::node::{Directory, DirectoryId, Leaf, LeafId, NodeId, NodeKind};

/// Orders two leaf values. Stored for callers, the tree never sorts by it.
pub type CompareFn<V> = Box<dyn Fn(&V, &V) -> Ordering>;
/// Receives each leaf value when its leaf is removed or the tree is torn down.
pub type DestroyFn<V> = Box<dyn FnMut(V)>;

/// Owning container for one rooted hierarchy of directories and leaves.
///
/// Every node lives in an arena owned by the tree and is addressed through
/// [`DirectoryId`] / [`LeafId`] handles. Parent links are handles as well, so
/// excising a subtree never leaves a dangling reference behind: handles into
/// it simply stop resolving.
///
/// The tree does no locking; mutation goes through `&mut self`.
pub struct Tree<V> {
    pub(crate) directories: Arena<Directory>,
    pub(crate) leaves: Arena<Leaf<V>>,
    pub(crate) root: Option<DirectoryId>,
    pub(crate) total_directories: u32,
    pub(crate) total_size: u64,
    compare: Option<CompareFn<V>>,
    destroy: Option<DestroyFn<V>>,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self {
            directories: Arena::default(),
            leaves: Arena::default(),
            root: None,
            total_directories: 0,
            total_size: 0,
            compare: None,
            destroy: None,
        }
    }
}

impl<V> Tree<V> {
    /// Creates an empty tree without callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree storing both optional callbacks.
    pub fn with_callbacks(compare: Option<CompareFn<V>>, destroy: Option<DestroyFn<V>>) -> Self {
        let mut tree = Self::default();
        tree.compare = compare;
        tree.destroy = destroy;
        tree
    }

    pub fn with_compare(mut self, compare: impl Fn(&V, &V) -> Ordering + 'static) -> Self {
        self.compare = Some(Box::new(compare));
        self
    }

    pub fn with_destroy(mut self, destroy: impl FnMut(V) + 'static) -> Self {
        self.destroy = Some(Box::new(destroy));
        self
    }

    /// Tears the whole hierarchy down, handing every leaf value to the destroy
    /// callback. The tree is empty and reusable afterwards.
    pub fn destroy(&mut self) {
        if let Some(root) = self.root.take() {
            let destroyed = self.destroy_directory(root);
            debug!("Destroyed tree with {destroyed} directories");
        }
        self.total_directories = 0;
        self.total_size = 0;
    }

    pub fn root(&self) -> Option<DirectoryId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get_total_size(&self) -> u64 {
        self.total_size
    }

    pub fn get_total_directories(&self) -> u32 {
        self.total_directories
    }

    /// Aggregated size of all leaves below `dir`, zero for a stale handle.
    pub fn get_directory_size(&self, dir: DirectoryId) -> u64 {
        self.directories
            .get(dir.0)
            .map_or(0, |directory| directory.total_size)
    }

    /// Number of immediate subdirectories of `dir`, zero for a stale handle.
    pub fn get_directory_count(&self, dir: DirectoryId) -> usize {
        self.directories
            .get(dir.0)
            .map_or(0, |directory| directory.directories.len())
    }

    pub fn get_node_name(&self, node: impl Into<NodeId>) -> Option<&str> {
        match node.into() {
            NodeId::Directory(id) => self.directories.get(id.0).map(|d| d.name.as_str()),
            NodeId::Leaf(id) => self.leaves.get(id.0).map(|l| l.name.as_str()),
        }
    }

    pub fn node_kind(&self, node: impl Into<NodeId>) -> Option<NodeKind> {
        match node.into() {
            NodeId::Directory(id) => self.directories.get(id.0).map(Directory::kind),
            NodeId::Leaf(id) => self.leaves.get(id.0).map(|_| NodeKind::Leaf),
        }
    }

    pub fn contains(&self, node: impl Into<NodeId>) -> bool {
        self.node_kind(node).is_some()
    }

    pub fn is_directory(&self, node: impl Into<NodeId>) -> bool {
        matches!(
            self.node_kind(node),
            Some(NodeKind::Root | NodeKind::Directory)
        )
    }

    pub fn is_leaf(&self, node: impl Into<NodeId>) -> bool {
        self.node_kind(node) == Some(NodeKind::Leaf)
    }

    pub fn is_root(&self, dir: DirectoryId) -> bool {
        self.root == Some(dir)
    }

    /// Compares the values of two leaves with the tree's compare callback.
    ///
    /// Returns `Ok(None)` when there is no callback or either leaf carries no value.
    pub fn compare_leaf_values(&self, a: LeafId, b: LeafId) -> Result<Option<Ordering>, TreeError> {
        let a = self.leaf(a)?;
        let b = self.leaf(b)?;
        Ok(match (&self.compare, &a.value, &b.value) {
            (Some(compare), Some(a), Some(b)) => Some(compare(a, b)),
            _ => None,
        })
    }

    pub(crate) fn directory(&self, id: DirectoryId) -> Result<&Directory, TreeError> {
        self.directories.get(id.0).with_context(|| NotFoundSnafu {
            kind: NodeKind::Directory,
            target: id.to_string(),
        })
    }

    pub(crate) fn directory_mut(&mut self, id: DirectoryId) -> Result<&mut Directory, TreeError> {
        self.directories.get_mut(id.0).with_context(|| NotFoundSnafu {
            kind: NodeKind::Directory,
            target: id.to_string(),
        })
    }

    pub(crate) fn leaf(&self, id: LeafId) -> Result<&Leaf<V>, TreeError> {
        self.leaves.get(id.0).with_context(|| NotFoundSnafu {
            kind: NodeKind::Leaf,
            target: id.to_string(),
        })
    }

    /// Applies `apply` to the total size of `start`, each of its ancestors and the tree.
    pub(crate) fn propagate_size(&mut self, start: DirectoryId, apply: impl Fn(u64) -> u64) {
        let mut current = Some(start);
        while let Some(id) = current {
            let Some(directory) = self.directories.get_mut(id.0) else {
                break;
            };
            directory.total_size = apply(directory.total_size);
            current = directory.parent;
        }
        self.total_size = apply(self.total_size);
    }

    /// Frees `id` and everything below it, returning how many directories were freed.
    pub(crate) fn destroy_directory(&mut self, id: DirectoryId) -> u32 {
        let mut pending = vec![id];
        let mut subtree = Vec::new();
        while let Some(id) = pending.pop() {
            if let Some(directory) = self.directories.get(id.0) {
                pending.extend(directory.directories.values().copied());
                subtree.push(id);
            }
        }

        let mut destroyed = 0;
        for id in subtree {
            let Some(directory) = self.directories.remove(id.0) else {
                continue;
            };
            destroyed += 1;
            for (_, leaf) in directory.leaves {
                if let Some(leaf) = self.leaves.remove(leaf.0) {
                    self.release_value(leaf.value);
                }
            }
        }
        destroyed
    }

    pub(crate) fn release_value(&mut self, value: Option<V>) {
        if let (Some(destroy), Some(value)) = (self.destroy.as_mut(), value) {
            destroy(value);
        }
    }
}

impl<V> Drop for Tree<V> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<V> fmt::Debug for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("directories", &self.directories.len())
            .field("leaves", &self.leaves.len())
            .field("total_directories", &self.total_directories)
            .field("total_size", &self.total_size)
            .field("has_compare", &self.compare.is_some())
            .field("has_destroy", &self.destroy.is_some())
            .finish()
    }
}
