use derive_more::{Display, From};
use hashlink::LinkedHashMap;
use snafu::ensure;

use crate::tree::arena::Key;
use crate::tree::error::{InvalidNameSnafu, TreeError};

/// Longest accepted node name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Handle to a directory owned by a [`Tree`](crate::tree::Tree).
///
/// Handles are plain copies; once the directory is removed every operation
/// taking the handle reports it as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("directory#{_0}")]
pub struct DirectoryId(pub(crate) Key);

/// Handle to a leaf owned by a [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("leaf#{_0}")]
pub struct LeafId(pub(crate) Key);

/// Any node of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub enum NodeId {
    #[display("{_0}")]
    Directory(DirectoryId),
    #[display("{_0}")]
    Leaf(LeafId),
}

impl NodeId {
    pub fn is_directory(self) -> bool {
        matches!(self, NodeId::Directory(_))
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, NodeId::Leaf(_))
    }

    pub fn as_directory(self) -> Option<DirectoryId> {
        match self {
            NodeId::Directory(id) => Some(id),
            NodeId::Leaf(_) => None,
        }
    }

    pub fn as_leaf(self) -> Option<LeafId> {
        match self {
            NodeId::Leaf(id) => Some(id),
            NodeId::Directory(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("root")]
    Root,
    #[display("directory")]
    Directory,
    #[display("leaf")]
    Leaf,
}

#[derive(Debug)]
pub(crate) struct Directory {
    pub(crate) name: String,
    pub(crate) parent: Option<DirectoryId>,
    pub(crate) directories: LinkedHashMap<String, DirectoryId>,
    pub(crate) leaves: LinkedHashMap<String, LeafId>,
    pub(crate) total_size: u64,
}

impl Directory {
    pub(crate) fn new(name: &str, parent: Option<DirectoryId>) -> Self {
        Self {
            name: name.to_owned(),
            parent,
            directories: LinkedHashMap::new(),
            leaves: LinkedHashMap::new(),
            total_size: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.leaves.is_empty()
    }

    pub(crate) fn kind(&self) -> NodeKind {
        match self.parent {
            Some(_) => NodeKind::Directory,
            None => NodeKind::Root,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Leaf<V> {
    pub(crate) name: String,
    pub(crate) parent: DirectoryId,
    pub(crate) value: Option<V>,
    pub(crate) size: u16,
}

pub(crate) fn validate_name(name: &str) -> Result<(), TreeError> {
    ensure!(
        !name.is_empty() && name.len() <= MAX_NAME_LEN,
        InvalidNameSnafu { name }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("a")]
    #[case("readme.txt")]
    #[case("with space")]
    #[case("тест")]
    fn accepts_regular_names(#[case] name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[rstest]
    #[case(String::new())]
    #[case("x".repeat(MAX_NAME_LEN + 1))]
    #[case("é".repeat(128))]
    fn rejects_empty_and_oversized_names(#[case] name: String) {
        assert!(matches!(
            validate_name(&name),
            Err(TreeError::InvalidName { .. })
        ));
    }

    #[test]
    fn longest_name_is_accepted() {
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn directory_without_parent_is_root() {
        let directory = Directory::new("root", None);
        assert_eq!(directory.kind(), NodeKind::Root);
        assert!(directory.is_empty());
    }
}
