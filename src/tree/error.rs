use std::collections::TryReserveError;

use snafu::Snafu;

use crate::tree::node::{MAX_NAME_LEN, NodeKind};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Invalid argument: {}", reason))]
    InvalidArgument { reason: &'static str },
    #[snafu(display("Invalid name '{}': names must be 1 to {} bytes long", name, MAX_NAME_LEN))]
    InvalidName { name: String },
    #[snafu(display("Path '{}' does not contain any component", path))]
    InvalidPath { path: String },
    #[snafu(display("Tree already has a root directory '{}'", root))]
    RootExists { root: String },
    #[snafu(display("A {} named '{}' already exists in '{}'", kind, name, parent))]
    DuplicateName {
        kind: NodeKind,
        name: String,
        parent: String,
    },
    #[snafu(display("Root directory '{}' is not empty", name))]
    NotEmpty { name: String },
    #[snafu(display("No {} found for '{}'", kind, target))]
    NotFound { kind: NodeKind, target: String },
    /// The node arena could not grow. Only the arena slot is reserved
    /// fallibly; the owned name and the parent's child map still allocate
    /// infallibly.
    #[snafu(display("Failed to allocate storage for a new {}", kind))]
    AllocationFailure {
        kind: NodeKind,
        source: TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_node() {
        let duplicate = TreeError::DuplicateName {
            kind: NodeKind::Leaf,
            name: "readme.txt".into(),
            parent: "root".into(),
        };
        let not_found = TreeError::NotFound {
            kind: NodeKind::Directory,
            target: "documents/work".into(),
        };

        assert_eq!(
            duplicate.to_string(),
            "A leaf named 'readme.txt' already exists in 'root'"
        );
        assert_eq!(
            not_found.to_string(),
            "No directory found for 'documents/work'"
        );
    }

    #[test]
    fn invalid_name_mentions_limit() {
        let error = TreeError::InvalidName {
            name: String::new(),
        };
        assert!(error.to_string().contains("1 to 255 bytes"));
    }
}
