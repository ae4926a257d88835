//! In-memory hierarchical namespace.
//!
//! A [`Tree`] owns one rooted hierarchy of directories and leaves (file-like
//! nodes carrying an opaque value and a size). Directories keep the aggregated
//! size of every leaf below them up to date on each mutation.

mod arena;
mod directory;
mod error;
mod leaf;
mod node;
mod path;
mod traversal;
#[allow(clippy::module_inception)]
mod tree;
mod view;

pub use error::TreeError;
pub use node::{DirectoryId, LeafId, MAX_NAME_LEN, NodeId, NodeKind};
pub use path::{MAX_PATH_COMPONENTS, split_path};
pub use traversal::Walk;
pub use tree::{CompareFn, DestroyFn, Tree};
pub use view::TreeView;
