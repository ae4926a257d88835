use std::fmt;

use colored::Colorize;

use crate::tree::Tree;
use crate::tree::node::NodeId;

/// Text rendering of a [`Tree`]: totals first, then one indented line per node.
///
/// The format is meant for people and may change.
pub struct TreeView<'a, V> {
    tree: &'a Tree<V>,
    color: bool,
}

impl<V> TreeView<'_, V> {
    pub fn colored(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: NodeId, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            NodeId::Directory(id) => {
                let name = self.tree.get_node_name(id).unwrap_or_default();
                let line = format!("📁 {name}/");
                let size = format!("(size: {})", self.tree.get_directory_size(id));
                if self.color {
                    writeln!(f, "{indent}{} {size}", line.blue().bold())
                } else {
                    writeln!(f, "{indent}{line} {size}")
                }
            }
            NodeId::Leaf(id) => {
                let name = self.tree.get_node_name(id).unwrap_or_default();
                let size = format!("(size: {})", self.tree.leaf_size(id).unwrap_or_default());
                if self.color {
                    writeln!(f, "{indent}📄 {name} {}", size.dimmed())
                } else {
                    writeln!(f, "{indent}📄 {name} {size}")
                }
            }
        }
    }
}

impl<V> fmt::Display for TreeView<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tree.is_empty() {
            return writeln!(f, "Empty tree");
        }

        writeln!(f, "Directory Tree:")?;
        writeln!(f, "Total size: {} bytes", self.tree.get_total_size())?;
        writeln!(f, "Total directories: {}", self.tree.get_total_directories())?;
        writeln!(f, "Total files: {}", self.tree.get_total_files())?;
        writeln!(f)?;

        for (node, depth) in self.tree.walk() {
            self.write_node(f, node, depth)?;
        }
        Ok(())
    }
}

impl<V> Tree<V> {
    /// Uncolored [`TreeView`] of this tree.
    pub fn view(&self) -> TreeView<'_, V> {
        TreeView {
            tree: self,
            color: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_renders_placeholder() {
        let tree: Tree<()> = Tree::new();
        assert_eq!(tree.view().to_string(), "Empty tree\n");
    }

    #[test]
    fn view_indents_by_depth() {
        let mut tree: Tree<()> = Tree::new();
        let root = tree.create_directory(None, "root").unwrap();
        let docs = tree.create_directory(Some(root), "documents").unwrap();
        tree.create_leaf(docs, "resume.pdf", None, 500).unwrap();
        tree.create_leaf(root, "readme.txt", None, 100).unwrap();

        let expected = "\
Directory Tree:
Total size: 600 bytes
Total directories: 2
Total files: 2

📁 root/ (size: 600)
  📄 readme.txt (size: 100)
  📁 documents/ (size: 500)
    📄 resume.pdf (size: 500)
";
        assert_eq!(tree.view().to_string(), expected);
    }
}
