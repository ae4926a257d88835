use crate::tree::Tree;
use crate::tree::node::NodeId;

/// Depth-first walk over a [`Tree`], yielding each node with its depth.
///
/// A directory is yielded before its contents; its leaves come before its
/// subdirectories, each group in creation order.
pub struct Walk<'a, V> {
    tree: &'a Tree<V>,
    stack: Vec<(NodeId, usize)>,
}

impl<V> Iterator for Walk<'_, V> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if let NodeId::Directory(id) = node {
            if let Some(directory) = self.tree.directories.get(id.0) {
                let children = directory
                    .leaves
                    .values()
                    .map(|&leaf| NodeId::Leaf(leaf))
                    .chain(directory.directories.values().map(|&dir| NodeId::Directory(dir)))
                    .collect::<Vec<_>>();
                self.stack
                    .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }
        Some((node, depth))
    }
}

impl<V> Tree<V> {
    pub fn walk(&self) -> Walk<'_, V> {
        Walk {
            tree: self,
            stack: self
                .root
                .map(|root| (NodeId::Directory(root), 0))
                .into_iter()
                .collect(),
        }
    }

    /// Calls `visit` for every node in [`walk`](Self::walk) order.
    pub fn traverse(&self, mut visit: impl FnMut(NodeId, usize)) {
        for (node, depth) in self.walk() {
            visit(node, depth);
        }
    }

    pub fn get_total_files(&self) -> usize {
        self.walk().filter(|(node, _)| node.is_leaf()).count()
    }

    pub fn print_tree(&self) {
        print!("{}", self.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_visits_leaves_before_subdirectories() {
        let mut tree: Tree<()> = Tree::new();
        let root = tree.create_directory(None, "root").unwrap();
        let docs = tree.create_directory(Some(root), "docs").unwrap();
        tree.create_leaf(docs, "inner.txt", None, 1).unwrap();
        tree.create_directory(Some(root), "pics").unwrap();
        tree.create_leaf(root, "readme.txt", None, 1).unwrap();

        let mut visited = Vec::new();
        tree.traverse(|node, depth| {
            visited.push(format!("{depth}:{}", tree.get_node_name(node).unwrap()));
        });

        assert_eq!(
            visited,
            vec!["0:root", "1:readme.txt", "1:docs", "2:inner.txt", "1:pics"]
        );
    }

    #[test]
    fn walk_of_empty_tree_yields_nothing() {
        let tree: Tree<()> = Tree::new();
        assert_eq!(tree.walk().count(), 0);
    }

    #[test]
    fn total_files_counts_all_levels() {
        let mut tree: Tree<()> = Tree::new();
        let deep = tree.create_nested_directory("r/a/b/c").unwrap();
        let root = tree.root().unwrap();
        tree.create_leaf(root, "one", None, 1).unwrap();
        tree.create_leaf(deep, "two", None, 1).unwrap();
        tree.create_leaf(deep, "three", None, 1).unwrap();

        assert_eq!(tree.get_total_files(), 3);
    }
}
