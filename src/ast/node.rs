use std::{collections::BTreeSet, fmt, mem};

use crate::{ast::NodeKind, stack::ensure_sufficient_stack};

/// Immutable AST node.
///
/// Nodes are built bottom-up by the parser and own their children. The text
/// is the matched source for literals, identifiers and function names, and
/// empty for operator nodes.
///
/// The child count is not checked here; the evaluator rejects nodes whose
/// child count does not match [`NodeKind::arity`].
///
/// Long operator chains and argument lists produce tall trees, so the
/// recursive trait impls (`Clone`, `PartialEq`, `Debug`, `Drop`) grow the
/// stack as needed rather than relying on the parser's nesting limit.
pub struct Node {
    kind: NodeKind,
    text: String,
    children: Vec<Node>,
    height: usize,
}

impl Node {
    pub fn new(kind: NodeKind, text: impl Into<String>, children: Vec<Node>) -> Self {
        let height = 1 + children.iter().map(Node::height).max().unwrap_or(0);
        Node {
            kind,
            text: text.into(),
            children,
            height,
        }
    }

    /// A node with no children.
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Node::new(kind, text, Vec::new())
    }

    /// An operator node; its text is empty.
    pub fn operator(kind: NodeKind, children: Vec<Node>) -> Self {
        Node::new(kind, String::new(), children)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of nodes on the longest path from this node to a leaf,
    /// counting both ends.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Lower-cased text of every node of `kind` in this subtree.
    pub fn names_of(&self, kind: NodeKind) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.kind == kind {
                names.insert(node.text.to_lowercase());
            }
            pending.extend(node.children.iter());
        }
        names
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| Node {
            kind: self.kind,
            text: self.text.clone(),
            children: self.children.clone(),
            height: self.height,
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && ensure_sufficient_stack(|| self.children == other.children)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| {
            f.debug_struct("Node")
                .field("kind", &self.kind)
                .field("text", &self.text)
                .field("children", &self.children)
                .finish()
        })
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let children = mem::take(&mut self.children);
        if !children.is_empty() {
            ensure_sufficient_stack(|| drop(children));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_and_node_count() {
        let sum = Node::operator(
            NodeKind::Add,
            vec![
                Node::leaf(NodeKind::Number, "1"),
                Node::operator(NodeKind::Minus, vec![Node::leaf(NodeKind::Identifier, "x")]),
            ],
        );
        assert_eq!(sum.height(), 3);
        assert_eq!(sum.node_count(), 4);
        assert_eq!(sum.text(), "");
    }

    fn negation_chain(depth: usize) -> Node {
        let mut node = Node::leaf(NodeKind::Number, "1");
        for _ in 0..depth {
            node = Node::operator(NodeKind::Minus, vec![node]);
        }
        node
    }

    #[test]
    fn test_tall_trees_clone_compare_and_drop() {
        let tree = negation_chain(200_000);
        assert_eq!(tree.height(), 200_001);
        assert_eq!(tree.node_count(), 200_001);

        let copy = tree.clone();
        assert!(copy == tree);
        assert!(copy != negation_chain(199_999));
        drop(copy);
        drop(tree);
    }

    #[test]
    fn test_names_are_lower_cased_and_distinct() {
        let tree = Node::operator(
            NodeKind::Mul,
            vec![
                Node::leaf(NodeKind::Identifier, "Rate"),
                Node::leaf(NodeKind::Identifier, "RATE"),
            ],
        );
        let names = tree.names_of(NodeKind::Identifier);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["rate"]);
        assert!(tree.names_of(NodeKind::FunctionCall).is_empty());
    }
}
