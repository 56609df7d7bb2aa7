// Licensed under the Apache-2.0 license

//! Pre-order traversal of the model.

use crate::types::{AddrMapNode, Node, RootNode};

/// Callbacks invoked while walking the tree.
///
/// `depth` is 0 for top-level address maps.
pub trait NodeVisitor {
    fn enter(&mut self, _node: &Node, _depth: usize) {}
    fn leave(&mut self, _node: &Node, _depth: usize) {}
}

/// Walk `children` and their descendants in pre-order.
pub fn walk_children<V: NodeVisitor + ?Sized>(children: &[Node], depth: usize, visitor: &mut V) {
    for child in children {
        walk(child, depth, visitor);
    }
}

/// Walk `node` and its descendants in pre-order.
pub fn walk<V: NodeVisitor + ?Sized>(node: &Node, depth: usize, visitor: &mut V) {
    visitor.enter(node, depth);
    walk_children(node.children(), depth + 1, visitor);
    visitor.leave(node, depth);
}

impl RootNode {
    /// Find a top-level address map by instance name.
    pub fn find_top(&self, inst_name: &str) -> Option<&AddrMapNode> {
        self.top.iter().find(|m| m.inst_name == inst_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RegFileNode, RegNode};

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl NodeVisitor for Recorder {
        fn enter(&mut self, node: &Node, depth: usize) {
            self.0.push(format!("{}{}", "+".repeat(depth), node.inst_name()));
        }
    }

    #[test]
    fn test_pre_order() {
        let tree = vec![
            Node::Reg(RegNode {
                inst_name: "a".into(),
                ..Default::default()
            }),
            Node::RegFile(RegFileNode {
                inst_name: "rf".into(),
                children: vec![Node::Reg(RegNode {
                    inst_name: "b".into(),
                    ..Default::default()
                })],
                ..Default::default()
            }),
        ];
        let mut rec = Recorder::default();
        walk_children(&tree, 0, &mut rec);
        assert_eq!(rec.0, ["a", "rf", "+b"]);
    }
}
