//! Total tree walk.
//!
//! Totality lives in [`NodeData::children`]'s exhaustive match: adding a
//! variant fails compilation there until its children are enumerated, so no
//! walk can silently skip part of the tree. There is deliberately no
//! wildcard fallthrough anywhere in the traversal.

use crate::node::Node;

/// A read-only visitor over the converted tree.
///
/// `enter` runs before a node's children, `leave` after. Both default to
/// no-ops so implementations override only what they need; the walk itself
/// still reaches every node of every kind.
pub trait Visitor {
    fn enter(&mut self, _node: &Node) {}
    fn leave(&mut self, _node: &Node) {}
}

/// Walk `node` and its subtree in source order.
pub fn walk<V: Visitor>(node: &Node, visitor: &mut V) {
    visitor.enter(node);
    for child in node.children() {
        walk(child, visitor);
    }
    visitor.leave(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_arena::NodeKind;

    struct KindCounter {
        entered: Vec<NodeKind>,
        left: Vec<NodeKind>,
    }

    impl Visitor for KindCounter {
        fn enter(&mut self, node: &Node) {
            self.entered.push(node.kind());
        }

        fn leave(&mut self, node: &Node) {
            self.left.push(node.kind());
        }
    }

    #[test]
    fn walk_visits_every_node_in_order() {
        use styler_common::deadline::Deadline;
        use styler_common::version::LanguageVersion;

        let source = "class T { int x = 1 + 2; }";
        let output =
            styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
        let tree = crate::build_tree(source, &output, Deadline::never()).unwrap();

        let mut counter = KindCounter {
            entered: Vec::new(),
            left: Vec::new(),
        };
        walk(tree.root(), &mut counter);

        assert_eq!(counter.entered.len(), counter.left.len());
        assert_eq!(counter.entered.first(), Some(&NodeKind::CompilationUnit));
        assert_eq!(counter.left.last(), Some(&NodeKind::CompilationUnit));
        assert!(counter.entered.contains(&NodeKind::ClassDecl));
        assert!(counter.entered.contains(&NodeKind::FieldDecl));
        assert!(counter.entered.contains(&NodeKind::BinaryExpr));
        assert!(counter.entered.contains(&NodeKind::LiteralExpr));
    }
}
