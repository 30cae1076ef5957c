//! The node arena.

use pathexpr_core::Span;

use crate::{ExprNode, Node, NodeId, NodeKind};

/// An immutable expression tree addressed by [`NodeId`].
///
/// Nodes are stored in pre-order, children keep their left-to-right order,
/// and every non-root node records its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// Flatten an owned tree into the arena.
    pub fn lower(root: ExprNode) -> Self {
        let mut ast = Ast { nodes: Vec::new() };
        ast.lower_node(root, None);
        ast
    }

    fn lower_node(&mut self, expr: ExprNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind: expr.kind,
            children: Vec::with_capacity(expr.children.len()),
            parent,
            span: expr.span,
        });
        let children: Vec<NodeId> = expr
            .children
            .into_iter()
            .map(|child| self.lower_node(child, Some(id)))
            .collect();
        self.nodes[id.index()].children = children;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn child(&self, id: NodeId, position: usize) -> Option<NodeId> {
        self.children(id).get(position).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Position of `id` among its parent's children.
    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// The sibling immediately to the left, e.g. the previous chain link.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let position = self.position_in_parent(id)?;
        let parent = self.parent(id)?;
        position.checked_sub(1).and_then(|p| self.child(parent, p))
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// All ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// The chain `id` is a direct link of, if any.
    pub fn enclosing_chain(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.kind(p).is_chain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprNode as E;

    #[test]
    fn lowers_in_preorder() {
        let ast = Ast::lower(E::add(E::path("a.b"), E::int(1)));
        assert_eq!(ast.len(), 5);
        let root = ast.root();
        assert!(matches!(ast.kind(root), NodeKind::Arithmetic(_)));
        assert_eq!(ast.children(root), &[NodeId(1), NodeId(4)]);
        assert_eq!(ast.children(NodeId(1)), &[NodeId(2), NodeId(3)]);
        assert_eq!(ast.parent(NodeId(3)), Some(NodeId(1)));
        assert_eq!(ast.parent(root), None);
    }

    #[test]
    fn siblings_and_ancestors() {
        let ast = Ast::lower(E::path("a.b.c"));
        let c = NodeId(3);
        assert_eq!(ast.previous_sibling(c), Some(NodeId(2)));
        assert_eq!(ast.previous_sibling(NodeId(1)), None);
        assert_eq!(ast.enclosing_chain(c), Some(ast.root()));
        assert_eq!(ast.ancestors(c).collect::<Vec<_>>(), vec![ast.root()]);
    }

    #[test]
    fn spans_survive_lowering() {
        let span = Span::new(1, 4, 3);
        let ast = Ast::lower(E::property("abc").at(span));
        assert_eq!(ast.span(ast.root()), span);
    }
}
