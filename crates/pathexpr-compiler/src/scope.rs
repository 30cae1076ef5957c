//! Type-context stack used during checking.
//!
//! Two kinds of scope nest on one stack:
//! - **Lexical** scopes hold the type that names resolve against inside
//!   method arguments, projection bodies and eval expressions.
//! - **Field-path** scopes hold the type of the previous link while the next
//!   link of a navigation chain is resolved.
//!
//! A scope is pushed by the visit of one node and popped by the same visit,
//! identified by that node's id.

use pathexpr_ast::{Ast, NodeId};
use pathexpr_core::TypeInfo;
use tracing::trace;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Lexical,
    FieldPath,
}

/// One entry of the [`ScopeStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// `None` when the context type is unknown.
    pub root_type: Option<TypeInfo>,
    /// The node whose visit owns this scope.
    pub root_node: NodeId,
    pub kind: ScopeKind,
    /// Dotted context name for symbols resolved directly in this scope.
    pub path: Option<String>,
}

// ============================================================================
// ScopeStack
// ============================================================================

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// A stack holding the outermost lexical scope for the whole expression.
    pub fn new(root_type: Option<TypeInfo>, root_node: NodeId) -> Self {
        Self {
            scopes: vec![Scope {
                root_type,
                root_node,
                kind: ScopeKind::Lexical,
                path: None,
            }],
        }
    }

    pub fn begin_scope(
        &mut self,
        root_type: Option<TypeInfo>,
        root_node: NodeId,
        kind: ScopeKind,
        path: Option<String>,
    ) {
        trace!(
            node = %root_node,
            ?kind,
            root_type = root_type.as_ref().map(TypeInfo::name),
            depth = self.scopes.len() + 1,
            "begin scope"
        );
        self.scopes.push(Scope {
            root_type,
            root_node,
            kind,
            path,
        });
    }

    /// Pop the top scope if `node` owns it. Returns whether a scope was popped.
    pub fn end_scope_if_necessary(&mut self, node: NodeId) -> bool {
        match self.scopes.last() {
            Some(top) if top.root_node == node && self.scopes.len() > 1 => {
                trace!(node = %node, depth = self.scopes.len(), "end scope");
                self.scopes.pop();
                true
            }
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn top(&self) -> &Scope {
        // The outermost scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    fn nearest_lexical(&self) -> &Scope {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.kind == ScopeKind::Lexical)
            .unwrap_or(&self.scopes[0])
    }

    /// Type of the innermost scope of any kind.
    pub fn current_type(&self) -> Option<&TypeInfo> {
        self.top().root_type.as_ref()
    }

    /// Type of the innermost lexical scope, skipping field-path scopes.
    pub fn current_lexical_type(&self) -> Option<&TypeInfo> {
        self.nearest_lexical().root_type.as_ref()
    }

    /// Context name for symbols resolved right now.
    pub fn current_path(&self) -> Option<String> {
        self.top().path.clone()
    }

    pub fn current_lexical_path(&self) -> Option<String> {
        self.nearest_lexical().path.clone()
    }

    /// The projection whose body is being checked, when that projection is
    /// itself nested inside a path.
    ///
    /// Skips any scope owned by `node`, takes the nearest lexical scope, and
    /// returns its owner only if that is a projection and not the outermost
    /// scope.
    pub fn extended_field_path(&self, node: NodeId, ast: &Ast) -> Option<NodeId> {
        let (index, scope) = self
            .scopes
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.root_node != node)
            .find(|(_, s)| s.kind == ScopeKind::Lexical)?;
        (index > 0 && ast.kind(scope.root_node).is_projection()).then_some(scope.root_node)
    }
}
