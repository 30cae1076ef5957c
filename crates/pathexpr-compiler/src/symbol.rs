//! Per-node semantic facts.

use std::fmt;

use pathexpr_ast::NodeId;
use pathexpr_core::{MemberRef, TypeInfo};

/// What a resolved node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    /// A type name, usable as a static prefix.
    Type,
    Field,
    Method,
    /// A link deferred while its path might still spell a type name.
    Path,
    ThisField,
    /// A key looked up in a constant map literal.
    Key,
    ProjectionFindAll,
    ProjectionFind,
    ProjectionCollect,
    /// `sum`, `avg`, `min` or `max`.
    ProjectionAggregate,
    /// `this` or `root`.
    This,
}

impl SymbolKind {
    pub const fn name(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Type => "type",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::Path => "path",
            SymbolKind::ThisField => "thisField",
            SymbolKind::Key => "key",
            SymbolKind::ProjectionFindAll => "findAll",
            SymbolKind::ProjectionFind => "find",
            SymbolKind::ProjectionCollect => "collect",
            SymbolKind::ProjectionAggregate => "aggregate",
            SymbolKind::This => "this",
        }
    }

    pub fn is_projection(self) -> bool {
        matches!(
            self,
            SymbolKind::ProjectionFindAll
                | SymbolKind::ProjectionFind
                | SymbolKind::ProjectionCollect
                | SymbolKind::ProjectionAggregate
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The semantic facts recorded for one node.
///
/// Records are created the first time the checker resolves a node and are
/// updated in place when it is revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticRecord {
    pub node: NodeId,
    /// `None` when the type is unknown; the null sentinel is a real type.
    pub type_info: Option<TypeInfo>,
    pub member: Option<MemberRef>,
    /// Must be set before the record enters a [`SymbolTable`](crate::SymbolTable).
    pub kind: Option<SymbolKind>,
    pub name: Option<String>,
    /// Dotted path of the navigation context the node was resolved in.
    pub context: Option<String>,
    /// The projection whose body produced this symbol, when nested in a path.
    pub extended_field_path: Option<NodeId>,
}

impl SemanticRecord {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            type_info: None,
            member: None,
            kind: None,
            name: None,
            context: None,
            extended_field_path: None,
        }
    }

    pub fn with_kind(mut self, kind: SymbolKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_type(mut self, type_info: Option<TypeInfo>) -> Self {
        self.type_info = type_info;
        self
    }

    pub fn with_member(mut self, member: MemberRef) -> Self {
        self.member = Some(member);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn is_kind(&self, kind: SymbolKind) -> bool {
        self.kind == Some(kind)
    }
}
