//! Node definitions.
//!
//! Every node is one [`NodeKind`] plus an ordered list of children. The
//! meaning of each child position is fixed per variant and documented on the
//! variant itself; the checker relies on these layouts and treats a
//! violation as a malformed tree.

use std::fmt;

use ordered_float::OrderedFloat;
use pathexpr_core::{
    ArithmeticOp, BitwiseOp, LogicalOp, PrimitiveKind, RelationalOp, ShiftOp, Span, TypeInfo,
};

/// Stable identity of a node within one [`Ast`](crate::Ast).
///
/// Two syntactically identical sub-expressions at different positions have
/// different ids. Ids are assigned in pre-order, so the root is always `0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A constant embedded in the tree.
///
/// Floating point values use [`OrderedFloat`] so literals are `Eq + Hash`
/// and map keys compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
}

impl Literal {
    /// The static type of this value; `null` maps to the null sentinel.
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Literal::Null => TypeInfo::null(),
            Literal::Bool(_) => TypeInfo::boolean(),
            Literal::Char(_) => TypeInfo::primitive(PrimitiveKind::Char),
            Literal::Int(_) => TypeInfo::primitive(PrimitiveKind::Int),
            Literal::Long(_) => TypeInfo::primitive(PrimitiveKind::Long),
            Literal::Float(_) => TypeInfo::primitive(PrimitiveKind::Float),
            Literal::Double(_) => TypeInfo::primitive(PrimitiveKind::Double),
            Literal::String(_) => TypeInfo::string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, for constant list indexing.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Int(v) => Some(i64::from(*v)),
            Literal::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Char(v) => write!(f, "'{v}'"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}L"),
            Literal::Float(v) => write!(f, "{v}f"),
            Literal::Double(v) => write!(f, "{v}"),
            Literal::String(v) => write!(f, "\"{v}\""),
        }
    }
}

/// The projection operators applicable to a container link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    FindAll,
    Find,
    Collect,
    Sum,
    Avg,
    Min,
    Max,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 7] = [
        ProjectionKind::FindAll,
        ProjectionKind::Find,
        ProjectionKind::Collect,
        ProjectionKind::Sum,
        ProjectionKind::Avg,
        ProjectionKind::Min,
        ProjectionKind::Max,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ProjectionKind::FindAll => "findAll",
            ProjectionKind::Find => "find",
            ProjectionKind::Collect => "collect",
            ProjectionKind::Sum => "sum",
            ProjectionKind::Avg => "avg",
            ProjectionKind::Min => "min",
            ProjectionKind::Max => "max",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// `sum`, `avg`, `min` and `max`.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            ProjectionKind::Sum | ProjectionKind::Avg | ProjectionKind::Min | ProjectionKind::Max
        )
    }

    /// The legal names, comma separated, for diagnostics.
    pub fn legal_names() -> String {
        Self::ALL.map(ProjectionKind::name).join(", ")
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a node is. Child layouts are given per variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Literal value. No children.
    Const(Literal),
    /// Field or property access, standalone or as a chain link. No children.
    Property { name: String },
    /// Method call. Children: arguments.
    Method { name: String },
    /// `Class.FIELD`. No children.
    StaticField { class_name: String, name: String },
    /// `Class.method(args)`. Children: arguments.
    StaticMethod { class_name: String, name: String },
    /// `new Class(args)`. Children: arguments.
    Constructor { class_name: String },
    /// `(Type) operand`. Children: `[operand]`.
    Cast { type_name: String },
    /// Navigation `a.b.c`. Children: the links, left to right.
    Chain,
    /// `[index]` applied to the preceding chain link. Children: `[index]`.
    Index,
    /// Plain variable reference. No children.
    Variable { name: String },
    /// The expression root object. No children.
    RootVar,
    /// The current scope object. No children.
    ThisVar,
    /// The configured self-referencing field. No children.
    ThisField,
    /// The current login user. No children.
    LoginUser,
    /// Children: `[target, value]`.
    Assign,
    /// `And`/`Or`: `[left, right]`; `Not`: `[operand]`.
    Logical(LogicalOp),
    /// Children: `[left, right]`.
    Arithmetic(ArithmeticOp),
    /// Unary minus. Children: `[operand]`.
    Negate,
    /// Children: `[left, right]`.
    Relational(RelationalOp),
    /// Children: `[left, right]`.
    Bitwise(BitwiseOp),
    /// `~operand`. Children: `[operand]`.
    BitNot,
    /// Children: `[left, right]`.
    Shift(ShiftOp),
    /// Children: `[condition, then, else]`.
    Conditional,
    /// `a; b; c`. Children: the statements.
    Sequence,
    /// List literal. Children: the elements.
    List,
    /// Map literal. Children: `KeyValue` entries.
    Map,
    /// Map entry. Children: `[key, value]`, or none for an empty pair.
    KeyValue,
    /// `link.{method: body}`. Children: `[body]`.
    Projection { method: String },
    /// Variable declaration. No children; initialization is an `Assign`.
    VarDecl { name: String },
    /// Children: `[operand]`.
    InstanceOf { type_name: String },
    /// Children: `[value, collection]`.
    In,
    /// Children: `[value, collection]`.
    NotIn,
    /// Evaluate an expression against another object. Children: `[context, expression]`.
    Eval,
}

impl NodeKind {
    /// Short label for logging and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Const(_) => "constant",
            NodeKind::Property { .. } => "property",
            NodeKind::Method { .. } => "method",
            NodeKind::StaticField { .. } => "static field",
            NodeKind::StaticMethod { .. } => "static method",
            NodeKind::Constructor { .. } => "constructor",
            NodeKind::Cast { .. } => "cast",
            NodeKind::Chain => "chain",
            NodeKind::Index => "index",
            NodeKind::Variable { .. } => "variable",
            NodeKind::RootVar => "root",
            NodeKind::ThisVar => "this",
            NodeKind::ThisField => "thisField",
            NodeKind::LoginUser => "loginUser",
            NodeKind::Assign => "assign",
            NodeKind::Logical(_) => "logical",
            NodeKind::Arithmetic(_) => "arithmetic",
            NodeKind::Negate => "negate",
            NodeKind::Relational(_) => "relational",
            NodeKind::Bitwise(_) => "bitwise",
            NodeKind::BitNot => "bitwise not",
            NodeKind::Shift(_) => "shift",
            NodeKind::Conditional => "conditional",
            NodeKind::Sequence => "sequence",
            NodeKind::List => "list",
            NodeKind::Map => "map",
            NodeKind::KeyValue => "key/value",
            NodeKind::Projection { .. } => "projection",
            NodeKind::VarDecl { .. } => "variable declaration",
            NodeKind::InstanceOf { .. } => "instanceof",
            NodeKind::In => "in",
            NodeKind::NotIn => "not in",
            NodeKind::Eval => "eval",
        }
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, NodeKind::Chain)
    }

    pub fn is_projection(&self) -> bool {
        matches!(self, NodeKind::Projection { .. })
    }

    /// The literal, if this is a constant.
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            NodeKind::Const(lit) => Some(lit),
            _ => None,
        }
    }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    pub span: Span,
}
