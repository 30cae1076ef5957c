//! Owned expression builder.
//!
//! Parsers and tests describe a tree as nested [`ExprNode`] values and hand
//! it to [`Ast::lower`](crate::Ast::lower), which flattens it into the arena.
//!
//! ```
//! use pathexpr_ast::{Ast, ExprNode as E};
//!
//! // items.{collect: price * qty}
//! let ast = Ast::lower(E::chain([
//!     E::property("items"),
//!     E::projection("collect", E::mul(E::property("price"), E::property("qty"))),
//! ]));
//! assert_eq!(ast.len(), 6);
//! ```

use ordered_float::OrderedFloat;
use pathexpr_core::{ArithmeticOp, BitwiseOp, LogicalOp, RelationalOp, ShiftOp, Span};

use crate::{Literal, NodeKind};

/// A node with owned children, prior to lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: NodeKind,
    pub children: Vec<ExprNode>,
    pub span: Span,
}

impl ExprNode {
    pub fn new(kind: NodeKind, children: impl IntoIterator<Item = ExprNode>) -> Self {
        Self {
            kind,
            children: children.into_iter().collect(),
            span: Span::default(),
        }
    }

    fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, [])
    }

    /// Attach a source span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    pub fn lit(literal: Literal) -> Self {
        Self::leaf(NodeKind::Const(literal))
    }

    pub fn null() -> Self {
        Self::lit(Literal::Null)
    }

    pub fn bool(value: bool) -> Self {
        Self::lit(Literal::Bool(value))
    }

    pub fn char(value: char) -> Self {
        Self::lit(Literal::Char(value))
    }

    pub fn int(value: i32) -> Self {
        Self::lit(Literal::Int(value))
    }

    pub fn long(value: i64) -> Self {
        Self::lit(Literal::Long(value))
    }

    pub fn float(value: f32) -> Self {
        Self::lit(Literal::Float(OrderedFloat(value)))
    }

    pub fn double(value: f64) -> Self {
        Self::lit(Literal::Double(OrderedFloat(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::lit(Literal::String(value.into()))
    }

    // ==========================================================================
    // Navigation
    // ==========================================================================

    pub fn property(name: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Property { name: name.into() })
    }

    pub fn method(name: impl Into<String>, args: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(NodeKind::Method { name: name.into() }, args)
    }

    pub fn static_field(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::leaf(NodeKind::StaticField {
            class_name: class_name.into(),
            name: name.into(),
        })
    }

    pub fn static_method(
        class_name: impl Into<String>,
        name: impl Into<String>,
        args: impl IntoIterator<Item = ExprNode>,
    ) -> Self {
        Self::new(
            NodeKind::StaticMethod {
                class_name: class_name.into(),
                name: name.into(),
            },
            args,
        )
    }

    pub fn constructor(class_name: impl Into<String>, args: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(
            NodeKind::Constructor {
                class_name: class_name.into(),
            },
            args,
        )
    }

    pub fn chain(links: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(NodeKind::Chain, links)
    }

    /// A dotted path of plain properties: `path("a.b.c")`.
    pub fn path(dotted: &str) -> Self {
        Self::chain(dotted.split('.').map(Self::property))
    }

    pub fn index(index: ExprNode) -> Self {
        Self::new(NodeKind::Index, [index])
    }

    pub fn projection(method: impl Into<String>, body: ExprNode) -> Self {
        Self::new(NodeKind::Projection { method: method.into() }, [body])
    }

    pub fn eval(context: ExprNode, expression: ExprNode) -> Self {
        Self::new(NodeKind::Eval, [context, expression])
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    pub fn var(name: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Variable { name: name.into() })
    }

    pub fn var_decl(name: impl Into<String>) -> Self {
        Self::leaf(NodeKind::VarDecl { name: name.into() })
    }

    pub fn root_var() -> Self {
        Self::leaf(NodeKind::RootVar)
    }

    pub fn this_var() -> Self {
        Self::leaf(NodeKind::ThisVar)
    }

    pub fn this_field() -> Self {
        Self::leaf(NodeKind::ThisField)
    }

    pub fn login_user() -> Self {
        Self::leaf(NodeKind::LoginUser)
    }

    pub fn assign(target: ExprNode, value: ExprNode) -> Self {
        Self::new(NodeKind::Assign, [target, value])
    }

    // ==========================================================================
    // Operators
    // ==========================================================================

    pub fn logical(op: LogicalOp, left: ExprNode, right: ExprNode) -> Self {
        Self::new(NodeKind::Logical(op), [left, right])
    }

    pub fn and(left: ExprNode, right: ExprNode) -> Self {
        Self::logical(LogicalOp::And, left, right)
    }

    pub fn or(left: ExprNode, right: ExprNode) -> Self {
        Self::logical(LogicalOp::Or, left, right)
    }

    pub fn not(operand: ExprNode) -> Self {
        Self::new(NodeKind::Logical(LogicalOp::Not), [operand])
    }

    pub fn arith(op: ArithmeticOp, left: ExprNode, right: ExprNode) -> Self {
        Self::new(NodeKind::Arithmetic(op), [left, right])
    }

    pub fn add(left: ExprNode, right: ExprNode) -> Self {
        Self::arith(ArithmeticOp::Add, left, right)
    }

    pub fn sub(left: ExprNode, right: ExprNode) -> Self {
        Self::arith(ArithmeticOp::Sub, left, right)
    }

    pub fn mul(left: ExprNode, right: ExprNode) -> Self {
        Self::arith(ArithmeticOp::Mul, left, right)
    }

    pub fn div(left: ExprNode, right: ExprNode) -> Self {
        Self::arith(ArithmeticOp::Div, left, right)
    }

    pub fn neg(operand: ExprNode) -> Self {
        Self::new(NodeKind::Negate, [operand])
    }

    pub fn rel(op: RelationalOp, left: ExprNode, right: ExprNode) -> Self {
        Self::new(NodeKind::Relational(op), [left, right])
    }

    pub fn eq(left: ExprNode, right: ExprNode) -> Self {
        Self::rel(RelationalOp::Eq, left, right)
    }

    pub fn lt(left: ExprNode, right: ExprNode) -> Self {
        Self::rel(RelationalOp::Lt, left, right)
    }

    pub fn gt(left: ExprNode, right: ExprNode) -> Self {
        Self::rel(RelationalOp::Gt, left, right)
    }

    pub fn bitwise(op: BitwiseOp, left: ExprNode, right: ExprNode) -> Self {
        Self::new(NodeKind::Bitwise(op), [left, right])
    }

    pub fn bit_not(operand: ExprNode) -> Self {
        Self::new(NodeKind::BitNot, [operand])
    }

    pub fn shift(op: ShiftOp, left: ExprNode, right: ExprNode) -> Self {
        Self::new(NodeKind::Shift(op), [left, right])
    }

    pub fn conditional(condition: ExprNode, then: ExprNode, otherwise: ExprNode) -> Self {
        Self::new(NodeKind::Conditional, [condition, then, otherwise])
    }

    pub fn cast(type_name: impl Into<String>, operand: ExprNode) -> Self {
        Self::new(
            NodeKind::Cast {
                type_name: type_name.into(),
            },
            [operand],
        )
    }

    pub fn instance_of(operand: ExprNode, type_name: impl Into<String>) -> Self {
        Self::new(
            NodeKind::InstanceOf {
                type_name: type_name.into(),
            },
            [operand],
        )
    }

    pub fn in_(value: ExprNode, collection: ExprNode) -> Self {
        Self::new(NodeKind::In, [value, collection])
    }

    pub fn not_in(value: ExprNode, collection: ExprNode) -> Self {
        Self::new(NodeKind::NotIn, [value, collection])
    }

    // ==========================================================================
    // Aggregates
    // ==========================================================================

    pub fn sequence(items: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(NodeKind::Sequence, items)
    }

    pub fn list(items: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(NodeKind::List, items)
    }

    pub fn map(entries: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::new(NodeKind::Map, entries)
    }

    pub fn key_value(key: ExprNode, value: ExprNode) -> Self {
        Self::new(NodeKind::KeyValue, [key, value])
    }

    /// A map entry with a string key.
    pub fn entry(key: impl Into<String>, value: ExprNode) -> Self {
        Self::key_value(Self::string(key), value)
    }

    pub fn empty_pair() -> Self {
        Self::leaf(NodeKind::KeyValue)
    }
}
