//! Expression trees for pathexpr.
//!
//! A parsed expression is an [`Ast`]: a flat arena of [`Node`]s addressed by
//! [`NodeId`], with explicit parent links. Analysis results are never stored
//! on the nodes; they live in side tables keyed by `NodeId`, so a lowered tree
//! is immutable and can be shared by any number of checks.
//!
//! Trees are built with [`ExprNode`] and flattened with [`Ast::lower`].

pub mod ast;
pub mod build;
pub mod node;

pub use ast::Ast;
pub use build::ExprNode;
pub use node::{Literal, Node, NodeId, NodeKind, ProjectionKind};

// Operators are shared with the checker and host registries.
pub use pathexpr_core::{ArithmeticOp, BitwiseOp, LogicalOp, RelationalOp, ShiftOp};
