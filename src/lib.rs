//! Embeddable path expressions, checked against a host object model.
//!
//! An expression such as `items.{collect: price * qty}` is lowered into an
//! [`Ast`], type checked against the host's types through a [`TypeProvider`],
//! and validated for call safety. The result is a [`CompiledExpression`]: the
//! tree plus the [`SymbolTable`] an evaluator needs to run it.
//!
//! # Example
//!
//! ```ignore
//! use pathexpr::prelude::*;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_class("Order").field("total", "double")?.build()?;
//!
//! let env = Environment::new(&registry);
//! let ast = Ast::lower(ExprNode::path("total"));
//! let compiled = compile(&env, ast, &CheckOptions::new().root_type("Order")).into_result()?;
//! assert_eq!(compiled.root_type().map(TypeInfo::name), Some("double"));
//! ```

mod compile;
mod error;

pub use compile::{CompilationResult, CompiledExpression, compile, compile_with_validator};
pub use error::{CompileErrors, PathExprError};

pub use pathexpr_ast as ast;
pub use pathexpr_compiler as compiler;
pub use pathexpr_core as core;
pub use pathexpr_registry as registry;

pub use pathexpr_ast::{Ast, ExprNode, NodeId, NodeKind};
pub use pathexpr_compiler::{
    CheckError, CheckOptions, Diagnostics, Environment, SemanticRecord, SymbolKind, SymbolTable,
    SymbolValidator, TypeChecker, ValidatorOptions,
};
pub use pathexpr_core::{Access, ArithmeticRegistry, RegistrationError, TypeInfo, TypeProvider};
pub use pathexpr_registry::TypeRegistry;

/// Everything a host needs to register types and compile expressions.
pub mod prelude {
    pub use crate::{
        Access, ArithmeticRegistry, Ast, CheckOptions, CompilationResult, CompiledExpression,
        Diagnostics, Environment, ExprNode, PathExprError, SymbolKind, TypeInfo, TypeProvider,
        TypeRegistry, ValidatorOptions, compile,
    };
}
