//! Static checking for path expressions.
//!
//! Two passes run over a lowered [`Ast`](pathexpr_ast::Ast):
//!
//! 1. [`TypeChecker`] resolves every node against a host
//!    [`TypeProvider`](pathexpr_core::TypeProvider) and records what it found
//!    in a [`SymbolTable`].
//! 2. [`SymbolValidator`] re-walks the tree with that table and rejects calls
//!    below the configured access level.
//!
//! User errors from both passes are appended to a caller-owned
//! [`Diagnostics`]; neither pass stops at the first error.
//!
//! ```ignore
//! let mut diagnostics = Diagnostics::new();
//! let table = TypeChecker::check(&env, &CheckOptions::new().root_type("Order"), &ast, &mut diagnostics);
//! SymbolValidator::new(&table, ValidatorOptions::default()).validate(&ast, &mut diagnostics);
//! ```

mod checker;
mod error;
mod options;
pub mod reserved;
mod scope;
mod symbol;
mod symbol_table;
mod validator;

pub use checker::TypeChecker;
pub use error::{CheckError, Diagnostics};
pub use options::{CheckOptions, DEFAULT_UTILITY_TYPE, Environment, ValidatorOptions};
pub use scope::{Scope, ScopeKind, ScopeStack};
pub use symbol::{SemanticRecord, SymbolKind};
pub use symbol_table::SymbolTable;
pub use validator::SymbolValidator;
