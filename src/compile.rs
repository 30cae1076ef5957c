//! Compiling an expression: type check, then validate.

use tracing::debug;

use pathexpr_ast::{Ast, NodeId};
use pathexpr_compiler::{
    CheckOptions, Diagnostics, Environment, SemanticRecord, SymbolTable, SymbolValidator,
    TypeChecker, ValidatorOptions,
};
use pathexpr_core::TypeInfo;

use crate::CompileErrors;

/// A checked expression: the tree and everything resolved about it.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    ast: Ast,
    table: SymbolTable,
}

impl CompiledExpression {
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// The type of the whole expression, if it resolved.
    pub fn root_type(&self) -> Option<&TypeInfo> {
        if self.ast.is_empty() {
            return None;
        }
        self.table.node_type(self.ast.root())
    }

    pub fn node_type(&self, node: NodeId) -> Option<&TypeInfo> {
        self.table.node_type(node)
    }

    /// Every field the expression reads or writes.
    pub fn fields(&self) -> Vec<&SemanticRecord> {
        self.table.fields()
    }

    pub fn into_parts(self) -> (Ast, SymbolTable) {
        (self.ast, self.table)
    }
}

/// Output of [`compile`]. The expression is returned even when it has errors.
#[derive(Debug, Clone)]
pub struct CompilationResult {
    pub expression: CompiledExpression,
    pub diagnostics: Diagnostics,
}

impl CompilationResult {
    /// Check if compilation succeeded (no errors).
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_result(self) -> Result<CompiledExpression, CompileErrors> {
        if self.is_success() {
            Ok(self.expression)
        } else {
            Err(CompileErrors::new(self.diagnostics))
        }
    }
}

/// Type check `ast` and validate its calls with the default access threshold.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(env: &Environment<'_>, ast: Ast, options: &CheckOptions) -> CompilationResult {
    compile_with_validator(env, ast, options, ValidatorOptions::default())
}

/// [`compile`] with explicit validator settings.
pub fn compile_with_validator(
    env: &Environment<'_>,
    ast: Ast,
    options: &CheckOptions,
    validator: ValidatorOptions,
) -> CompilationResult {
    let mut diagnostics = Diagnostics::new();
    let table = TypeChecker::check(env, options, &ast, &mut diagnostics);

    let checked = diagnostics.len();
    SymbolValidator::new(&table, validator).validate(&ast, &mut diagnostics);
    debug!(
        check_errors = checked,
        validation_errors = diagnostics.len() - checked,
        symbols = table.len(),
        "compiled expression"
    );

    CompilationResult {
        expression: CompiledExpression { ast, table },
        diagnostics,
    }
}
