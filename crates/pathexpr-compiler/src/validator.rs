//! Symbol Validation Pass - Access checks over a type-checked tree.
//!
//! Runs after [`TypeChecker::check`](crate::TypeChecker::check) and reads only
//! the [`SymbolTable`] it produced. No types are resolved here.
//!
//! ## Rules
//!
//! - A called method must have at least the configured minimum [`Access`],
//!   unless its name is one of the always-safe methods.
//! - A property read through a getter is a call of that getter and follows
//!   the same rule. Writes are not restricted.
//!
//! Whether a node is written is decided top-down: an `Assign` target is
//! written, so is the last link of a written chain and the node an index
//! applies to.

use tracing::trace;

use pathexpr_ast::{Ast, NodeId, NodeKind};
use pathexpr_core::{Access, MemberRef, MethodInfo};

use crate::reserved::is_safe_method;
use crate::{CheckError, Diagnostics, SemanticRecord, SymbolKind, SymbolTable, ValidatorOptions};

/// Symbol Validation Pass - rejects calls below the access threshold.
pub struct SymbolValidator<'t> {
    table: &'t SymbolTable,
    options: ValidatorOptions,
}

impl<'t> SymbolValidator<'t> {
    pub fn new(table: &'t SymbolTable, options: ValidatorOptions) -> Self {
        Self { table, options }
    }

    /// Walk `ast`, appending unsafe calls to `diagnostics`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn validate(&self, ast: &Ast, diagnostics: &mut Diagnostics) {
        if ast.is_empty() {
            return;
        }
        let before = diagnostics.len();
        self.visit(ast, ast.root(), false, diagnostics);
        trace!(errors = diagnostics.len() - before, "symbol validation finished");
    }

    fn visit(&self, ast: &Ast, id: NodeId, write: bool, diagnostics: &mut Diagnostics) {
        match ast.kind(id) {
            NodeKind::Property { .. } | NodeKind::StaticField { .. } => {
                self.check_property(ast, id, write, diagnostics);
            }
            NodeKind::Method { .. } | NodeKind::StaticMethod { .. } => {
                self.check_call(ast, id, diagnostics);
            }
            _ => {}
        }

        let children = ast.children(id);
        match ast.kind(id) {
            NodeKind::Assign => {
                if let [target, rest @ ..] = children {
                    self.visit(ast, *target, true, diagnostics);
                    for &child in rest {
                        self.visit(ast, child, false, diagnostics);
                    }
                }
            }
            NodeKind::Chain => {
                for (position, &link) in children.iter().enumerate() {
                    let written = write && written_link(ast, children, position);
                    self.visit(ast, link, written, diagnostics);
                }
            }
            _ => {
                for &child in children {
                    self.visit(ast, child, false, diagnostics);
                }
            }
        }
    }

    fn check_property(&self, ast: &Ast, id: NodeId, write: bool, diagnostics: &mut Diagnostics) {
        let Some(record) = self.table.get_symbol_record(id) else {
            return;
        };
        if !record.is_kind(SymbolKind::Field) {
            return;
        }
        if write {
            trace!(node = id.index(), "write to field");
            return;
        }
        match &record.member {
            Some(MemberRef::Property(property)) => {
                if let Some(getter) = property.getter() {
                    self.check_access(ast, id, getter, diagnostics);
                }
            }
            Some(MemberRef::Method(method)) => self.check_access(ast, id, method, diagnostics),
            None => {}
        }
    }

    fn check_call(&self, ast: &Ast, id: NodeId, diagnostics: &mut Diagnostics) {
        if let Some(method) = self.table.get_symbol_record(id).and_then(resolved_method) {
            self.check_access(ast, id, method, diagnostics);
        }
    }

    fn check_access(&self, ast: &Ast, id: NodeId, method: &MethodInfo, diagnostics: &mut Diagnostics) {
        if is_callable(method, self.options.minimum_access) {
            return;
        }
        diagnostics.push(CheckError::UnsafeMethod {
            method: method.name.clone(),
            access: method.access.to_string(),
            span: ast.span(id),
        });
    }
}

fn resolved_method(record: &SemanticRecord) -> Option<&MethodInfo> {
    record.member.as_ref().and_then(MemberRef::as_method)
}

fn is_callable(method: &MethodInfo, minimum: Access) -> bool {
    method.access >= minimum || is_safe_method(&method.name)
}

/// Whether the link at `position` is written when its chain is.
fn written_link(ast: &Ast, links: &[NodeId], position: usize) -> bool {
    match links.len().checked_sub(position + 1) {
        Some(0) => true,
        Some(1) => matches!(ast.kind(links[position + 1]), NodeKind::Index),
        _ => false,
    }
}
