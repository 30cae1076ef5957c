//! Method calls, static calls and constructors.

use tracing::trace;

use pathexpr_ast::NodeId;
use pathexpr_core::{MemberRef, MethodInfo, TypeInfo};

use super::TypeChecker;
use crate::reserved::helper_method;
use crate::{CheckError, ScopeKind, SymbolKind};

/// Check call arguments against the enclosing lexical type.
///
/// Returns the argument types, or `None` if any argument did not resolve.
fn check_arguments(c: &mut TypeChecker<'_>, id: NodeId, method: &str) -> Option<Vec<TypeInfo>> {
    let lexical = c.scopes.current_lexical_type().cloned();
    let path = c.scopes.current_lexical_path();
    let types = c.with_scope(lexical, id, ScopeKind::Lexical, path, |c| c.visit_children(id));

    let mut resolved = Vec::with_capacity(types.len());
    let mut complete = true;
    for (position, type_info) in types.into_iter().enumerate() {
        match type_info {
            Some(t) => resolved.push(t),
            None => {
                complete = false;
                if c.typed() {
                    c.error(CheckError::UnresolvedParameter {
                        method: method.to_string(),
                        position: position + 1,
                        span: c.span(c.ast.children(id)[position]),
                    });
                }
            }
        }
    }
    complete.then_some(resolved)
}

/// `receiver.name(args)` or a standalone `name(args)`.
pub(super) fn check_method(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    let ast = c.ast;
    let receiver = c.scopes.current_type().cloned();
    let pending = !c.unresolved.is_empty();
    let previous = ast
        .enclosing_chain(id)
        .and_then(|_| ast.previous_sibling(id));
    let static_only = previous.is_some_and(|p| c.kind_of(p) == Some(SymbolKind::Type));

    let Some(args) = check_arguments(c, id, name) else {
        c.record(id, SymbolKind::Method, name, None, None);
        return None;
    };

    let Some(owner) = receiver.filter(|_| !pending) else {
        // The chain reports the receiver if it stays unresolved.
        trace!(method = name, "method on unresolved receiver");
        c.record(id, SymbolKind::Method, name, None, None);
        return None;
    };
    resolve_call(c, id, &owner, name, &args, static_only)
}

/// `Class.name(args)`.
pub(super) fn check_static_method(
    c: &mut TypeChecker<'_>,
    id: NodeId,
    class_name: &str,
    name: &str,
) -> Option<TypeInfo> {
    let owner = c.resolve_type_name(id, class_name);
    let args = check_arguments(c, id, name);
    match (owner, args) {
        (Some(owner), Some(args)) => resolve_call(c, id, &owner, name, &args, true),
        _ => {
            c.record(id, SymbolKind::Method, name, None, None);
            None
        }
    }
}

/// `new Class(args)`: the class itself.
pub(super) fn check_constructor(c: &mut TypeChecker<'_>, id: NodeId, class_name: &str) -> Option<TypeInfo> {
    let owner = c.resolve_type_name(id, class_name);
    check_arguments(c, id, class_name);
    c.record(id, SymbolKind::Type, class_name, owner.clone(), None);
    owner
}

/// Find the overload for a call on `owner` and record it.
///
/// Lookup order: the owner's own methods, then the reserved helpers hosted by
/// the utility type.
fn resolve_call(
    c: &mut TypeChecker<'_>,
    id: NodeId,
    owner: &TypeInfo,
    name: &str,
    args: &[TypeInfo],
    static_only: bool,
) -> Option<TypeInfo> {
    let provider = c.provider();

    let found = match provider.method(owner, name, args, static_only) {
        Some(method) => Some(method),
        None if static_only && provider.method(owner, name, args, false).is_some() => {
            c.error(CheckError::NonStaticFromClass {
                owner: owner.to_string(),
                method: name.to_string(),
                span: c.span(id),
            });
            c.record(id, SymbolKind::Method, name, None, None);
            return None;
        }
        None => helper(c, name, args),
    };

    let Some(method) = found else {
        if c.typed() {
            c.error(CheckError::MethodNotFound {
                owner: owner.to_string(),
                method: name.to_string(),
                args: signature(args),
                span: c.span(id),
            });
        } else {
            trace!(owner = owner.name(), method = name, "late-bound method");
        }
        c.record(id, SymbolKind::Method, name, None, None);
        return None;
    };

    let return_type = method.return_type.clone();
    if return_type.is_none() {
        c.error(CheckError::MissingReturnType {
            method: name.to_string(),
            span: c.span(id),
        });
    }
    c.record(
        id,
        SymbolKind::Method,
        name,
        return_type.clone(),
        Some(MemberRef::Method(method)),
    );
    return_type
}

/// A reserved helper such as `isNull(x)`, as a static call on the utility type.
fn helper(c: &TypeChecker<'_>, name: &str, args: &[TypeInfo]) -> Option<MethodInfo> {
    let target = helper_method(name)?;
    let provider = c.provider();
    let utility = provider.type_info(c.env.utility_type())?;
    provider.method(&utility, target, args, true)
}

fn signature(args: &[TypeInfo]) -> String {
    args.iter()
        .map(TypeInfo::name)
        .collect::<Vec<_>>()
        .join(", ")
}
