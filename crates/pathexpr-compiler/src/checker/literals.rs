//! Constants and collection literals.
//!
//! Literal nodes are their own constant: later links can fold through them
//! (`{"a": 1}.a`, `[1, 2][0]`).

use pathexpr_ast::NodeId;
use pathexpr_core::TypeInfo;

use super::TypeChecker;

pub(super) fn check_const(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let type_info = c.ast.kind(id).literal()?.type_info();
    c.table.set_constant(id, id);
    Some(type_info)
}

/// `List<T>` for the common element type, or the generic list when the
/// elements disagree or are unknown.
pub(super) fn check_list(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let elements = c.visit_children(id);
    c.table.set_constant(id, id);

    let provider = c.provider();
    let mut common: Option<TypeInfo> = None;
    for element in &elements {
        let Some(t) = element else {
            return Some(TypeInfo::list());
        };
        if t.is_null() {
            continue;
        }
        common = match common {
            None => Some(t.clone()),
            Some(current) if provider.is_compatible(t, &current) => Some(current),
            Some(current) if provider.is_compatible(&current, t) => Some(t.clone()),
            Some(_) => return Some(TypeInfo::list()),
        };
    }
    Some(common.map_or_else(TypeInfo::list, |t| provider.container_of(t)))
}

pub(super) fn check_map(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    c.visit_children(id);
    c.table.set_constant(id, id);
    Some(TypeInfo::map())
}

/// The value's type; an empty pair is `void`.
pub(super) fn check_key_value(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    if c.ast.children(id).is_empty() {
        return Some(TypeInfo::void());
    }
    let value = c.required_child(id, 1);
    let types = c.visit_children(id);
    c.inherit_constant(id, value);
    types.into_iter().nth(1).flatten()
}
