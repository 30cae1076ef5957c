//! Members every host gets for free on strings and containers.

use pathexpr_core::{MethodInfo, PrimitiveKind, TypeInfo};

/// Built-in method on a well-known type, if one matches.
pub(crate) fn builtin_method(owner: &TypeInfo, name: &str, args: &[TypeInfo]) -> Option<MethodInfo> {
    let int = || TypeInfo::primitive(PrimitiveKind::Int);
    let (params, ret) = match (name, args.len()) {
        ("size", 0) if owner.is_container() => (vec![], int()),
        ("isEmpty", 0) if owner.is_container() || owner.is_string() => (vec![], TypeInfo::boolean()),
        ("contains", 1) if owner.is_container() && !owner.is_map() => {
            (vec![TypeInfo::any()], TypeInfo::boolean())
        }
        ("containsKey", 1) if owner.is_map() => (vec![TypeInfo::any()], TypeInfo::boolean()),
        ("length", 0) if owner.is_string() => (vec![], int()),
        ("toUpperCase" | "toLowerCase" | "trim", 0) if owner.is_string() => (vec![], TypeInfo::string()),
        _ => return None,
    };
    Some(MethodInfo::new(owner.base_hash(), name, params, Some(ret)))
}
