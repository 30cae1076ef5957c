//! Variables, reserved references and assignment.

use pathexpr_ast::{Ast, NodeId, NodeKind};
use pathexpr_core::{MemberRef, TypeInfo};

use super::{TypeChecker, VariableState};
use crate::reserved::NON_ASSIGNABLE;
use crate::{CheckError, SymbolKind};

/// State of `name`, registering the variable on first sight.
fn track<'c>(c: &'c mut TypeChecker<'_>, name: &str, id: NodeId) -> &'c mut VariableState {
    if !c.variables.contains_key(name) {
        c.variable_order.push(name.to_string());
    }
    let state = c.variables.entry(name.to_string()).or_default();
    state.nodes.push(id);
    state
}

/// A reference to `name`: the latest tracked type and constant.
pub(super) fn reference_variable(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    let state = track(c, name, id);
    let (type_info, constant) = (state.type_info.clone(), state.constant);
    c.record(id, SymbolKind::Variable, name, type_info.clone(), None);
    if let Some(constant) = constant {
        c.table.set_constant(id, constant);
    }
    type_info
}

pub(super) fn check_variable(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    reference_variable(c, id, name)
}

/// Declarations are untyped until assigned.
pub(super) fn check_var_decl(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    track(c, name, id);
    c.record(id, SymbolKind::Variable, name, None, None);
    None
}

// ============================================================================
// Reserved references
// ============================================================================

pub(super) fn check_root_var(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let type_info = c.root_type.clone();
    c.record(id, SymbolKind::This, "root", type_info.clone(), None);
    type_info
}

pub(super) fn check_this_var(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let type_info = c.scopes.current_type().cloned();
    c.record(id, SymbolKind::This, "this", type_info.clone(), None);
    type_info
}

/// The configured field, looked up on the root type rather than the scope.
pub(super) fn check_this_field(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let options = c.options;
    let Some(name) = options.this_field.as_deref() else {
        c.error(CheckError::ThisFieldNotAllowed { span: c.span(id) });
        return None;
    };
    let Some(root) = c.root_type.clone() else {
        c.record(id, SymbolKind::ThisField, name, None, None);
        return None;
    };
    match c.provider().field(&root, name) {
        Some(property) => {
            let type_info = property.type_info.clone();
            c.record(
                id,
                SymbolKind::ThisField,
                name,
                Some(type_info.clone()),
                Some(MemberRef::Property(property)),
            );
            Some(type_info)
        }
        None => {
            c.error(CheckError::FieldLookup {
                name: name.to_string(),
                owner: root.to_string(),
                span: c.span(id),
            });
            c.record(id, SymbolKind::ThisField, name, None, None);
            None
        }
    }
}

/// The host's login user type, or null when none is configured.
pub(super) fn check_login_user(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let env = c.env;
    match env.login_user_type() {
        Some(name) => c.resolve_type_name(id, name),
        None => Some(TypeInfo::null()),
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// `target = value`. Updates variable types and constant associations and
/// marks the written nodes.
pub(super) fn check_assign(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let ast = c.ast;
    let target = c.required_child(id, 0);
    let value = c.required_child(id, 1);

    c.visit(target);
    let value_type = c.visit(value);

    if let Some(name) = reserved_target(ast.kind(target)) {
        c.error(CheckError::ReservedAssignment {
            name: name.to_string(),
            span: c.span(target),
        });
    }
    if value_type.is_none() && c.typed() {
        c.error(CheckError::UnresolvedExpression {
            what: "assigned value".to_string(),
            span: c.span(value),
        });
    }

    let constant = c.table.constant_of(value);
    let variable = match ast.kind(target) {
        NodeKind::Variable { name } | NodeKind::VarDecl { name } => Some(name),
        NodeKind::Property { name } if c.kind_of(target) == Some(SymbolKind::Variable) => Some(name),
        _ => None,
    };
    if let Some(name) = variable
        && let Some(state) = c.variables.get_mut(name.as_str())
    {
        if value_type.is_some() {
            state.type_info = value_type.clone();
        }
        state.constant = constant;
    }

    let written = written_link(ast, target);
    for node in [target, written] {
        match constant {
            Some(constant) => c.table.set_constant(node, constant),
            None => c.table.clear_constant(node),
        }
    }
    if let Some((map, key)) = c.key_links.get(&written).cloned() {
        c.key_overrides.insert((map, key), value);
    }

    c.table.mark_write_target(target);
    c.table.mark_write_target(written);
    if matches!(ast.kind(written), NodeKind::Index)
        && let Some(indexed) = ast.previous_sibling(written)
    {
        c.table.mark_write_target(indexed);
    }

    value_type
}

fn reserved_target(kind: &NodeKind) -> Option<&str> {
    match kind {
        NodeKind::RootVar => Some("root"),
        NodeKind::ThisVar => Some("this"),
        NodeKind::ThisField => Some("thisField"),
        NodeKind::LoginUser => Some("loginUser"),
        NodeKind::Variable { name } | NodeKind::VarDecl { name } | NodeKind::Property { name }
            if NON_ASSIGNABLE.contains(&name.as_str()) =>
        {
            Some(name.as_str())
        }
        _ => None,
    }
}

/// The node actually written: the last link of a chain, else the target.
fn written_link(ast: &Ast, target: NodeId) -> NodeId {
    match ast.kind(target) {
        NodeKind::Chain => ast.children(target).last().copied().unwrap_or(target),
        _ => target,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;
    use super::*;
    use crate::{CheckOptions, Environment};
    use pathexpr_ast::ExprNode as E;

    #[test]
    fn assignment_types_the_variable() {
        let checked = check_order(E::sequence([
            E::assign(E::var_decl("v"), E::property("total")),
            E::var("v"),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type(), Some(&double()));
        let record = checked.table.get_symbol_record(checked.named("v")).unwrap();
        assert!(record.is_kind(SymbolKind::Variable));
    }

    #[test]
    fn latest_write_wins() {
        let checked = check_order(E::sequence([
            E::assign(E::var_decl("v"), E::property("total")),
            E::assign(E::var("v"), E::property("notes")),
            E::var("v"),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type(), Some(&TypeInfo::string()));
    }

    #[test]
    fn reserved_names_are_not_assignable() {
        let this = check_order(E::assign(E::this_var(), E::int(1)));
        assert_eq!(this.diagnostics.len(), 1);
        assert!(this.has_error("cannot assign to reserved variable 'this'"));

        let named = check_order(E::assign(E::var("thisField"), E::int(1)));
        assert!(named.has_error("cannot assign to reserved variable 'thisField'"));
    }

    #[test]
    fn unresolved_assigned_value() {
        let checked = check_order(E::assign(E::var_decl("v"), E::method("broken", [])));
        assert!(checked.has_error("cannot resolve type of assigned value"));
        assert!(checked.has_error("cannot resolve type for variable 'v'"));
    }

    #[test]
    fn this_field() {
        let options = CheckOptions::new().root_type("Order").this_field("total");
        let checked = check_with(&options, E::this_field());
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type(), Some(&double()));
        let record = checked.table.get_symbol_record(checked.ast.root()).unwrap();
        assert!(record.is_kind(SymbolKind::ThisField));
        assert_eq!(record.name.as_deref(), Some("total"));

        let disallowed = check_order(E::this_field());
        assert!(disallowed.has_error("thisField not allowed in this expression"));

        let missing = check_with(&CheckOptions::new().root_type("Order").this_field("nope"), E::this_field());
        assert!(missing.has_error("cannot lookup type for field 'nope' on 'Order'"));
    }

    #[test]
    fn this_and_root_inside_projection() {
        let this = check_order(E::chain([
            E::property("items"),
            E::projection("collect", E::this_var()),
        ]));
        assert!(this.diagnostics.is_empty(), "{}", this.diagnostics);
        assert_eq!(this.root_type().map(TypeInfo::name), Some("List<LineItem>"));

        let root = check_order(E::chain([
            E::property("items"),
            E::projection("collect", E::chain([E::root_var(), E::property("total")])),
        ]));
        assert!(root.diagnostics.is_empty(), "{}", root.diagnostics);
        assert_eq!(root.root_type().map(TypeInfo::name), Some("List<double>"));
    }

    #[test]
    fn login_user() {
        let registry = shop();
        let env = Environment::new(&registry).with_login_user_type("Customer");
        let options = CheckOptions::new().root_type("Order");
        let checked = check_env(&env, &options, E::chain([E::login_user(), E::property("name")]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type(), Some(&TypeInfo::string()));

        let anonymous = check_order(E::login_user());
        assert_eq!(anonymous.root_type(), Some(&TypeInfo::null()));
    }

    #[test]
    fn reassigned_map_key_changes_type() {
        let key = || E::chain([E::var("m"), E::property("a")]);
        let checked = check_order(E::sequence([
            E::assign(E::var_decl("m"), E::map([E::entry("a", E::int(1))])),
            E::assign(key(), E::string("x")),
            key(),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type(), Some(&TypeInfo::string()));

        let written = checked.named("a");
        assert!(checked.table.is_write_target(written));
        assert!(checked.table.is_write_target(checked.ast.parent(written).unwrap()));
    }

    #[test]
    fn reassignment_drops_the_old_constant() {
        let checked = check_order(E::sequence([
            E::assign(E::var_decl("m"), E::map([E::entry("a", E::int(1))])),
            E::assign(E::var("m"), E::property("customer")),
            E::chain([E::var("m"), E::property("a")]),
        ]));
        assert_eq!(checked.diagnostics.len(), 1);
        assert!(checked.has_error("element cannot be resolved: 'a'"));
        assert!(checked.root_type().is_none());

        let name = check_order(E::sequence([
            E::assign(E::var_decl("m"), E::map([E::entry("a", E::int(1))])),
            E::assign(E::var("m"), E::property("customer")),
            E::chain([E::var("m"), E::property("name")]),
        ]));
        assert!(name.diagnostics.is_empty(), "{}", name.diagnostics);
        assert_eq!(name.root_type(), Some(&TypeInfo::string()));
    }

    #[test]
    fn indexed_assignment_marks_the_container() {
        let checked = check_order(E::assign(
            E::chain([E::property("items"), E::index(E::int(0))]),
            E::null(),
        ));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        let items = checked.named("items");
        assert!(checked.table.is_write_target(items));
        let index = checked.ast.children(checked.ast.parent(items).unwrap())[1];
        assert!(checked.table.is_write_target(index));
        assert!(!checked.table.is_write_target(checked.ast.children(index)[0]));
    }
}
