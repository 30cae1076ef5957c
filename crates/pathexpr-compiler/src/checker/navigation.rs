//! Navigation: chains, properties, indexing, projections and eval.

use tracing::{trace, warn};

use pathexpr_ast::{Ast, NodeId, NodeKind, ProjectionKind};
use pathexpr_core::{ArithmeticOp, MemberRef, TypeInfo};

use super::{TypeChecker, operators, variables};
use crate::reserved::is_navigation_word;
use crate::{CheckError, ScopeKind, SymbolKind};

// ============================================================================
// Chains
// ============================================================================

/// Resolve `a.b.c` left to right, each link against the previous link's type.
pub(super) fn check_chain(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let ast = c.ast;
    let nested = ast.parent(id).is_some_and(|p| ast.kind(p).is_chain());
    if !nested {
        c.unresolved.clear();
    }

    let links = ast.children(id);
    let mut path = c.scopes.current_path();
    let mut pushed = 0;
    let mut last = None;

    for (position, &link) in links.iter().enumerate() {
        if position > 0
            && let Some(word) = reserved_link(ast.kind(link))
        {
            c.error(CheckError::ReservedInPath {
                name: word.to_string(),
                span: c.span(link),
            });
        }

        last = c.visit(link);

        if position + 1 < links.len() {
            if let Some(segment) = segment(ast.kind(link)) {
                path = Some(join(path.as_deref(), &segment));
            }
            c.scopes
                .begin_scope(last.clone(), id, ScopeKind::FieldPath, path.clone());
            pushed += 1;
        }
    }
    for _ in 0..pushed {
        c.scopes.end_scope_if_necessary(id);
    }

    let result = if c.unresolved.is_empty() {
        if let Some(&tail) = links.last() {
            c.inherit_constant(id, tail);
        }
        last
    } else {
        resolve_residual(c, id, nested)
    };

    if !nested {
        c.unresolved.clear();
    }
    result
}

/// The chain ended with links that never resolved: try them as one
/// qualified type name.
fn resolve_residual(c: &mut TypeChecker<'_>, id: NodeId, nested: bool) -> Option<TypeInfo> {
    let joined = c.unresolved.join(".");
    if let Some(type_info) = c.provider().type_info(&joined) {
        trace!(name = %joined, "chain names a type");
        c.unresolved.clear();
        c.record(id, SymbolKind::Type, &joined, Some(type_info.clone()), None);
        return Some(type_info);
    }
    if nested {
        // The enclosing chain may still complete the name.
        return None;
    }
    if c.typed() {
        c.error(CheckError::UnresolvedElement {
            path: joined,
            span: c.span(id),
        });
    } else {
        trace!(path = %joined, "unresolved chain left for evaluation");
    }
    None
}

fn reserved_link(kind: &NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::RootVar => Some("root"),
        NodeKind::ThisVar => Some("this"),
        NodeKind::ThisField => Some("thisField"),
        NodeKind::LoginUser => Some("loginUser"),
        _ => None,
    }
}

/// The name a link contributes to the context path.
fn segment(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Property { name } | NodeKind::Method { name } | NodeKind::Variable { name } => {
            Some(name.clone())
        }
        NodeKind::StaticField { class_name, name } => Some(format!("{class_name}.{name}")),
        NodeKind::Projection { method } => Some(method.clone()),
        NodeKind::RootVar => Some("root".to_string()),
        NodeKind::ThisVar => Some("this".to_string()),
        _ => None,
    }
}

fn join(path: Option<&str>, segment: &str) -> String {
    match path {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}.{segment}"),
        _ => segment.to_string(),
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Resolve a name, first match wins:
/// field, type name (chain-leading only), variable, map key, deferred link,
/// untyped field.
pub(super) fn check_property(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    let ast = c.ast;
    let in_chain = ast.enclosing_chain(id).is_some();
    let previous = if in_chain {
        ast.previous_sibling(id)
    } else {
        None
    };
    let leading = previous.is_none();

    if in_chain && !c.unresolved.is_empty() {
        return defer(c, id, name);
    }

    if let Some(owner) = c.scopes.current_type().cloned()
        && let Some(property) = c.provider().field(&owner, name)
    {
        let type_info = property.type_info.clone();
        c.record(
            id,
            SymbolKind::Field,
            name,
            Some(type_info.clone()),
            Some(MemberRef::Property(property)),
        );
        return Some(type_info);
    }

    if !leading && is_navigation_word(name) {
        c.error(CheckError::ReservedInPath {
            name: name.to_string(),
            span: c.span(id),
        });
        return None;
    }

    if in_chain && leading && let Some(type_info) = c.provider().type_info(name) {
        c.record(id, SymbolKind::Type, name, Some(type_info.clone()), None);
        return Some(type_info);
    }

    if leading && c.variables.contains_key(name) {
        return variables::reference_variable(c, id, name);
    }

    if let Some(previous) = previous
        && let Some(map) = c.table.constant_of(previous)
        && matches!(ast.kind(map), NodeKind::Map)
    {
        return lookup_key(c, id, map, name);
    }

    if in_chain {
        if let Some(record) = previous.and_then(|p| c.table.get_symbol_record(p)) {
            if record.is_kind(SymbolKind::Variable) && record.type_info.is_none() {
                c.record(id, SymbolKind::Field, name, None, None);
                return None;
            }
            if record.is_kind(SymbolKind::Field)
                && let Some(owner) = &record.type_info
            {
                warn!(
                    field = record.name.as_deref().unwrap_or_default(),
                    owner = owner.name(),
                    member = name,
                    "unknown member after a resolved field"
                );
            }
        }
        return defer(c, id, name);
    }

    if c.typed() {
        // Same report as an unresolved chain when the scope has no type.
        let error = match c.scopes.current_type() {
            Some(owner) => CheckError::FieldLookup {
                name: name.to_string(),
                owner: owner.to_string(),
                span: c.span(id),
            },
            None => CheckError::UnresolvedElement {
                path: name.to_string(),
                span: c.span(id),
            },
        };
        c.error(error);
    } else {
        trace!(name = name, "untyped field");
    }
    c.record(id, SymbolKind::Field, name, None, None);
    None
}

/// Push `name` onto the unresolved accumulator. If the accumulated names now
/// spell a type, the link becomes that type and the accumulator restarts.
fn defer(c: &mut TypeChecker<'_>, id: NodeId, name: &str) -> Option<TypeInfo> {
    c.unresolved.push(name.to_string());
    let joined = c.unresolved.join(".");
    if let Some(type_info) = c.provider().type_info(&joined) {
        trace!(name = %joined, "qualified type name");
        c.unresolved.clear();
        c.record(id, SymbolKind::Type, &joined, Some(type_info.clone()), None);
        return Some(type_info);
    }
    trace!(link = name, pending = %joined, "deferring link");
    c.record(id, SymbolKind::Path, name, None, None);
    None
}

/// `{"a": 1}.a`: the type and constant of the matching map entry.
fn lookup_key(c: &mut TypeChecker<'_>, id: NodeId, map: NodeId, key: &str) -> Option<TypeInfo> {
    let value = c
        .key_overrides
        .get(&(map, key.to_string()))
        .copied()
        .or_else(|| map_entry(c.ast, map, key));
    c.key_links.insert(id, (map, key.to_string()));

    let type_info = value.and_then(|v| c.table.node_type(v).cloned());
    c.record(id, SymbolKind::Key, key, type_info.clone(), None);
    if let Some(value) = value {
        c.inherit_constant(id, value);
    }
    type_info
}

/// Value node of the entry whose constant key equals `key`.
fn map_entry(ast: &Ast, map: NodeId, key: &str) -> Option<NodeId> {
    ast.children(map).iter().find_map(|&entry| {
        let [key_node, value_node] = ast.children(entry) else {
            return None;
        };
        let literal = ast.kind(*key_node).literal()?;
        (literal.as_str() == Some(key)).then_some(*value_node)
    })
}

pub(super) fn check_static_field(
    c: &mut TypeChecker<'_>,
    id: NodeId,
    class_name: &str,
    name: &str,
) -> Option<TypeInfo> {
    let Some(owner) = c.resolve_type_name(id, class_name) else {
        c.record(id, SymbolKind::Field, name, None, None);
        return None;
    };
    match c.provider().field(&owner, name) {
        Some(property) => {
            let type_info = property.type_info.clone();
            c.record(
                id,
                SymbolKind::Field,
                name,
                Some(type_info.clone()),
                Some(MemberRef::Property(property)),
            );
            Some(type_info)
        }
        None => {
            if c.typed() {
                c.error(CheckError::FieldLookup {
                    name: name.to_string(),
                    owner: owner.to_string(),
                    span: c.span(id),
                });
            }
            c.record(id, SymbolKind::Field, name, None, None);
            None
        }
    }
}

// ============================================================================
// Indexing
// ============================================================================

/// `list[i]`: the element type, folded to the exact element for constant
/// list literals and constant indices.
pub(super) fn check_index(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let ast = c.ast;
    let container = c.scopes.current_type().cloned();
    let index = c.required_child(id, 0);

    let lexical = c.scopes.current_lexical_type().cloned();
    let path = c.scopes.current_lexical_path();
    c.with_scope(lexical, id, ScopeKind::Lexical, path, |c| c.visit(index));

    let container = container?;
    if !container.is_container() {
        if !container.is_any() && !container.is_null() {
            c.error(CheckError::NotAContainer {
                found: container.to_string(),
                span: c.span(id),
            });
        }
        return None;
    }

    let previous = ast
        .enclosing_chain(id)
        .and_then(|_| ast.previous_sibling(id));
    if let Some(previous) = previous
        && let Some(constant) = c.table.constant_of(previous)
        && let Some(literal) = c.table.constant_of(index).and_then(|n| ast.kind(n).literal())
    {
        let element = match ast.kind(constant) {
            NodeKind::List => literal
                .as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| ast.children(constant).get(i).copied()),
            NodeKind::Map => literal.as_str().and_then(|key| {
                c.key_overrides
                    .get(&(constant, key.to_string()))
                    .copied()
                    .or_else(|| map_entry(ast, constant, key))
            }),
            _ => None,
        };
        if let Some(element) = element {
            c.inherit_constant(id, element);
            return c.table.node_type(element).cloned();
        }
    }

    container.element_type().cloned()
}

// ============================================================================
// Projections
// ============================================================================

/// `link.{method: body}` with the body checked against the element type.
///
/// # Panics
///
/// If the projection is not a chain link.
pub(super) fn check_projection(c: &mut TypeChecker<'_>, id: NodeId, method: &str) -> Option<TypeInfo> {
    if c.ast.enclosing_chain(id).is_none() {
        panic!("internal error: projection {id} is not a chain link");
    }

    let container = c.scopes.current_type().cloned();
    let element = match &container {
        Some(t) if t.is_container() => t.element_type().cloned(),
        Some(t) if !t.is_any() && !t.is_null() => {
            c.error(CheckError::NotAContainer {
                found: t.to_string(),
                span: c.span(id),
            });
            None
        }
        _ => None,
    };

    let body = c.required_child(id, 0);
    let path = c.scopes.current_path();
    let body_type = c.with_scope(element.clone(), id, ScopeKind::Lexical, path, |c| c.visit(body));

    let Some(kind) = ProjectionKind::from_name(method) else {
        c.error(CheckError::UnknownProjection {
            method: method.to_string(),
            legal: ProjectionKind::legal_names(),
            span: c.span(id),
        });
        return None;
    };

    let provider = c.provider();
    let (symbol, result) = match kind {
        ProjectionKind::FindAll => (
            SymbolKind::ProjectionFindAll,
            element.map(|e| provider.container_of(e)),
        ),
        ProjectionKind::Find => (SymbolKind::ProjectionFind, element),
        ProjectionKind::Collect => (
            SymbolKind::ProjectionCollect,
            body_type.map(|b| provider.container_of(b)),
        ),
        ProjectionKind::Sum | ProjectionKind::Avg | ProjectionKind::Min | ProjectionKind::Max => {
            let result = operators::numeric_result(
                c,
                id,
                ArithmeticOp::Add,
                body_type.as_ref(),
                body_type.as_ref(),
                false,
            );
            (SymbolKind::ProjectionAggregate, result)
        }
    };
    c.record(id, symbol, method, result.clone(), None);
    result
}

// ============================================================================
// Eval
// ============================================================================

/// `context.(expression)`: the expression is checked against the context's type.
pub(super) fn check_eval(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let context = c.required_child(id, 0);
    let expression = c.required_child(id, 1);

    let context_type = c.visit(context);
    if context_type.is_none() && c.typed() {
        c.error(CheckError::NullContext { span: c.span(id) });
    }
    c.with_scope(context_type, id, ScopeKind::Lexical, None, |c| c.visit(expression))
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;
    use super::*;
    use pathexpr_ast::ExprNode as E;

    fn collect_price_times_qty() -> E {
        E::chain([
            E::property("items"),
            E::projection("collect", E::mul(E::property("price"), E::property("qty"))),
        ])
    }

    #[test]
    fn field_on_root() {
        let checked = check_order(E::property("total"));
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type(), Some(&double()));
        let record = checked.table.get_symbol_record(checked.ast.root()).unwrap();
        assert!(record.is_kind(SymbolKind::Field));
        assert!(matches!(record.member, Some(MemberRef::Property(_))));
    }

    #[test]
    fn chain_resolves_left_to_right() {
        let checked = check_order(E::chain([E::property("customer"), E::property("name")]));
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type(), Some(&TypeInfo::string()));

        let customer = checked.table.get_symbol_record(checked.named("customer")).unwrap();
        assert_eq!(customer.context, None);
        let name = checked.table.get_symbol_record(checked.named("name")).unwrap();
        assert_eq!(name.context.as_deref(), Some("customer"));
        assert_eq!(checked.table.records_for_context("customer").unwrap().len(), 1);
    }

    #[test]
    fn collect_projection() {
        let checked = check_order(collect_price_times_qty());
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type().map(TypeInfo::name), Some("List<double>"));

        let projection = checked.named("collect");
        let record = checked.table.get_symbol_record(projection).unwrap();
        assert!(record.is_kind(SymbolKind::ProjectionCollect));
        assert_eq!(record.context.as_deref(), Some("items"));
        assert_eq!(record.extended_field_path, None);

        let price = checked.table.get_symbol_record(checked.named("price")).unwrap();
        assert_eq!(price.context.as_deref(), Some("items"));
        assert_eq!(price.extended_field_path, Some(projection));
        assert_eq!(price.type_info, Some(double()));
    }

    #[test]
    fn projection_result_types() {
        let over_items = |method: &str, body: E| E::chain([E::property("items"), E::projection(method, body)]);

        let sum = check_order(over_items("sum", E::property("price")));
        assert!(sum.diagnostics.is_empty());
        assert_eq!(sum.root_type(), Some(&double()));

        let filter = E::gt(E::property("price"), E::int(10));
        let find_all = check_order(over_items("findAll", filter.clone()));
        assert!(find_all.diagnostics.is_empty());
        assert_eq!(find_all.root_type().map(TypeInfo::name), Some("List<LineItem>"));

        let find = check_order(over_items("find", filter));
        assert_eq!(find.root_type().map(TypeInfo::name), Some("LineItem"));

        let max = check_order(over_items("max", E::property("qty")));
        assert_eq!(max.root_type(), Some(&int()));
    }

    #[test]
    fn unknown_projection_lists_legal_names() {
        let checked = check_order(E::chain([
            E::property("items"),
            E::projection("bogus", E::property("price")),
        ]));
        assert_eq!(checked.diagnostics.len(), 1);
        assert!(checked.has_error("unknown projection 'bogus'"));
        assert!(checked.has_error("findAll, find, collect, sum, avg, min, max"));
    }

    #[test]
    fn projection_over_scalar() {
        let checked = check_order(E::chain([
            E::property("total"),
            E::projection("collect", E::property("qty")),
        ]));
        assert_eq!(checked.diagnostics.len(), 2);
        assert!(checked.has_error("'double' is not a container type"));
        assert!(checked.has_error("element cannot be resolved: 'qty'"));
    }

    #[test]
    fn projection_over_untyped_list() {
        // [1, "a"] has no common element type.
        let list = || E::list([E::int(1), E::string("a")]);

        let single = check_order(E::chain([list(), E::projection("collect", E::property("a"))]));
        assert_eq!(single.diagnostics.len(), 1);
        assert!(single.has_error("element cannot be resolved: 'a'"));

        let chained = check_order(E::chain([
            list(),
            E::projection("collect", E::chain([E::property("a"), E::property("b")])),
        ]));
        assert_eq!(chained.diagnostics.len(), 1);
        assert!(chained.has_error("element cannot be resolved: 'a.b'"));

        let untyped = check_untyped(E::chain([list(), E::projection("collect", E::property("a"))]));
        assert!(untyped.diagnostics.is_empty());
    }

    #[test]
    fn standalone_type_name_is_a_field_lookup() {
        let checked = check_order(E::property("Customer"));
        assert_eq!(checked.diagnostics.len(), 1);
        assert!(checked.has_error("cannot lookup type for field 'Customer' on 'Order'"));
        assert!(checked.root_type().is_none());

        let leading = check_order(E::chain([E::property("Customer"), E::property("name")]));
        let record = leading.table.get_symbol_record(leading.named("Customer")).unwrap();
        assert!(record.is_kind(SymbolKind::Type));
    }

    #[test]
    #[should_panic(expected = "is not a chain link")]
    fn projection_outside_chain_panics() {
        check_order(E::projection("collect", E::property("price")));
    }

    #[test]
    fn unknown_field_typed_and_untyped() {
        let typed = check_order(E::property("bogusField"));
        assert_eq!(typed.diagnostics.len(), 1);
        assert!(typed.has_error("cannot lookup type for field 'bogusField' on 'Order'"));

        let untyped = check_untyped(E::property("bogusField"));
        assert!(untyped.diagnostics.is_empty());
        assert!(untyped.root_type().is_none());
        let record = untyped.table.get_symbol_record(untyped.ast.root()).unwrap();
        assert!(record.is_kind(SymbolKind::Field));
    }

    #[test]
    fn unresolved_chain() {
        let chain = E::chain([E::property("bogus"), E::property("total")]);
        let typed = check_order(chain.clone());
        assert_eq!(typed.diagnostics.len(), 1);
        assert!(typed.has_error("element cannot be resolved: 'bogus.total'"));
        assert!(
            typed
                .table
                .get_symbol_record(typed.named("bogus"))
                .unwrap()
                .is_kind(SymbolKind::Path)
        );

        let untyped = check_untyped(chain);
        assert!(untyped.diagnostics.is_empty());
        assert!(untyped.root_type().is_none());
    }

    #[test]
    fn unknown_member_after_field() {
        let checked = check_order(E::chain([E::property("customer"), E::property("bogus")]));
        assert_eq!(checked.diagnostics.len(), 1);
        assert!(checked.has_error("element cannot be resolved: 'bogus'"));
    }

    #[test]
    fn qualified_type_name_in_chain() {
        let checked = check_order(E::path("com.acme.Money.ZERO"));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type().map(TypeInfo::name), Some(MONEY));

        let money = checked.table.get_symbol_record(checked.named("Money")).unwrap();
        assert!(money.is_kind(SymbolKind::Type));
        assert_eq!(money.name.as_deref(), Some(MONEY));
        let zero = checked.table.get_symbol_record(checked.named("ZERO")).unwrap();
        assert!(zero.is_kind(SymbolKind::Field));
        assert_eq!(checked.table.get_symbol_records(SymbolKind::Path).unwrap().len(), 2);
    }

    #[test]
    fn static_field_node() {
        let checked = check_order(E::static_field(MONEY, "ZERO"));
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type().map(TypeInfo::name), Some(MONEY));

        let unknown = check_order(E::static_field("Nope", "ZERO"));
        assert!(unknown.has_error("cannot resolve type 'Nope'"));
    }

    #[test]
    fn reserved_word_mid_chain() {
        let this = check_order(E::chain([E::property("customer"), E::this_var()]));
        assert_eq!(this.diagnostics.len(), 1);
        assert!(this.has_error("'this' is only allowed at the start of a path"));

        let root = check_order(E::chain([E::property("customer"), E::property("root")]));
        assert!(root.has_error("'root' is only allowed at the start of a path"));
    }

    #[test]
    fn map_key_folding() {
        let map = || E::map([E::entry("a", E::int(1)), E::entry("b", E::string("x"))]);

        let a = check_order(E::chain([map(), E::property("a")]));
        assert!(a.diagnostics.is_empty(), "{}", a.diagnostics);
        assert_eq!(a.root_type(), Some(&int()));
        let one = a.ast.ids().find(|&id| a.ast.kind(id).literal().and_then(|l| l.as_integer()) == Some(1));
        assert_eq!(a.table.constant_of(a.ast.root()), one);
        assert!(
            a.table
                .get_symbol_record(a.named("a"))
                .unwrap()
                .is_kind(SymbolKind::Key)
        );

        let b = check_order(E::chain([map(), E::property("b")]));
        assert_eq!(b.root_type(), Some(&TypeInfo::string()));

        let missing = check_order(E::chain([map(), E::property("c")]));
        assert!(missing.diagnostics.is_empty());
        assert!(missing.root_type().is_none());
    }

    #[test]
    fn constant_list_index_folds() {
        // ["a", 1][1]
        let checked = check_order(E::chain([
            E::list([E::string("a"), E::int(1)]),
            E::index(E::int(1)),
        ]));
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type(), Some(&int()));
        assert_eq!(checked.table.constant_of(checked.ast.root()), Some(NodeId(3)));
    }

    #[test]
    fn index_uses_element_type() {
        let checked = check_order(E::chain([
            E::property("items"),
            E::index(E::int(0)),
            E::property("price"),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type(), Some(&double()));

        let scalar = check_order(E::chain([E::property("total"), E::index(E::int(0))]));
        assert!(scalar.has_error("'double' is not a container type"));
    }

    #[test]
    fn eval_switches_context() {
        let checked = check_order(E::eval(E::property("customer"), E::property("name")));
        assert!(checked.diagnostics.is_empty());
        assert_eq!(checked.root_type(), Some(&TypeInfo::string()));

        let broken = check_order(E::eval(E::property("bogus"), E::property("name")));
        assert!(broken.has_error("type info for context object is null"));
        assert!(check_untyped(E::eval(E::property("bogus"), E::property("name"))).diagnostics.is_empty());
    }

    #[test]
    fn nested_projection_in_method_argument() {
        // items.{collect: isNull(root.items.{find: qty > 1})}
        let inner = E::chain([
            E::root_var(),
            E::property("items"),
            E::projection("find", E::gt(E::property("qty"), E::int(1))),
        ]);
        let checked = check_order(E::chain([
            E::property("items"),
            E::projection("collect", E::method("isNull", [inner])),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        assert_eq!(checked.root_type().map(TypeInfo::name), Some("List<bool>"));

        let find = checked.named("find");
        assert_eq!(checked.type_of(find).map(TypeInfo::name), Some("LineItem"));
    }
}
