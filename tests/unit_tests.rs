//! End-to-end tests: lower an expression, compile it against the shared
//! `Order` model and inspect the result.

mod common;

use common::{compile_order, compile_untyped, compile_with, type_name};
use pathexpr::prelude::*;
use pathexpr::{CheckError, NodeKind, SymbolKind};

type E = ExprNode;

// =============================================================================
// Sample scenario
// =============================================================================

#[test]
fn collect_over_line_items() {
    let result = compile_order(E::chain([
        E::property("items"),
        E::projection("collect", E::mul(E::property("price"), E::property("qty"))),
    ]));
    assert!(result.is_success(), "{}", result.diagnostics);
    assert_eq!(type_name(&result).as_deref(), Some("List<double>"));

    let fields: Vec<_> = result
        .expression
        .fields()
        .iter()
        .filter_map(|r| r.name.clone())
        .collect();
    assert_eq!(fields, ["items", "price", "qty"]);
}

#[test]
fn sum_over_line_items() {
    let result = compile_order(E::chain([E::property("items"), E::projection("sum", E::property("price"))]));
    assert!(result.is_success(), "{}", result.diagnostics);
    assert_eq!(type_name(&result).as_deref(), Some("double"));
}

#[test]
fn unknown_field_with_and_without_root_type() {
    let typed = compile_order(E::property("bogusField"));
    assert_eq!(typed.diagnostics.len(), 1);
    assert!(typed.diagnostics.contains("cannot lookup type for field"));

    let untyped = compile_untyped(E::property("bogusField"));
    assert!(untyped.is_success());
    assert!(untyped.expression.root_type().is_none());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn checking_is_deterministic() {
    let expr = || {
        E::sequence([
            E::add(E::property("label"), E::property("nope")),
            E::method("missing", [E::property("total")]),
            E::chain([E::property("items"), E::projection("bogus", E::property("price"))]),
        ])
    };
    let first = compile_order(expr());
    let second = compile_order(expr());
    assert_eq!(first.diagnostics, second.diagnostics);
    let records = |r: &CompilationResult| r.expression.table().records().cloned().collect::<Vec<_>>();
    assert_eq!(records(&first), records(&second));
}

#[test]
fn errors_accumulate() {
    let result = compile_order(E::sequence([
        E::property("nope"),
        E::sub(E::property("label"), E::int(1)),
        E::cast("String", E::int(1)),
        E::method("discount", [E::property("customer")]),
    ]));
    assert!(result.diagnostics.len() >= 4, "{}", result.diagnostics);
}

#[test]
fn untyped_mode_is_lenient() {
    let result = compile_untyped(E::sequence([
        E::property("anything"),
        E::method("whatever", [E::int(1)]),
        E::chain([E::property("a"), E::property("b"), E::method("c", [])]),
        E::var("undeclared"),
    ]));
    assert!(result.is_success(), "{}", result.diagnostics);
    assert!(result.expression.root_type().is_none());
}

#[test]
fn addition_falls_back_to_string() {
    let customers = || E::property("customer");
    let add = compile_order(E::add(customers(), customers()));
    assert!(add.is_success(), "{}", add.diagnostics);
    assert_eq!(type_name(&add).as_deref(), Some("String"));

    let sub = compile_order(E::sub(customers(), customers()));
    assert_eq!(sub.diagnostics.len(), 1);
}

#[test]
fn numeric_widening_is_order_independent() {
    let int_int = compile_order(E::add(E::property("count"), E::int(1)));
    assert_eq!(type_name(&int_int).as_deref(), Some("int"));

    let int_double = compile_order(E::add(E::property("count"), E::property("total")));
    let double_int = compile_order(E::add(E::property("total"), E::property("count")));
    assert_eq!(type_name(&int_double).as_deref(), Some("double"));
    assert_eq!(type_name(&double_int).as_deref(), Some("double"));
}

#[test]
fn projection_typing() {
    let over_items = |method: &str, body: E| {
        compile_order(E::chain([E::property("items"), E::projection(method, body)]))
    };
    let filter = || E::gt(E::property("price"), E::int(10));

    assert_eq!(type_name(&over_items("findAll", filter())).as_deref(), Some("List<LineItem>"));
    assert_eq!(type_name(&over_items("find", filter())).as_deref(), Some("LineItem"));
    assert_eq!(type_name(&over_items("collect", E::property("qty"))).as_deref(), Some("List<int>"));
    assert_eq!(type_name(&over_items("sum", E::property("qty"))).as_deref(), Some("int"));
}

#[test]
fn constant_map_keys_fold() {
    let map = || E::map([E::entry("a", E::int(1)), E::entry("b", E::string("two"))]);

    let a = compile_order(E::chain([map(), E::property("a")]));
    assert!(a.is_success(), "{}", a.diagnostics);
    assert_eq!(type_name(&a).as_deref(), Some("int"));
    let root = a.expression.ast().root();
    let constant = a.expression.table().constant_of(root).unwrap();
    assert!(matches!(a.expression.ast().kind(constant), NodeKind::Const(_)));

    let b = compile_order(E::chain([map(), E::property("b")]));
    assert_eq!(type_name(&b).as_deref(), Some("String"));
}

#[test]
fn invalid_cast_still_types_the_node() {
    let result = compile_order(E::cast("String", E::property("count")));
    let casts = result
        .diagnostics
        .iter()
        .filter(|e| matches!(e, CheckError::InvalidCast { .. }))
        .count();
    assert_eq!(casts, 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(type_name(&result).as_deref(), Some("String"));
}

#[test]
fn nested_projections_keep_lexical_types() {
    // items.{collect: price + isNull(root.items.{findAll: qty > 1})}
    let inner = E::chain([
        E::root_var(),
        E::property("items"),
        E::projection("findAll", E::gt(E::property("qty"), E::int(1))),
    ]);
    let result = compile_order(E::chain([
        E::property("items"),
        E::projection(
            "collect",
            E::add(E::property("price"), E::method("isNull", [inner])),
        ),
    ]));
    assert!(result.is_success(), "{}", result.diagnostics);
    assert_eq!(type_name(&result).as_deref(), Some("List<String>"));
}

// =============================================================================
// Host integration
// =============================================================================

#[test]
fn inherited_fields_resolve() {
    let options = CheckOptions::new().root_type("RushOrder");
    let result = compile_with(&options, E::add(E::property("total"), E::property("deadline")));
    assert!(result.is_success(), "{}", result.diagnostics);
    assert_eq!(type_name(&result).as_deref(), Some("double"));
}

#[test]
fn custom_arithmetic() {
    let cost = || E::chain([E::property("items"), E::index(E::int(0)), E::property("cost")]);
    let add = compile_order(E::add(cost(), cost()));
    assert!(add.is_success(), "{}", add.diagnostics);
    assert_eq!(type_name(&add).as_deref(), Some("Money"));

    let div = compile_order(E::div(cost(), cost()));
    assert!(div.diagnostics.contains("cannot resolve type of 'Money / Money'"));
}

#[test]
fn expected_type() {
    let ok = compile_with(
        &CheckOptions::new().root_type("Order").expected_type("double"),
        E::property("count"),
    );
    assert!(ok.is_success(), "{}", ok.diagnostics);

    let mismatch = compile_with(
        &CheckOptions::new().root_type("Order").expected_type("Customer"),
        E::property("total"),
    );
    assert!(mismatch.diagnostics.contains("does not match expected type 'Customer'"));
}

#[test]
fn this_field_rules() {
    let options = CheckOptions::new().root_type("Order").this_field("total");
    let result = compile_with(&options, E::gt(E::this_field(), E::int(0)));
    assert!(result.is_success(), "{}", result.diagnostics);
    let this_field = result
        .expression
        .table()
        .symbol_by_name("total", SymbolKind::ThisField)
        .expect("thisField record");
    assert_eq!(this_field.type_info.as_ref().map(TypeInfo::name), Some("double"));
}

#[test]
fn into_result_and_error_wrapping() {
    fn run() -> Result<CompiledExpression, PathExprError> {
        Ok(compile_order(E::property("missing")).into_result()?)
    }
    let error = run().unwrap_err();
    assert!(error.is_compile());
    assert!(error.to_string().contains("1 error(s)"));
}
