//! Shared host model for integration tests.
//!
//! `Order` has a `total`, a list of `LineItem`s and a `Customer`; `LineItem`
//! has a `price` and a `qty`. `Money` has registered addition only.

#![allow(dead_code)]

use pathexpr::prelude::*;
use pathexpr::core::ArithmeticOp;

pub fn registry() -> TypeRegistry {
    try_registry().unwrap_or_else(|e| panic!("fixture registration failed: {e}"))
}

fn try_registry() -> Result<TypeRegistry, PathExprError> {
    let mut registry = TypeRegistry::new();
    registry
        .register_class("Money")
        .static_method("of", &["double"], Some("Money"))?
        .build()?;
    registry
        .register_class("LineItem")
        .field("price", "double")?
        .field("qty", "int")?
        .field("cost", "Money")?
        .build()?;
    registry
        .register_class("Customer")
        .field("name", "String")?
        .method("greet", &["String"], Some("String"))?
        .build()?;
    registry
        .register_class("Order")
        .field("total", "double")?
        .field("count", "int")?
        .field("label", "String")?
        .field("items", "List<LineItem>")?
        .field("customer", "Customer")?
        .method("discount", &["double"], Some("double"))?
        .build()?;
    registry
        .register_class("RushOrder")
        .extends("Order")
        .field("deadline", "long")?
        .build()?;
    registry
        .register_class("ExprUtil")
        .static_method("isNull", &["Object"], Some("bool"))?
        .build()?;
    Ok(registry)
}

pub fn arithmetic(registry: &TypeRegistry) -> ArithmeticRegistry {
    let mut arithmetic = ArithmeticRegistry::new();
    if let Some(money) = registry.type_info("Money") {
        arithmetic.register(&money, ArithmeticOp::Add, &money, money.clone());
    }
    arithmetic
}

/// Compile `expr` against `Order`.
pub fn compile_order(expr: ExprNode) -> CompilationResult {
    compile_with(&CheckOptions::new().root_type("Order"), expr)
}

/// Compile `expr` with no root type.
pub fn compile_untyped(expr: ExprNode) -> CompilationResult {
    compile_with(&CheckOptions::new(), expr)
}

pub fn compile_with(options: &CheckOptions, expr: ExprNode) -> CompilationResult {
    let registry = registry();
    let env = Environment::new(&registry).with_arithmetic(arithmetic(&registry));
    compile(&env, Ast::lower(expr), options)
}

pub fn type_name(result: &CompilationResult) -> Option<String> {
    result.expression.root_type().map(|t| t.name().to_string())
}
