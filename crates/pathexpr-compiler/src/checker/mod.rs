//! The type checker.
//!
//! [`TypeChecker`] walks an [`Ast`] once, top-down, and resolves every node
//! against the host's [`TypeProvider`]. Findings go into a [`SymbolTable`];
//! problems go into the caller's [`Diagnostics`] and never stop the walk.
//!
//! Dispatch is one `match` over [`NodeKind`]. The node handlers live in
//! submodules grouped the way the language groups them:
//! - `navigation` - chains, properties, indexing, projections
//! - `calls` - instance, static and constructor calls
//! - `operators` - logical, arithmetic, relational, bitwise and friends
//! - `literals` - constants, list and map literals
//! - `variables` - variables, reserved references, assignment
//!
//! # Untyped mode
//!
//! When no root type is configured (or it cannot be resolved), nothing can be
//! validated. Names that fail to resolve are then accepted without a type and
//! left for the evaluator.

mod calls;
mod literals;
mod navigation;
mod operators;
mod variables;

use rustc_hash::FxHashMap;
use tracing::debug;

use pathexpr_ast::{Ast, NodeId, NodeKind};
use pathexpr_core::{MemberRef, Span, TypeInfo, TypeProvider};

use crate::{
    CheckError, CheckOptions, Diagnostics, Environment, ScopeKind, ScopeStack, SemanticRecord,
    SymbolKind, SymbolTable,
};

/// Tracked state of one expression variable.
///
/// Variables are not lexically scoped: the latest write anywhere in the
/// expression decides the type every reference ends up with.
#[derive(Debug, Default)]
struct VariableState {
    type_info: Option<TypeInfo>,
    constant: Option<NodeId>,
    /// Every node recorded as this variable.
    nodes: Vec<NodeId>,
}

/// Resolves the types and symbols of one expression.
///
/// All mutable state lives in the checker value, which is created per call
/// of [`TypeChecker::check`]; nothing is shared between checks.
pub struct TypeChecker<'a> {
    env: &'a Environment<'a>,
    options: &'a CheckOptions,
    ast: &'a Ast,
    diagnostics: &'a mut Diagnostics,
    root_type: Option<TypeInfo>,
    scopes: ScopeStack,
    table: SymbolTable,
    /// Chain link names that resolved to nothing yet.
    unresolved: Vec<String>,
    variables: FxHashMap<String, VariableState>,
    variable_order: Vec<String>,
    /// Key lookup node -> (map literal, key).
    key_links: FxHashMap<NodeId, (NodeId, String)>,
    /// Map entries reassigned through a key lookup.
    key_overrides: FxHashMap<(NodeId, String), NodeId>,
}

impl<'a> TypeChecker<'a> {
    /// Check `ast` and return its symbol table.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check(
        env: &'a Environment<'a>,
        options: &'a CheckOptions,
        ast: &'a Ast,
        diagnostics: &'a mut Diagnostics,
    ) -> SymbolTable {
        Self::check_with_table(env, options, ast, SymbolTable::new(), diagnostics)
    }

    /// Check `ast`, merging into records already present in `table`.
    ///
    /// Existing records are updated in place rather than replaced, so
    /// related sub-expressions that share nodes can be analysed together.
    pub fn check_with_table(
        env: &'a Environment<'a>,
        options: &'a CheckOptions,
        ast: &'a Ast,
        table: SymbolTable,
        diagnostics: &'a mut Diagnostics,
    ) -> SymbolTable {
        let root_type = options
            .root_type
            .as_deref()
            .and_then(|name| env.provider().type_info(name));
        if let Some(name) = options.root_type.as_deref()
            && root_type.is_none()
        {
            debug!(root_type = name, "root type unknown, checking untyped");
        }

        let errors_before = diagnostics.len();
        debug!(
            nodes = ast.len(),
            root_type = root_type.as_ref().map(TypeInfo::name),
            "checking expression"
        );

        let mut checker = TypeChecker {
            env,
            options,
            ast,
            diagnostics,
            scopes: ScopeStack::new(root_type.clone(), ast.root()),
            root_type,
            table,
            unresolved: Vec::new(),
            variables: FxHashMap::default(),
            variable_order: Vec::new(),
            key_links: FxHashMap::default(),
            key_overrides: FxHashMap::default(),
        };

        if !ast.is_empty() {
            checker.visit(ast.root());
            debug_assert_eq!(checker.scopes.depth(), 1, "unbalanced scopes");
            checker.resolve_variables();
            checker.check_expected_type();
        }

        debug!(
            symbols = checker.table.len(),
            errors = checker.diagnostics.len() - errors_before,
            "expression checked"
        );
        checker.table
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Resolve `id` and store its type. Returns the type.
    fn visit(&mut self, id: NodeId) -> Option<TypeInfo> {
        let ast = self.ast;
        let type_info = match ast.kind(id) {
            NodeKind::Const(_) => literals::check_const(self, id),
            NodeKind::List => literals::check_list(self, id),
            NodeKind::Map => literals::check_map(self, id),
            NodeKind::KeyValue => literals::check_key_value(self, id),

            NodeKind::Chain => navigation::check_chain(self, id),
            NodeKind::Property { name } => navigation::check_property(self, id, name),
            NodeKind::StaticField { class_name, name } => {
                navigation::check_static_field(self, id, class_name, name)
            }
            NodeKind::Index => navigation::check_index(self, id),
            NodeKind::Projection { method } => navigation::check_projection(self, id, method),
            NodeKind::Eval => navigation::check_eval(self, id),

            NodeKind::Method { name } => calls::check_method(self, id, name),
            NodeKind::StaticMethod { class_name, name } => {
                calls::check_static_method(self, id, class_name, name)
            }
            NodeKind::Constructor { class_name } => calls::check_constructor(self, id, class_name),

            NodeKind::Logical(op) => operators::check_logical(self, id, *op),
            NodeKind::Arithmetic(op) => operators::check_arithmetic(self, id, *op),
            NodeKind::Negate => operators::check_negate(self, id),
            NodeKind::Relational(op) => operators::check_relational(self, id, *op),
            NodeKind::Bitwise(op) => operators::check_bitwise(self, id, *op),
            NodeKind::BitNot => operators::check_bit_not(self, id),
            NodeKind::Shift(op) => operators::check_shift(self, id, *op),
            NodeKind::Conditional => operators::check_conditional(self, id),
            NodeKind::Cast { type_name } => operators::check_cast(self, id, type_name),
            NodeKind::InstanceOf { type_name } => operators::check_instance_of(self, id, type_name),
            NodeKind::In | NodeKind::NotIn => operators::check_membership(self, id),
            NodeKind::Sequence => operators::check_sequence(self, id),

            NodeKind::Variable { name } => variables::check_variable(self, id, name),
            NodeKind::VarDecl { name } => variables::check_var_decl(self, id, name),
            NodeKind::RootVar => variables::check_root_var(self, id),
            NodeKind::ThisVar => variables::check_this_var(self, id),
            NodeKind::ThisField => variables::check_this_field(self, id),
            NodeKind::LoginUser => variables::check_login_user(self, id),
            NodeKind::Assign => variables::check_assign(self, id),
        };
        self.table.set_node_type(id, type_info.clone());
        type_info
    }

    /// Visit every child of `id` in order.
    fn visit_children(&mut self, id: NodeId) -> Vec<Option<TypeInfo>> {
        let ast = self.ast;
        ast.children(id).iter().map(|&child| self.visit(child)).collect()
    }

    /// Child at `position`, which the node's layout guarantees.
    fn required_child(&self, id: NodeId, position: usize) -> NodeId {
        match self.ast.child(id, position) {
            Some(child) => child,
            None => panic!(
                "internal error: {} node {} has no child {}",
                self.ast.kind(id).label(),
                id,
                position
            ),
        }
    }

    /// Run `f` inside a scope owned by `node`.
    ///
    /// Lexical scopes start a fresh unresolved-name accumulator and restore
    /// the enclosing one afterwards.
    fn with_scope<R>(
        &mut self,
        type_info: Option<TypeInfo>,
        node: NodeId,
        kind: ScopeKind,
        path: Option<String>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = (kind == ScopeKind::Lexical).then(|| std::mem::take(&mut self.unresolved));
        self.scopes.begin_scope(type_info, node, kind, path);
        let result = f(self);
        self.scopes.end_scope_if_necessary(node);
        if let Some(saved) = saved {
            self.unresolved = saved;
        }
        result
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn provider(&self) -> &'a dyn TypeProvider {
        self.env.provider()
    }

    /// Whether a root type is known, i.e. failures are reportable.
    fn typed(&self) -> bool {
        self.root_type.is_some()
    }

    fn span(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    fn error(&mut self, error: CheckError) {
        self.diagnostics.push(error);
    }

    /// Resolve a type name, reporting `UnknownType` when typed.
    fn resolve_type_name(&mut self, id: NodeId, name: &str) -> Option<TypeInfo> {
        let found = self.provider().type_info(name);
        if found.is_none() && self.typed() {
            self.error(CheckError::UnknownType {
                name: name.to_string(),
                span: self.span(id),
            });
        }
        found
    }

    /// Record a symbol for `id`, merging with any record already present.
    ///
    /// The context is the current scope path.
    fn record(
        &mut self,
        id: NodeId,
        kind: SymbolKind,
        name: &str,
        type_info: Option<TypeInfo>,
        member: Option<MemberRef>,
    ) {
        let mut record = self
            .table
            .get_symbol_record(id)
            .cloned()
            .unwrap_or_else(|| SemanticRecord::new(id));
        record.kind = Some(kind);
        record.name = Some(name.to_string());
        record.type_info = type_info.clone();
        if member.is_some() {
            record.member = member;
        }
        record.context = self.scopes.current_path();
        record.extended_field_path = self.scopes.extended_field_path(id, self.ast);
        self.table.add_symbol(record);
        self.table.set_node_type(id, type_info);
    }

    /// Symbol kind recorded for a node, if any.
    fn kind_of(&self, id: NodeId) -> Option<SymbolKind> {
        self.table.get_symbol_record(id).and_then(|r| r.kind)
    }

    /// Carry the constant association of `from` over to `to`.
    fn inherit_constant(&mut self, to: NodeId, from: NodeId) {
        if let Some(constant) = self.table.constant_of(from) {
            self.table.set_constant(to, constant);
        }
    }

    // ==========================================================================
    // Final passes
    // ==========================================================================

    /// Report variables that never got a type and back-fill the final type
    /// into every node of those that did.
    fn resolve_variables(&mut self) {
        for name in std::mem::take(&mut self.variable_order) {
            let Some(state) = self.variables.get(&name) else {
                continue;
            };
            match &state.type_info {
                Some(type_info) => {
                    let type_info = type_info.clone();
                    for node in state.nodes.clone() {
                        self.table.retype(node, Some(type_info.clone()));
                    }
                }
                None if self.typed() => {
                    let span = state.nodes.first().map(|&n| self.span(n)).unwrap_or_default();
                    self.error(CheckError::UnresolvedVariable { name, span });
                }
                None => {}
            }
        }
    }

    /// Verify the resolved root type against the caller's expectation.
    fn check_expected_type(&mut self) {
        let options = self.options;
        let Some(expected_name) = options.expected_type.as_deref() else {
            return;
        };
        let root = self.ast.root();
        let span = self.span(root);
        let provider = self.provider();

        let Some(expected) = provider.type_info(expected_name) else {
            self.error(CheckError::UnknownType {
                name: expected_name.to_string(),
                span,
            });
            return;
        };
        let Some(mut actual) = self.table.node_type(root).cloned() else {
            return;
        };

        if let Some(container_name) = options.container_type.as_deref() {
            let Some(container) = provider.type_info(container_name) else {
                self.error(CheckError::UnknownType {
                    name: container_name.to_string(),
                    span,
                });
                return;
            };
            if actual.is_null() {
                return;
            }
            if !actual.is_container() || !provider.is_compatible(&actual, &container) {
                self.error(CheckError::ReturnTypeMismatch {
                    expected: format!("{}<{}>", container.base_name(), expected),
                    found: actual.to_string(),
                    span,
                });
                return;
            }
            match actual.element_type() {
                Some(element) => actual = element.clone(),
                None => return,
            }
        }

        if actual.is_any() || actual.is_null() {
            return;
        }
        let matches = if options.exact_match {
            actual.hash() == expected.hash()
        } else {
            provider.is_castable(&actual, &expected)
        };
        if !matches {
            self.error(CheckError::ReturnTypeMismatch {
                expected: expected.to_string(),
                found: actual.to_string(),
                span,
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! Shared registry and helpers for checker tests.

    use pathexpr_ast::{Ast, ExprNode, NodeId, NodeKind};
    use pathexpr_core::{Access, ArithmeticRegistry, TypeInfo, TypeProvider};
    use pathexpr_registry::{MethodDecl, PropertyDecl, TypeRegistry};

    use crate::{CheckOptions, Diagnostics, Environment, SymbolTable, TypeChecker};

    pub(crate) const MONEY: &str = "com.acme.Money";

    /// `Order` with `LineItem`s, a `Customer`, a qualified `Money` type and the
    /// helper host `ExprUtil`.
    pub(crate) fn shop() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register_class("LineItem")
            .field("price", "double")
            .unwrap()
            .field("qty", "int")
            .unwrap()
            .field("sku", "String")
            .unwrap()
            .method("subtotal", &[], Some("double"))
            .unwrap()
            .build()
            .unwrap();
        registry
            .register_class("Customer")
            .field("name", "String")
            .unwrap()
            .field("id", "long")
            .unwrap()
            .method("greet", &["String"], Some("String"))
            .unwrap()
            .build()
            .unwrap();
        registry
            .register_class(MONEY)
            .static_field("ZERO", MONEY)
            .unwrap()
            .static_method("of", &["double"], Some(MONEY))
            .unwrap()
            .build()
            .unwrap();
        registry
            .register_class("Order")
            .field("total", "double")
            .unwrap()
            .field("notes", "String")
            .unwrap()
            .field("items", "List<LineItem>")
            .unwrap()
            .field("customer", "Customer")
            .unwrap()
            .field("credit", MONEY)
            .unwrap()
            .property(PropertyDecl::new("secret", "String").getter("getSecret", Access::Private))
            .unwrap()
            .method("discount", &["double"], Some("double"))
            .unwrap()
            .method("broken", &[], Some("Missing"))
            .unwrap()
            .declare(MethodDecl::new("purge").access(Access::Private))
            .unwrap()
            .declare(MethodDecl::new("audit").returns("bool").access(Access::Public))
            .unwrap()
            .build()
            .unwrap();
        registry
            .register_class("ExprUtil")
            .static_method("isNull", &["Object"], Some("bool"))
            .unwrap()
            .static_method("isNotNull", &["Object"], Some("bool"))
            .unwrap()
            .static_method("nvl", &["Object", "Object"], Some("Object"))
            .unwrap()
            .build()
            .unwrap();
        registry
    }

    pub(crate) fn money_arithmetic(registry: &TypeRegistry) -> ArithmeticRegistry {
        let money = registry.type_info(MONEY).unwrap();
        let mut arithmetic = ArithmeticRegistry::new();
        arithmetic.register(&money, pathexpr_core::ArithmeticOp::Add, &money, money.clone());
        arithmetic
    }

    /// Outcome of one check.
    pub(crate) struct Checked {
        pub ast: Ast,
        pub table: SymbolTable,
        pub diagnostics: Diagnostics,
    }

    impl Checked {
        pub fn root_type(&self) -> Option<&TypeInfo> {
            self.table.node_type(self.ast.root())
        }

        pub fn type_of(&self, id: NodeId) -> Option<&TypeInfo> {
            self.table.node_type(id)
        }

        /// First node, in pre-order, that carries `name`.
        pub fn named(&self, name: &str) -> NodeId {
            self.ast
                .ids()
                .find(|&id| match self.ast.kind(id) {
                    NodeKind::Property { name: n }
                    | NodeKind::Method { name: n }
                    | NodeKind::Variable { name: n }
                    | NodeKind::VarDecl { name: n }
                    | NodeKind::StaticField { name: n, .. }
                    | NodeKind::StaticMethod { name: n, .. }
                    | NodeKind::Projection { method: n } => n == name,
                    _ => false,
                })
                .unwrap_or_else(|| panic!("no node named {name}"))
        }

        pub fn has_error(&self, needle: &str) -> bool {
            self.diagnostics.contains(needle)
        }
    }

    pub(crate) fn check_env(env: &Environment<'_>, options: &CheckOptions, expr: ExprNode) -> Checked {
        let ast = Ast::lower(expr);
        let mut diagnostics = Diagnostics::new();
        let table = TypeChecker::check(env, options, &ast, &mut diagnostics);
        Checked {
            ast,
            table,
            diagnostics,
        }
    }

    pub(crate) fn check_with(options: &CheckOptions, expr: ExprNode) -> Checked {
        let registry = shop();
        let env = Environment::new(&registry).with_arithmetic(money_arithmetic(&registry));
        check_env(&env, options, expr)
    }

    /// Check against root type `Order`.
    pub(crate) fn check_order(expr: ExprNode) -> Checked {
        check_with(&CheckOptions::new().root_type("Order"), expr)
    }

    /// Check without a root type.
    pub(crate) fn check_untyped(expr: ExprNode) -> Checked {
        check_with(&CheckOptions::new(), expr)
    }

    pub(crate) fn double() -> TypeInfo {
        TypeInfo::primitive(pathexpr_core::PrimitiveKind::Double)
    }

    pub(crate) fn int() -> TypeInfo {
        TypeInfo::primitive(pathexpr_core::PrimitiveKind::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::fixture::*;
    use super::*;
    use pathexpr_ast::ExprNode as E;
    use pathexpr_registry::TypeRegistry;

    #[test]
    fn expected_type_accepts_castable_result() {
        let options = CheckOptions::new().root_type("Order").expected_type("int");
        let checked = check_with(&options, E::property("total"));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
    }

    #[test]
    fn expected_type_mismatch() {
        let options = CheckOptions::new().root_type("Order").expected_type("Customer");
        let checked = check_with(&options, E::property("total"));
        assert_eq!(checked.diagnostics.len(), 1);
        assert!(checked.has_error("does not match expected type 'Customer'"));
    }

    #[test]
    fn exact_match_requires_identity() {
        let exact = CheckOptions::new()
            .root_type("Order")
            .expected_type("float")
            .exact_match(true);
        assert_eq!(check_with(&exact, E::property("total")).diagnostics.len(), 1);

        let same = CheckOptions::new()
            .root_type("Order")
            .expected_type("double")
            .exact_match(true);
        assert!(check_with(&same, E::property("total")).diagnostics.is_empty());
    }

    #[test]
    fn expected_container_checks_element() {
        let options = CheckOptions::new()
            .root_type("Order")
            .container_type("List")
            .expected_type("LineItem");
        assert!(check_with(&options, E::property("items")).diagnostics.is_empty());

        let checked = check_with(&options, E::property("total"));
        assert!(checked.has_error("expected type 'List<LineItem>'"));
    }

    #[test]
    fn expected_type_must_exist() {
        let options = CheckOptions::new().root_type("Order").expected_type("Nope");
        let checked = check_with(&options, E::property("total"));
        assert!(checked.has_error("cannot resolve type 'Nope'"));
    }

    #[test]
    fn null_and_any_satisfy_expectation() {
        let options = CheckOptions::new().root_type("Order").expected_type("Customer");
        assert!(check_with(&options, E::null()).diagnostics.is_empty());
        let nvl = E::method("ifNull", [E::property("customer"), E::null()]);
        assert!(check_with(&options, nvl).diagnostics.is_empty());
    }

    #[test]
    fn untyped_variable_reported_once() {
        let expr = E::sequence([E::var_decl("x"), E::var("x")]);
        let checked = check_order(expr.clone());
        let unresolved: Vec<_> = checked
            .diagnostics
            .messages()
            .into_iter()
            .filter(|m| m.contains("cannot resolve type for variable 'x'"))
            .collect();
        assert_eq!(unresolved.len(), 1);

        assert!(check_untyped(expr).diagnostics.is_empty());
    }

    #[test]
    fn variable_type_back_filled() {
        // var x; x = 5; x
        let checked = check_order(E::sequence([
            E::var_decl("x"),
            E::assign(E::var("x"), E::int(5)),
            E::var("x"),
        ]));
        assert!(checked.diagnostics.is_empty(), "{}", checked.diagnostics);
        let decl = checked.named("x");
        assert_eq!(checked.type_of(decl), Some(&int()));
        let record = checked.table.get_symbol_record(decl).unwrap();
        assert_eq!(record.type_info, Some(int()));
        assert_eq!(checked.root_type(), Some(&int()));
    }

    #[test]
    fn unknown_root_type_checks_untyped() {
        let options = CheckOptions::new().root_type("Nope");
        let checked = check_with(&options, E::property("bogus"));
        assert!(checked.diagnostics.is_empty());
        assert!(checked.root_type().is_none());
    }

    #[test]
    fn check_is_deterministic() {
        let expr = E::sequence([
            E::property("bogus"),
            E::sub(E::property("notes"), E::property("customer")),
            E::chain([
                E::property("items"),
                E::projection("collect", E::mul(E::property("price"), E::property("qty"))),
            ]),
        ]);
        let first = check_order(expr.clone());
        let second = check_order(expr);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(
            first.table.records().cloned().collect::<Vec<_>>(),
            second.table.records().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn errors_accumulate() {
        let checked = check_order(E::sequence([
            E::property("bogus"),
            E::cast("String", E::int(1)),
            E::method("nothing", []),
        ]));
        assert!(checked.diagnostics.len() >= 3, "{}", checked.diagnostics);
    }

    #[test]
    fn existing_records_are_kept() {
        let registry = shop();
        let env = Environment::new(&registry);
        let options = CheckOptions::new().root_type("Order");
        let ast = Ast::lower(E::property("total"));

        let mut existing = SymbolTable::new();
        existing.add_symbol(
            SemanticRecord::new(NodeId(7))
                .with_kind(SymbolKind::Variable)
                .with_name("outer"),
        );
        let mut diagnostics = Diagnostics::new();
        let table = TypeChecker::check_with_table(&env, &options, &ast, existing, &mut diagnostics);

        assert_eq!(table.len(), 2);
        assert!(table.symbol_by_name("outer", SymbolKind::Variable).is_some());
        assert!(table.symbol_by_name("total", SymbolKind::Field).is_some());
    }

    #[test]
    fn empty_registry_is_untyped_everywhere() {
        let registry = TypeRegistry::new();
        let env = Environment::new(&registry);
        let checked = check_env(&env, &CheckOptions::new().root_type("Order"), E::path("a.b.c"));
        assert!(checked.diagnostics.is_empty());
    }
}