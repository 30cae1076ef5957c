//! Configuration of a check.
//!
//! [`Environment`] describes the host and is usually built once and shared;
//! [`CheckOptions`] describes one expression and its contract with the
//! caller.

use pathexpr_core::{Access, ArithmeticRegistry, TypeProvider};

/// Default type hosting the reserved helper methods (`isNull(x)`, ...).
pub const DEFAULT_UTILITY_TYPE: &str = "ExprUtil";

/// Host services available to the checker.
pub struct Environment<'a> {
    provider: &'a dyn TypeProvider,
    arithmetic: ArithmeticRegistry,
    login_user_type: Option<String>,
    utility_type: String,
}

impl<'a> Environment<'a> {
    pub fn new(provider: &'a dyn TypeProvider) -> Self {
        Self {
            provider,
            arithmetic: ArithmeticRegistry::default(),
            login_user_type: None,
            utility_type: DEFAULT_UTILITY_TYPE.to_string(),
        }
    }

    pub fn with_arithmetic(mut self, arithmetic: ArithmeticRegistry) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    /// Type name that `loginUser` resolves to.
    pub fn with_login_user_type(mut self, name: impl Into<String>) -> Self {
        self.login_user_type = Some(name.into());
        self
    }

    pub fn with_utility_type(mut self, name: impl Into<String>) -> Self {
        self.utility_type = name.into();
        self
    }

    pub fn provider(&self) -> &'a dyn TypeProvider {
        self.provider
    }

    pub fn arithmetic(&self) -> &ArithmeticRegistry {
        &self.arithmetic
    }

    pub fn login_user_type(&self) -> Option<&str> {
        self.login_user_type.as_deref()
    }

    pub fn utility_type(&self) -> &str {
        &self.utility_type
    }
}

/// Per-expression inputs.
///
/// Without a `root_type` the check runs in untyped mode: names that cannot
/// be resolved are left for the evaluator instead of being reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    pub root_type: Option<String>,
    /// Field name `thisField` refers to.
    pub this_field: Option<String>,
    /// Type the expression must produce.
    pub expected_type: Option<String>,
    /// Container the result must be, with `expected_type` as its element.
    pub container_type: Option<String>,
    /// Require the exact expected type rather than a castable one.
    pub exact_match: bool,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_type(mut self, name: impl Into<String>) -> Self {
        self.root_type = Some(name.into());
        self
    }

    pub fn this_field(mut self, name: impl Into<String>) -> Self {
        self.this_field = Some(name.into());
        self
    }

    pub fn expected_type(mut self, name: impl Into<String>) -> Self {
        self.expected_type = Some(name.into());
        self
    }

    pub fn container_type(mut self, name: impl Into<String>) -> Self {
        self.container_type = Some(name.into());
        self
    }

    pub fn exact_match(mut self, exact: bool) -> Self {
        self.exact_match = exact;
        self
    }
}

/// Settings for the [`SymbolValidator`](crate::SymbolValidator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Lowest access level a method may have and still be called.
    pub minimum_access: Access,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            minimum_access: Access::Safe,
        }
    }
}
