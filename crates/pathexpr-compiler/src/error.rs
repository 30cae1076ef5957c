//! Diagnostics produced while checking an expression.
//!
//! Every user-facing problem is a [`CheckError`] pushed onto a caller-owned
//! [`Diagnostics`] collector; checking always continues past it. Broken
//! internal invariants (a symbol without a kind, a projection outside a
//! chain) are not diagnostics and panic instead.

use std::fmt;

use pathexpr_core::Span;
use thiserror::Error;

/// A semantic problem found in an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Operand types do not fit the operator.
    #[error("at {span}: operands not compatible for '{operator}': {detail}")]
    OperandsNotCompatible {
        operator: String,
        detail: String,
        span: Span,
    },

    /// The condition of `?:` is not boolean.
    #[error("at {span}: condition must be boolean, found '{found}'")]
    ConditionNotBoolean { found: String, span: Span },

    /// A standalone name matched no field, type or variable.
    #[error("at {span}: cannot lookup type for field '{name}' on '{owner}'")]
    FieldLookup {
        name: String,
        owner: String,
        span: Span,
    },

    /// A navigation path matched neither fields nor a qualified type name.
    #[error("at {span}: element cannot be resolved: '{path}'")]
    UnresolvedElement { path: String, span: Span },

    /// A reserved navigation word used after the first link.
    #[error("at {span}: '{name}' is only allowed at the start of a path")]
    ReservedInPath { name: String, span: Span },

    /// A method argument has no static type.
    #[error("at {span}: fail to resolve type for parameter {position} of '{method}'")]
    UnresolvedParameter {
        method: String,
        position: usize,
        span: Span,
    },

    /// An instance method called through a type name.
    #[error("at {span}: non-static method invoked from class context: '{owner}.{method}'")]
    NonStaticFromClass {
        owner: String,
        method: String,
        span: Span,
    },

    /// No overload matches the call.
    #[error("at {span}: fail to find method '{method}({args})' on '{owner}'")]
    MethodNotFound {
        owner: String,
        method: String,
        args: String,
        span: Span,
    },

    /// The provider could not describe what a method returns.
    #[error("at {span}: fail to retrieve return type of '{method}'")]
    MissingReturnType { method: String, span: Span },

    /// A type name that the provider does not know.
    #[error("at {span}: cannot resolve type '{name}'")]
    UnknownType { name: String, span: Span },

    /// An expression whose type could not be determined.
    #[error("at {span}: cannot resolve type of {what}")]
    UnresolvedExpression { what: String, span: Span },

    /// Arithmetic on types with no coercion and no registration.
    #[error("at {span}: cannot resolve type of '{left} {operator} {right}'")]
    ArithmeticUnresolved {
        operator: String,
        left: String,
        right: String,
        span: Span,
    },

    /// Division where the non-null operand cannot be divided.
    #[error("at {span}: division not supported for '{operand}'")]
    DivisionNotSupported { operand: String, span: Span },

    /// Neither type converts into the other.
    #[error("at {span}: cannot cast '{from}' to '{to}'")]
    InvalidCast { from: String, to: String, span: Span },

    /// Indexing or projecting over something that is not a container.
    #[error("at {span}: '{found}' is not a container type")]
    NotAContainer { found: String, span: Span },

    /// Unknown projection method.
    #[error("at {span}: unknown projection '{method}', expected one of: {legal}")]
    UnknownProjection {
        method: String,
        legal: String,
        span: Span,
    },

    /// `thisField` used without a configured field name.
    #[error("at {span}: thisField not allowed in this expression")]
    ThisFieldNotAllowed { span: Span },

    /// The context operand of an eval has no static type.
    #[error("at {span}: type info for context object is null")]
    NullContext { span: Span },

    /// Assignment to `this`, `root` and friends.
    #[error("at {span}: cannot assign to reserved variable '{name}'")]
    ReservedAssignment { name: String, span: Span },

    /// A variable whose type is still unknown after the whole expression.
    #[error("at {span}: cannot resolve type for variable '{name}'")]
    UnresolvedVariable { name: String, span: Span },

    /// The expression does not produce the type the caller asked for.
    #[error("at {span}: expression type '{found}' does not match expected type '{expected}'")]
    ReturnTypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    /// A method below the callable access threshold.
    #[error("at {span}: method is not safe: '{method}' is {access}")]
    UnsafeMethod {
        method: String,
        access: String,
        span: Span,
    },
}

impl CheckError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CheckError::OperandsNotCompatible { span, .. }
            | CheckError::ConditionNotBoolean { span, .. }
            | CheckError::FieldLookup { span, .. }
            | CheckError::UnresolvedElement { span, .. }
            | CheckError::ReservedInPath { span, .. }
            | CheckError::UnresolvedParameter { span, .. }
            | CheckError::NonStaticFromClass { span, .. }
            | CheckError::MethodNotFound { span, .. }
            | CheckError::MissingReturnType { span, .. }
            | CheckError::UnknownType { span, .. }
            | CheckError::UnresolvedExpression { span, .. }
            | CheckError::ArithmeticUnresolved { span, .. }
            | CheckError::DivisionNotSupported { span, .. }
            | CheckError::InvalidCast { span, .. }
            | CheckError::NotAContainer { span, .. }
            | CheckError::UnknownProjection { span, .. }
            | CheckError::ThisFieldNotAllowed { span }
            | CheckError::NullContext { span }
            | CheckError::ReservedAssignment { span, .. }
            | CheckError::UnresolvedVariable { span, .. }
            | CheckError::ReturnTypeMismatch { span, .. }
            | CheckError::UnsafeMethod { span, .. } => *span,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Ordered collection of [`CheckError`]s, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<CheckError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: CheckError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckError> {
        self.errors.iter()
    }

    /// Rendered messages, in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.to_string().contains(needle))
    }

    pub fn into_vec(self) -> Vec<CheckError> {
        self.errors
    }

    /// `Ok(())` if empty, otherwise `Err` with the first error.
    pub fn into_result(self) -> Result<(), CheckError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl Extend<CheckError> for Diagnostics {
    fn extend<T: IntoIterator<Item = CheckError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = CheckError;
    type IntoIter = std::vec::IntoIter<CheckError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a CheckError;
    type IntoIter = std::slice::Iter<'a, CheckError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
