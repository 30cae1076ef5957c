//! Top-level error types.

use pathexpr_compiler::{CheckError, Diagnostics};
use pathexpr_core::RegistrationError;
use thiserror::Error;

/// A compilation that produced at least one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error(s): {diagnostics}", .diagnostics.len())]
pub struct CompileErrors {
    diagnostics: Diagnostics,
}

impl CompileErrors {
    pub(crate) fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn first(&self) -> Option<&CheckError> {
        self.diagnostics.iter().next()
    }

    pub fn into_errors(self) -> Vec<CheckError> {
        self.diagnostics.into_vec()
    }
}

/// Any failure a host can hit while setting up types or compiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathExprError {
    /// A type registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// An expression failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileErrors),
}

impl PathExprError {
    pub fn is_registration(&self) -> bool {
        matches!(self, PathExprError::Registration(_))
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, PathExprError::Compile(_))
    }
}
