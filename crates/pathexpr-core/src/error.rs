//! Errors raised while describing the host object model.
//!
//! Checking never fails with these: a [`TypeProvider`](crate::TypeProvider)
//! answers `None` for unknown names. They surface only when a host registers
//! its types up front.

use thiserror::Error;

/// Errors that occur while registering host types and members.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A field or property with this name already exists on the owner.
    #[error("duplicate member: '{member}' already registered on '{owner}'")]
    DuplicateMember {
        /// The type declaring the member.
        owner: String,
        /// The duplicated member name.
        member: String,
    },

    /// A method with the same parameter list already exists on the owner.
    #[error("duplicate overload: '{owner}.{method}' with the same parameters")]
    DuplicateOverload { owner: String, method: String },

    /// A type name could not be parsed (unbalanced `<>`, empty segment).
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Registering the base would make the inheritance graph cyclic.
    #[error("cyclic inheritance: '{derived}' cannot extend '{base}'")]
    CyclicInheritance { derived: String, base: String },
}
