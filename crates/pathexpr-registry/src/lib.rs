//! Reference host type registry for pathexpr.
//!
//! Hosts with their own reflection layer implement
//! [`TypeProvider`](pathexpr_core::TypeProvider) directly. Everyone else
//! describes their object model here, once, and passes the registry to the
//! checker.

mod builder;
mod builtins;
mod registry;
mod type_name;

pub use builder::{ClassBuilder, MethodDecl, PropertyDecl};
pub use registry::TypeRegistry;
pub use type_name::TypeName;
