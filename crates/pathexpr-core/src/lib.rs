//! Core types shared by every pathexpr crate.
//!
//! This crate has no knowledge of expression trees or checking. It defines
//! the vocabulary the other crates speak:
//!
//! - [`Span`] for diagnostics
//! - [`TypeHash`] for stable type and member identity
//! - [`TypeInfo`], [`PrimitiveKind`] and [`TypeFlags`] describing host types
//! - [`PropertyInfo`], [`MethodInfo`] and [`Access`] describing host members
//! - [`TypeProvider`], the seam through which a host exposes its object model
//! - [`ArithmeticRegistry`] for custom arithmetic on host types

pub mod arithmetic;
pub mod error;
pub mod members;
pub mod operator;
pub mod primitive_kind;
pub mod provider;
pub mod span;
pub mod type_hash;
pub mod type_info;

pub use arithmetic::ArithmeticRegistry;
pub use error::RegistrationError;
pub use members::{Access, Accessor, MemberRef, MethodInfo, PropertyInfo};
pub use operator::{ArithmeticOp, BitwiseOp, LogicalOp, RelationalOp, ShiftOp};
pub use primitive_kind::PrimitiveKind;
pub use provider::TypeProvider;
pub use span::Span;
pub use type_hash::TypeHash;
pub use type_info::{TypeFlags, TypeInfo, well_known};
