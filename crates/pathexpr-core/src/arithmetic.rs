//! Custom arithmetic registrations.
//!
//! Primitive numerics are handled by the coercion table in
//! [`PrimitiveKind`](crate::PrimitiveKind). Host types with their own
//! arithmetic (money, decimals, durations) are registered here, keyed by the
//! operand type pair and the operator.

use rustc_hash::FxHashMap;

use crate::{ArithmeticOp, TypeHash, TypeInfo};

/// Result types for arithmetic on non-primitive operands.
#[derive(Debug, Clone, Default)]
pub struct ArithmeticRegistry {
    results: FxHashMap<(TypeHash, TypeHash, ArithmeticOp), TypeInfo>,
}

impl ArithmeticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `left op right` yields `result`.
    pub fn register(
        &mut self,
        left: &TypeInfo,
        op: ArithmeticOp,
        right: &TypeInfo,
        result: TypeInfo,
    ) -> &mut Self {
        self.results.insert((left.hash(), right.hash(), op), result);
        self
    }

    /// Declare every operator for the pair with the same result.
    pub fn register_all(&mut self, left: &TypeInfo, right: &TypeInfo, result: TypeInfo) -> &mut Self {
        for op in ArithmeticOp::ALL {
            self.register(left, op, right, result.clone());
        }
        self
    }

    /// The result type of `left op right`, if registered.
    pub fn result_type(&self, op: ArithmeticOp, left: &TypeInfo, right: &TypeInfo) -> Option<&TypeInfo> {
        self.results.get(&(left.hash(), right.hash(), op))
    }

    /// Whether `operand / operand` is registered.
    pub fn supports_division(&self, operand: &TypeInfo) -> bool {
        self.result_type(ArithmeticOp::Div, operand, operand).is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
