//! The host metadata seam.
//!
//! The checker never reflects over host objects itself. Everything it knows
//! about fields, methods and assignability comes through [`TypeProvider`].
//! Implementations must be side-effect free: the checker may ask the same
//! question several times during one check and expects the same answer.

use crate::{MethodInfo, PropertyInfo, TypeInfo};

/// Reflection-like access to the host object model.
pub trait TypeProvider {
    /// Resolve a type by name.
    ///
    /// Names may be dotted (`com.acme.Order`) or generic (`List<LineItem>`).
    fn type_info(&self, name: &str) -> Option<TypeInfo>;

    /// Look up a field or getter-backed property on `owner`.
    fn field(&self, owner: &TypeInfo, name: &str) -> Option<PropertyInfo>;

    /// Find the overload of `name` on `owner` accepting `args`.
    ///
    /// With `static_only` set, instance methods must not match.
    fn method(
        &self,
        owner: &TypeInfo,
        name: &str,
        args: &[TypeInfo],
        static_only: bool,
    ) -> Option<MethodInfo>;

    /// Whether a value of `from` may be used where `to` is expected.
    fn is_compatible(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        from.is_trivially_compatible(to)
    }

    /// The list type produced by projections over `element`.
    fn container_of(&self, element: TypeInfo) -> TypeInfo {
        TypeInfo::list_of(element)
    }

    /// Symmetric compatibility, used for operands and branches.
    fn is_compatible_either(&self, a: &TypeInfo, b: &TypeInfo) -> bool {
        self.is_compatible(a, b) || self.is_compatible(b, a)
    }

    /// Whether a cast from `from` to `to` can ever succeed.
    ///
    /// A cast may widen or narrow: it is legal when either side is
    /// assignable to the other, or both are numeric primitives.
    fn is_castable(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        self.is_compatible_either(from, to)
            || (from.is_primitive_numeric() && to.is_primitive_numeric())
    }
}

impl<P: TypeProvider + ?Sized> TypeProvider for &P {
    fn type_info(&self, name: &str) -> Option<TypeInfo> {
        (**self).type_info(name)
    }

    fn field(&self, owner: &TypeInfo, name: &str) -> Option<PropertyInfo> {
        (**self).field(owner, name)
    }

    fn method(
        &self,
        owner: &TypeInfo,
        name: &str,
        args: &[TypeInfo],
        static_only: bool,
    ) -> Option<MethodInfo> {
        (**self).method(owner, name, args, static_only)
    }

    fn is_compatible(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        (**self).is_compatible(from, to)
    }

    fn container_of(&self, element: TypeInfo) -> TypeInfo {
        (**self).container_of(element)
    }

    fn is_compatible_either(&self, a: &TypeInfo, b: &TypeInfo) -> bool {
        (**self).is_compatible_either(a, b)
    }

    fn is_castable(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        (**self).is_castable(from, to)
    }
}
