//! Type descriptors.
//!
//! A [`TypeInfo`] is the checker's view of a host type: a qualified name, its
//! [`TypeHash`], a set of [`TypeFlags`] answering the questions the checker
//! asks most often (is it numeric? a container?), and for containers the
//! element type. Member lookup and assignability live on the
//! [`TypeProvider`](crate::TypeProvider), not here, because only the host
//! knows its inheritance graph.
//!
//! # Example
//!
//! ```
//! use pathexpr_core::{PrimitiveKind, TypeInfo};
//!
//! let items = TypeInfo::list_of(TypeInfo::class("LineItem"));
//! assert_eq!(items.name(), "List<LineItem>");
//! assert!(items.is_container());
//! assert_eq!(items.element_type().map(|t| t.name()), Some("LineItem"));
//!
//! let int = TypeInfo::primitive(PrimitiveKind::Int);
//! assert!(int.is_numeric() && int.is_integral());
//! ```

use std::fmt;

use bitflags::bitflags;

use crate::{PrimitiveKind, TypeHash};

/// Names of the types the checker synthesizes on its own.
pub mod well_known {
    pub const STRING: &str = "String";
    pub const OBJECT: &str = "Object";
    pub const LIST: &str = "List";
    pub const MAP: &str = "Map";
    pub const NULL: &str = "null";
    pub const VOID: &str = "void";
}

bitflags! {
    /// Classification bits carried by every [`TypeInfo`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u16 {
        /// A primitive value type (`int`, `bool`, ...).
        const PRIMITIVE = 1 << 0;
        /// Arithmetic is defined without a custom registration.
        const NUMERIC = 1 << 1;
        /// Integer kind; legal bitwise/shift operand.
        const INTEGRAL = 1 << 2;
        /// Boolean kind.
        const BOOLEAN = 1 << 3;
        /// Character string.
        const STRING = 1 << 4;
        /// Indexable, projectable collection.
        const CONTAINER = 1 << 5;
        /// Key/value collection.
        const MAP = 1 << 6;
        /// The null sentinel: "value is null / not yet known".
        const NULL = 1 << 7;
        /// The permissive "any object" type.
        const ANY = 1 << 8;
        /// The void sentinel.
        const VOID = 1 << 9;
    }
}

/// A host type as seen by the checker.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    name: String,
    hash: TypeHash,
    flags: TypeFlags,
    primitive: Option<PrimitiveKind>,
    element: Option<Box<TypeInfo>>,
}

impl TypeInfo {
    /// Create a plain (class) type with no flags.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            hash: TypeHash::from_name(&name),
            name,
            flags: TypeFlags::empty(),
            primitive: None,
            element: None,
        }
    }

    /// Add flags to this type.
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Attach an element type, marking the type as a container.
    pub fn with_element(mut self, element: TypeInfo) -> Self {
        self.flags |= TypeFlags::CONTAINER;
        self.element = Some(Box::new(element));
        self
    }

    /// The descriptor for a primitive kind.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        let mut flags = TypeFlags::PRIMITIVE;
        if kind.is_numeric() {
            flags |= TypeFlags::NUMERIC;
        }
        if kind.is_integral() {
            flags |= TypeFlags::INTEGRAL;
        }
        if kind == PrimitiveKind::Bool {
            flags |= TypeFlags::BOOLEAN;
        }
        let mut info = Self::class(kind.name()).with_flags(flags);
        info.primitive = Some(kind);
        info
    }

    /// `bool`.
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    /// `String`.
    pub fn string() -> Self {
        Self::class(well_known::STRING).with_flags(TypeFlags::STRING)
    }

    /// The permissive `Object` type every value is assignable to.
    pub fn any() -> Self {
        Self::class(well_known::OBJECT).with_flags(TypeFlags::ANY)
    }

    /// The null sentinel.
    pub fn null() -> Self {
        Self::class(well_known::NULL).with_flags(TypeFlags::NULL)
    }

    /// The void sentinel (empty key/value pairs, void methods).
    pub fn void() -> Self {
        Self::class(well_known::VOID).with_flags(TypeFlags::VOID)
    }

    /// A list with no known element type.
    pub fn list() -> Self {
        Self::class(well_known::LIST).with_flags(TypeFlags::CONTAINER)
    }

    /// `List<element>`.
    pub fn list_of(element: TypeInfo) -> Self {
        Self::container(well_known::LIST, element)
    }

    /// A generic map; key/value types are not tracked.
    pub fn map() -> Self {
        Self::class(well_known::MAP).with_flags(TypeFlags::CONTAINER | TypeFlags::MAP)
    }

    /// `base<element>` for an arbitrary container base name.
    pub fn container(base: &str, element: TypeInfo) -> Self {
        Self::class(format!("{base}<{}>", element.name)).with_element(element)
    }

    /// Descriptors the checker can build without consulting the host.
    pub fn well_known(name: &str) -> Option<Self> {
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Some(Self::primitive(kind));
        }
        match name {
            well_known::STRING => Some(Self::string()),
            well_known::OBJECT => Some(Self::any()),
            well_known::LIST => Some(Self::list()),
            well_known::MAP => Some(Self::map()),
            well_known::NULL => Some(Self::null()),
            well_known::VOID => Some(Self::void()),
            _ => None,
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Qualified name, including generic arguments (`List<LineItem>`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without generic arguments (`List`).
    pub fn base_name(&self) -> &str {
        self.name.split('<').next().unwrap_or(&self.name)
    }

    /// Identity hash of the full name.
    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// Identity hash of the base name.
    pub fn base_hash(&self) -> TypeHash {
        TypeHash::from_name(self.base_name())
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.primitive
    }

    /// Element type of a container, if known.
    pub fn element_type(&self) -> Option<&TypeInfo> {
        self.element.as_deref()
    }

    pub fn is_numeric(&self) -> bool {
        self.flags.contains(TypeFlags::NUMERIC)
    }

    /// Numeric primitive: eligible for the built-in coercion table.
    pub fn is_primitive_numeric(&self) -> bool {
        self.primitive.is_some_and(PrimitiveKind::is_numeric)
    }

    pub fn is_integral(&self) -> bool {
        self.flags.contains(TypeFlags::INTEGRAL)
    }

    pub fn is_boolean(&self) -> bool {
        self.flags.contains(TypeFlags::BOOLEAN)
    }

    pub fn is_string(&self) -> bool {
        self.flags.contains(TypeFlags::STRING)
    }

    pub fn is_container(&self) -> bool {
        self.flags.contains(TypeFlags::CONTAINER)
    }

    pub fn is_map(&self) -> bool {
        self.flags.contains(TypeFlags::MAP)
    }

    pub fn is_null(&self) -> bool {
        self.flags.contains(TypeFlags::NULL)
    }

    pub fn is_any(&self) -> bool {
        self.flags.contains(TypeFlags::ANY)
    }

    pub fn is_void(&self) -> bool {
        self.flags.contains(TypeFlags::VOID)
    }

    /// Compatibility facts that hold for every host.
    ///
    /// Identity, null into non-primitive, anything into `Object`, numeric
    /// widening and container-to-base (`List<Foo>` into `List`). Providers
    /// layer their inheritance graph on top of this.
    pub fn is_trivially_compatible(&self, target: &TypeInfo) -> bool {
        if self.hash == target.hash || target.is_any() {
            return true;
        }
        if self.is_null() {
            return target.primitive.is_none();
        }
        if let (Some(from), Some(to)) = (self.primitive, target.primitive) {
            return from.widens_to(to);
        }
        if self.is_container() && target.is_container() && self.base_hash() == target.base_hash() {
            return match (self.element_type(), target.element_type()) {
                (_, None) => true,
                (Some(from), Some(to)) => from.is_trivially_compatible(to),
                (None, Some(_)) => false,
            };
        }
        false
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
