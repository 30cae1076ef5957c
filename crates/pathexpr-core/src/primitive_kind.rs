//! Primitive kinds and the numeric coercion table.

use std::fmt;

/// Primitive value kinds known to the checker without asking the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Every primitive kind, in coercion order after `Bool`.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// The type name hosts use for this primitive.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Look a primitive up by its type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether arithmetic is defined on this kind.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Bool)
    }

    /// Whether this kind is an integer kind (bitwise and shift operands).
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::Short
                | PrimitiveKind::Char
                | PrimitiveKind::Int
                | PrimitiveKind::Long
        )
    }

    /// Position in the widening order; `None` for non-numeric kinds.
    pub const fn rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Bool => None,
            PrimitiveKind::Byte => Some(1),
            PrimitiveKind::Short => Some(2),
            PrimitiveKind::Char => Some(3),
            PrimitiveKind::Int => Some(4),
            PrimitiveKind::Long => Some(5),
            PrimitiveKind::Float => Some(6),
            PrimitiveKind::Double => Some(7),
        }
    }

    /// The wider of two numeric kinds.
    ///
    /// Order independent: `int.wider(double) == double.wider(int) == double`.
    pub fn wider(self, other: PrimitiveKind) -> Option<PrimitiveKind> {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => Some(if a >= b { self } else { other }),
            _ => None,
        }
    }

    /// Whether a value of `self` implicitly widens into `target`.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        match (self.rank(), target.rank()) {
            (Some(from), Some(to)) => from <= to,
            _ => self == target,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
