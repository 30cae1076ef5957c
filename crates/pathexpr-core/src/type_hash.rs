//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a qualified type name (or a
//! member signature). Two descriptors for the same host type always hash the
//! same, no matter which provider produced them or in which order types were
//! registered.
//!
//! # Examples
//!
//! ```
//! use pathexpr_core::TypeHash;
//!
//! let a = TypeHash::from_name("Order");
//! let b = TypeHash::from_name("Order");
//! assert_eq!(a, b);
//!
//! let m1 = TypeHash::from_method(a, "total", &[]);
//! let m2 = TypeHash::from_method(a, "total", &[TypeHash::from_name("int")]);
//! assert_ne!(m1, m2);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
///
/// These keep a type and a method of the same name from colliding.
pub mod hash_constants {
    /// Separator constant for signature components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for field hashes.
    pub const FIELD: u64 = 0x1a095090689d4647;

    /// Parameter position markers; order of parameters matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type or member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a field hash from its owner and name.
    #[inline]
    pub fn from_field(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from owner, name and parameter types.
    ///
    /// Parameter order matters: `(int, String)` and `(String, int)` differ.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Whether this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_hash() {
        assert_eq!(TypeHash::from_name("LineItem"), TypeHash::from_name("LineItem"));
        assert_ne!(TypeHash::from_name("LineItem"), TypeHash::from_name("Order"));
    }

    #[test]
    fn field_and_type_domains_differ() {
        let owner = TypeHash::from_name("Order");
        assert_ne!(TypeHash::from_field(owner, "Order"), TypeHash::from_name("Order"));
    }

    #[test]
    fn method_param_order_matters() {
        let owner = TypeHash::from_name("Order");
        let int = TypeHash::from_name("int");
        let string = TypeHash::from_name("String");
        assert_ne!(
            TypeHash::from_method(owner, "f", &[int, string]),
            TypeHash::from_method(owner, "f", &[string, int])
        );
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("int").is_empty());
    }
}
