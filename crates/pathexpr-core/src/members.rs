//! Member descriptors handed out by a [`TypeProvider`](crate::TypeProvider).

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{TypeHash, TypeInfo};

/// How far an expression author may reach into a member.
///
/// Levels are ordered: a method is callable when its level is at or above
/// the validator's threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Access {
    /// Host-internal; never callable from an expression.
    Private = 0,
    /// Visible, but may have side effects.
    Public = 1,
    /// Side-effect free; callable from any expression.
    #[default]
    Safe = 2,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Private => write!(f, "private"),
            Access::Public => write!(f, "public"),
            Access::Safe => write!(f, "safe"),
        }
    }
}

/// A resolved method (or static method) on a host type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub name: String,
    /// Type declaring the method.
    pub owner: TypeHash,
    pub params: Vec<TypeInfo>,
    /// `None` when the host cannot describe what the method returns.
    pub return_type: Option<TypeInfo>,
    pub is_static: bool,
    pub access: Access,
    /// Signature hash, stable across providers.
    pub hash: TypeHash,
}

impl MethodInfo {
    /// Create a method descriptor; the signature hash is derived.
    pub fn new(
        owner: TypeHash,
        name: impl Into<String>,
        params: Vec<TypeInfo>,
        return_type: Option<TypeInfo>,
    ) -> Self {
        let name = name.into();
        let param_hashes: Vec<TypeHash> = params.iter().map(TypeInfo::hash).collect();
        Self {
            hash: TypeHash::from_method(owner, &name, &param_hashes),
            name,
            owner,
            params,
            return_type,
            is_static: false,
            access: Access::default(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// How a property value is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Direct field read.
    Field,
    /// Read through a getter method.
    Getter(MethodInfo),
}

/// A resolved field or getter-backed property on a host type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: String,
    pub owner: TypeHash,
    pub type_info: TypeInfo,
    pub is_static: bool,
    pub accessor: Accessor,
    pub hash: TypeHash,
}

impl PropertyInfo {
    /// A direct field.
    pub fn field(owner: TypeHash, name: impl Into<String>, type_info: TypeInfo) -> Self {
        let name = name.into();
        Self {
            hash: TypeHash::from_field(owner, &name),
            name,
            owner,
            type_info,
            is_static: false,
            accessor: Accessor::Field,
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_getter(mut self, getter: MethodInfo) -> Self {
        self.accessor = Accessor::Getter(getter);
        self
    }

    /// The getter, when this property is not a direct field.
    pub fn getter(&self) -> Option<&MethodInfo> {
        match &self.accessor {
            Accessor::Field => None,
            Accessor::Getter(method) => Some(method),
        }
    }
}

/// The member a symbol resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberRef {
    Property(PropertyInfo),
    Method(MethodInfo),
}

impl MemberRef {
    pub fn name(&self) -> &str {
        match self {
            MemberRef::Property(p) => &p.name,
            MemberRef::Method(m) => &m.name,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyInfo> {
        match self {
            MemberRef::Property(p) => Some(p),
            MemberRef::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodInfo> {
        match self {
            MemberRef::Property(_) => None,
            MemberRef::Method(m) => Some(m),
        }
    }
}
