//! Fluent class registration.
//!
//! ```
//! use pathexpr_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register_class("LineItem")
//!     .field("price", "double")?
//!     .field("qty", "int")?
//!     .build()?;
//! registry
//!     .register_class("Order")
//!     .field("total", "double")?
//!     .field("items", "List<LineItem>")?
//!     .method("discount", &["double"], Some("double"))?
//!     .build()?;
//! # Ok::<(), pathexpr_core::RegistrationError>(())
//! ```

use pathexpr_core::{Access, RegistrationError, TypeFlags};

use crate::TypeName;
use crate::registry::{ClassEntry, FieldEntry, MethodEntry, TypeRegistry};

/// Declaration of a method, for registrations beyond [`ClassBuilder::method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: Option<String>,
    pub is_static: bool,
    pub access: Access,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            is_static: false,
            access: Access::default(),
        }
    }

    pub fn param(mut self, type_name: impl Into<String>) -> Self {
        self.params.push(type_name.into());
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// Declaration of a field or getter-backed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub type_name: String,
    pub is_static: bool,
    /// Getter name and its access level.
    pub getter: Option<(String, Access)>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_static: false,
            getter: None,
        }
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Read the property through `getter` rather than directly.
    pub fn getter(mut self, getter: impl Into<String>, access: Access) -> Self {
        self.getter = Some((getter.into(), access));
        self
    }
}

/// Builder returned by [`TypeRegistry::register_class`].
///
/// Member declarations are validated as they are added; the class is only
/// visible to lookups once [`build`](Self::build) succeeds.
pub struct ClassBuilder<'r> {
    registry: &'r mut TypeRegistry,
    name: String,
    base: Option<String>,
    flags: TypeFlags,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
}

impl<'r> ClassBuilder<'r> {
    pub(crate) fn new(registry: &'r mut TypeRegistry, name: String) -> Self {
        Self {
            registry,
            name,
            base: None,
            flags: TypeFlags::empty(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Declare the superclass. It must already be registered.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Classification flags, e.g. `NUMERIC` for a decimal type or
    /// `CONTAINER` for a generic collection class.
    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn field(self, name: &str, type_name: &str) -> Result<Self, RegistrationError> {
        self.property(PropertyDecl::new(name, type_name))
    }

    pub fn static_field(self, name: &str, type_name: &str) -> Result<Self, RegistrationError> {
        self.property(PropertyDecl::new(name, type_name).static_())
    }

    pub fn property(mut self, decl: PropertyDecl) -> Result<Self, RegistrationError> {
        TypeName::parse(&decl.type_name)?;
        if self.fields.iter().any(|f| f.name == decl.name) {
            return Err(RegistrationError::DuplicateMember {
                owner: self.name.clone(),
                member: decl.name,
            });
        }
        self.fields.push(FieldEntry {
            name: decl.name,
            type_name: decl.type_name,
            is_static: decl.is_static,
            getter: decl.getter,
        });
        Ok(self)
    }

    /// An instance method with `Safe` access.
    pub fn method(
        self,
        name: &str,
        params: &[&str],
        return_type: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        self.declare(build_decl(name, params, return_type))
    }

    pub fn static_method(
        self,
        name: &str,
        params: &[&str],
        return_type: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        self.declare(build_decl(name, params, return_type).static_())
    }

    pub fn declare(mut self, decl: MethodDecl) -> Result<Self, RegistrationError> {
        for type_name in decl.params.iter().chain(decl.return_type.iter()) {
            TypeName::parse(type_name)?;
        }
        let duplicate = self
            .methods
            .iter()
            .any(|m| m.name == decl.name && m.params == decl.params);
        if duplicate {
            return Err(RegistrationError::DuplicateOverload {
                owner: self.name.clone(),
                method: decl.name,
            });
        }
        self.methods.push(MethodEntry {
            name: decl.name,
            params: decl.params,
            return_type: decl.return_type,
            is_static: decl.is_static,
            access: decl.access,
        });
        Ok(self)
    }

    /// Register the class.
    pub fn build(self) -> Result<(), RegistrationError> {
        TypeName::parse(&self.name)?;
        let entry = ClassEntry::new(self.name, self.flags, self.fields, self.methods);
        self.registry.insert_class(entry, self.base)
    }
}

fn build_decl(name: &str, params: &[&str], return_type: Option<&str>) -> MethodDecl {
    let decl = params.iter().fold(MethodDecl::new(name), |decl, p| decl.param(*p));
    match return_type {
        Some(ret) => decl.returns(ret),
        None => decl,
    }
}
