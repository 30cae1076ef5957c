//! TypeRegistry - in-memory host object model.
//!
//! Classes are stored by [`TypeHash`] of their qualified name. Inheritance is
//! kept in a `petgraph::DiGraph` with an edge from each class to its
//! superclass, so member lookup walks the graph breadth first (own members
//! before inherited ones) and assignability is a reachability query.
//!
//! Member types are stored as declared strings and resolved on every query.
//! A field whose type was never registered is reported through `tracing`
//! and treated as missing.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use pathexpr_core::{
    Access, MethodInfo, PropertyInfo, RegistrationError, TypeFlags, TypeHash, TypeInfo,
    TypeProvider, well_known,
};

use crate::builtins::builtin_method;
use crate::{ClassBuilder, TypeName};

#[derive(Debug, Clone)]
pub(crate) struct FieldEntry {
    pub name: String,
    pub type_name: String,
    pub is_static: bool,
    pub getter: Option<(String, Access)>,
}

#[derive(Debug, Clone)]
pub(crate) struct MethodEntry {
    pub name: String,
    pub params: Vec<String>,
    /// `None` declares a void method.
    pub return_type: Option<String>,
    pub is_static: bool,
    pub access: Access,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassEntry {
    name: String,
    hash: TypeHash,
    flags: TypeFlags,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
}

impl ClassEntry {
    pub(crate) fn new(
        name: String,
        flags: TypeFlags,
        fields: Vec<FieldEntry>,
        methods: Vec<MethodEntry>,
    ) -> Self {
        Self {
            hash: TypeHash::from_name(&name),
            name,
            flags,
            fields,
            methods,
        }
    }

    fn info(&self) -> TypeInfo {
        TypeInfo::class(&self.name).with_flags(self.flags)
    }
}

/// A [`TypeProvider`] backed by explicit registrations.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: FxHashMap<TypeHash, ClassEntry>,
    /// Registration order, for listing.
    order: Vec<TypeHash>,
    hierarchy: DiGraph<TypeHash, ()>,
    nodes: FxHashMap<TypeHash, NodeIndex>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start registering a class under its qualified name.
    pub fn register_class(&mut self, name: impl Into<String>) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name.into())
    }

    pub(crate) fn insert_class(
        &mut self,
        entry: ClassEntry,
        base: Option<String>,
    ) -> Result<(), RegistrationError> {
        if self.classes.contains_key(&entry.hash) || TypeInfo::well_known(&entry.name).is_some() {
            return Err(RegistrationError::DuplicateType(entry.name));
        }

        let base_node = match base {
            Some(base) if base == entry.name => {
                return Err(RegistrationError::CyclicInheritance {
                    derived: entry.name,
                    base,
                });
            }
            Some(base) => {
                let node = self.nodes.get(&TypeHash::from_name(&base)).copied();
                Some(node.ok_or(RegistrationError::TypeNotFound(base))?)
            }
            None => None,
        };

        let node = self.hierarchy.add_node(entry.hash);
        if let Some(base_node) = base_node {
            self.hierarchy.add_edge(node, base_node, ());
        }
        trace!(class = %entry.name, fields = entry.fields.len(), methods = entry.methods.len(), "registered class");

        self.nodes.insert(entry.hash, node);
        self.order.push(entry.hash);
        self.classes.insert(entry.hash, entry);
        Ok(())
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    pub fn contains_type(&self, name: &str) -> bool {
        self.classes.contains_key(&TypeHash::from_name(name))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Qualified names in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().filter_map(|h| self.classes.get(h)).map(|c| c.name.as_str())
    }

    /// Whether `derived` is `base` or inherits from it.
    pub fn is_subtype(&self, derived: TypeHash, base: TypeHash) -> bool {
        match (self.nodes.get(&derived), self.nodes.get(&base)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.hierarchy, from, to, None),
            _ => false,
        }
    }

    /// The class describing `owner` followed by its supertypes, nearest first.
    fn lineage(&self, owner: &TypeInfo) -> Vec<&ClassEntry> {
        let start = self
            .nodes
            .get(&owner.hash())
            .or_else(|| self.nodes.get(&owner.base_hash()));
        let Some(&start) = start else {
            return Vec::new();
        };

        let mut lineage = Vec::new();
        let mut bfs = Bfs::new(&self.hierarchy, start);
        while let Some(node) = bfs.next(&self.hierarchy) {
            if let Some(class) = self.classes.get(&self.hierarchy[node]) {
                lineage.push(class);
            }
        }
        lineage
    }

    fn resolve_name(&self, name: &str) -> Option<TypeInfo> {
        TypeName::parse(name).ok().and_then(|parsed| self.resolve(&parsed))
    }

    fn resolve(&self, name: &TypeName<'_>) -> Option<TypeInfo> {
        match name {
            TypeName::Simple(simple) => TypeInfo::well_known(simple)
                .or_else(|| self.classes.get(&TypeHash::from_name(simple)).map(ClassEntry::info)),
            TypeName::Generic { base, args } => {
                let mut args = args
                    .iter()
                    .map(|arg| self.resolve(arg))
                    .collect::<Option<Vec<_>>>()?;
                match (*base, args.len()) {
                    (well_known::LIST, 1) => args.pop().map(TypeInfo::list_of),
                    (well_known::MAP, _) => Some(TypeInfo::map()),
                    (_, 1) => {
                        let class = self.classes.get(&TypeHash::from_name(base))?;
                        if !class.flags.contains(TypeFlags::CONTAINER) {
                            return None;
                        }
                        let element = args.pop()?;
                        Some(TypeInfo::container(base, element).with_flags(class.flags))
                    }
                    _ => None,
                }
            }
        }
    }

    fn method_info(&self, class: &ClassEntry, entry: &MethodEntry) -> Option<MethodInfo> {
        let mut params = Vec::with_capacity(entry.params.len());
        for param in &entry.params {
            let Some(info) = self.resolve_name(param) else {
                warn!(owner = %class.name, method = %entry.name, param = %param, "parameter type cannot be resolved");
                return None;
            };
            params.push(info);
        }
        let return_type = match &entry.return_type {
            None => Some(TypeInfo::void()),
            Some(ret) => {
                let resolved = self.resolve_name(ret);
                if resolved.is_none() {
                    warn!(owner = %class.name, method = %entry.name, returns = %ret, "return type cannot be resolved");
                }
                resolved
            }
        };
        Some(
            MethodInfo::new(class.hash, &entry.name, params, return_type)
                .with_static(entry.is_static)
                .with_access(entry.access),
        )
    }
}

impl TypeProvider for TypeRegistry {
    fn type_info(&self, name: &str) -> Option<TypeInfo> {
        self.resolve_name(name)
    }

    fn field(&self, owner: &TypeInfo, name: &str) -> Option<PropertyInfo> {
        for class in self.lineage(owner) {
            let Some(field) = class.fields.iter().find(|f| f.name == name) else {
                continue;
            };
            let Some(type_info) = self.resolve_name(&field.type_name) else {
                warn!(owner = %class.name, field = name, declared = %field.type_name, "field type cannot be resolved");
                return None;
            };
            let mut property = PropertyInfo::field(class.hash, name, type_info.clone())
                .with_static(field.is_static);
            if let Some((getter, access)) = &field.getter {
                let getter = MethodInfo::new(class.hash, getter, Vec::new(), Some(type_info))
                    .with_static(field.is_static)
                    .with_access(*access);
                property = property.with_getter(getter);
            }
            return Some(property);
        }
        None
    }

    fn method(
        &self,
        owner: &TypeInfo,
        name: &str,
        args: &[TypeInfo],
        static_only: bool,
    ) -> Option<MethodInfo> {
        let mut candidates = Vec::new();
        for class in self.lineage(owner) {
            for entry in &class.methods {
                if entry.name != name || entry.params.len() != args.len() {
                    continue;
                }
                if static_only && !entry.is_static {
                    continue;
                }
                if let Some(info) = self.method_info(class, entry) {
                    candidates.push(info);
                }
            }
        }

        if candidates.is_empty() {
            return if static_only {
                None
            } else {
                builtin_method(owner, name, args)
            };
        }

        let exact = candidates.iter().find(|m| {
            m.params.iter().zip(args).all(|(param, arg)| param.hash() == arg.hash())
        });
        exact
            .or_else(|| {
                candidates.iter().find(|m| {
                    m.params.iter().zip(args).all(|(param, arg)| self.is_compatible(arg, param))
                })
            })
            .cloned()
    }

    fn is_compatible(&self, from: &TypeInfo, to: &TypeInfo) -> bool {
        if from.is_trivially_compatible(to) {
            return true;
        }
        if from.is_container() && to.is_container() && from.base_hash() == to.base_hash() {
            return match (from.element_type(), to.element_type()) {
                (_, None) => true,
                (Some(a), Some(b)) => self.is_compatible(a, b),
                (None, Some(_)) => false,
            };
        }
        self.is_subtype(from.hash(), to.hash())
    }
}
