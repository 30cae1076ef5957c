//! Symbol table produced by the checker.
//!
//! The primary store maps [`NodeId`] to [`SemanticRecord`]. Two secondary
//! indices answer the questions evaluators ask most: "every field this
//! expression touches" (by [`SymbolKind`]) and "every symbol resolved inside
//! this navigation path" (by context name). Both indices hold node ids, in
//! discovery order, and never contain a node the primary store lacks.
//!
//! The table also carries the per-node side tables of a check: resolved
//! type, constant association, and write-target marks.

use rustc_hash::{FxHashMap, FxHashSet};

use pathexpr_ast::NodeId;
use pathexpr_core::TypeInfo;

use crate::{SemanticRecord, SymbolKind};

/// Resolved symbols of one expression.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: FxHashMap<NodeId, SemanticRecord>,
    /// Primary insertion order.
    order: Vec<NodeId>,
    by_kind: FxHashMap<SymbolKind, Vec<NodeId>>,
    by_context: FxHashMap<String, Vec<NodeId>>,
    /// Context names in discovery order.
    contexts: Vec<String>,

    node_types: FxHashMap<NodeId, TypeInfo>,
    constants: FxHashMap<NodeId, NodeId>,
    write_targets: FxHashSet<NodeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Symbols
    // ==========================================================================

    /// Insert or replace the record for `record.node`.
    ///
    /// Indices are de-duplicated by node: re-adding a node whose kind or
    /// context changed moves it rather than listing it twice.
    ///
    /// # Panics
    ///
    /// If the record has no kind. That is a checker bug, not a user error.
    pub fn add_symbol(&mut self, record: SemanticRecord) {
        let Some(kind) = record.kind else {
            panic!("internal error: symbol for node {} has no kind", record.node);
        };
        let node = record.node;

        match self.records.get(&node) {
            Some(previous) => {
                if let Some(old_kind) = previous.kind
                    && old_kind != kind
                    && let Some(nodes) = self.by_kind.get_mut(&old_kind)
                {
                    nodes.retain(|&n| n != node);
                }
                if let Some(old_context) = previous.context.as_deref()
                    && record.context.as_deref() != Some(old_context)
                    && let Some(nodes) = self.by_context.get_mut(old_context)
                {
                    nodes.retain(|&n| n != node);
                    if nodes.is_empty() {
                        self.by_context.remove(old_context);
                        self.contexts.retain(|c| c != old_context);
                    }
                }
            }
            None => self.order.push(node),
        }

        let kind_nodes = self.by_kind.entry(kind).or_default();
        if !kind_nodes.contains(&node) {
            kind_nodes.push(node);
        }

        if let Some(context) = record.context.as_deref().filter(|c| !c.trim().is_empty()) {
            if !self.by_context.contains_key(context) {
                self.contexts.push(context.to_string());
            }
            let context_nodes = self.by_context.entry(context.to_string()).or_default();
            if !context_nodes.contains(&node) {
                context_nodes.push(node);
            }
        }

        self.records.insert(node, record);
    }

    pub fn get_symbol_record(&self, node: NodeId) -> Option<&SemanticRecord> {
        self.records.get(&node)
    }

    /// The first record, in insertion order, with this name and kind.
    pub fn symbol_by_name(&self, name: &str, kind: SymbolKind) -> Option<&SemanticRecord> {
        self.by_kind
            .get(&kind)?
            .iter()
            .filter_map(|n| self.records.get(n))
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// Every record of `kind`, or `None` if the kind never occurred.
    pub fn get_symbol_records(&self, kind: SymbolKind) -> Option<Vec<&SemanticRecord>> {
        let nodes = self.by_kind.get(&kind)?;
        Some(nodes.iter().filter_map(|n| self.records.get(n)).collect())
    }

    /// Every record resolved in the navigation context `name`.
    pub fn records_for_context(&self, name: &str) -> Option<Vec<&SemanticRecord>> {
        let nodes = self.by_context.get(name)?;
        Some(nodes.iter().filter_map(|n| self.records.get(n)).collect())
    }

    pub fn all_contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(String::as_str)
    }

    /// All fields the expression reads or writes.
    pub fn fields(&self) -> Vec<&SemanticRecord> {
        self.get_symbol_records(SymbolKind::Field).unwrap_or_default()
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &SemanticRecord> {
        self.order.iter().filter_map(|n| self.records.get(n))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ==========================================================================
    // Side tables
    // ==========================================================================

    /// The resolved type of any node, symbol or not.
    pub fn node_type(&self, node: NodeId) -> Option<&TypeInfo> {
        self.node_types.get(&node)
    }

    pub(crate) fn set_node_type(&mut self, node: NodeId, type_info: Option<TypeInfo>) {
        match type_info {
            Some(t) => {
                self.node_types.insert(node, t);
            }
            None => {
                self.node_types.remove(&node);
            }
        }
    }

    /// The constant literal node this node folds to, if any.
    pub fn constant_of(&self, node: NodeId) -> Option<NodeId> {
        self.constants.get(&node).copied()
    }

    pub(crate) fn set_constant(&mut self, node: NodeId, constant: NodeId) {
        self.constants.insert(node, constant);
    }

    pub(crate) fn clear_constant(&mut self, node: NodeId) {
        self.constants.remove(&node);
    }

    /// Whether the node is the target of an assignment.
    pub fn is_write_target(&self, node: NodeId) -> bool {
        self.write_targets.contains(&node)
    }

    pub(crate) fn mark_write_target(&mut self, node: NodeId) {
        self.write_targets.insert(node);
    }

    /// Update the type of an existing record and its node.
    pub(crate) fn retype(&mut self, node: NodeId, type_info: Option<TypeInfo>) {
        if let Some(record) = self.records.get_mut(&node) {
            record.type_info = type_info.clone();
        }
        self.set_node_type(node, type_info);
    }
}
