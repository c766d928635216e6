//! Compilation-universe elements
//!
//! Built once from a frozen analysis universe. Layout data (ids, type-check
//! ranges, dispatch tables) is immutable; the only state that changes after
//! the build is the per-method compiled graph, which can be set by the code
//! generator and then cleared.

use super::ids::{HostedFieldId, HostedMethodId, HostedTypeId};
use super::type_check::{ranges_contain, TypeCheckRange};
use crate::features::analysis_universe::TypeKind;
use crate::shared::models::{FieldId, MethodId, TypeId};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub struct HostedType {
    pub(crate) id: HostedTypeId,
    pub(crate) analysis: TypeId,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) is_abstract: bool,
    pub(crate) is_instantiated: bool,
    pub(crate) superclass: Option<HostedTypeId>,
    pub(crate) interfaces: Vec<HostedTypeId>,
    pub(crate) type_check_ranges: Vec<TypeCheckRange>,
    pub(crate) vtable: Vec<Option<HostedMethodId>>,
}

impl HostedType {
    pub fn id(&self) -> HostedTypeId {
        self.id
    }

    /// Analysis identity this type was built from
    pub fn analysis_id(&self) -> TypeId {
        self.analysis
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.is_interface()
    }

    pub fn is_instantiated(&self) -> bool {
        self.is_instantiated
    }

    pub fn superclass(&self) -> Option<HostedTypeId> {
        self.superclass
    }

    pub fn interfaces(&self) -> &[HostedTypeId] {
        &self.interfaces
    }

    /// Ids of every type assignable to this one, as `[start, end)` intervals
    pub fn type_check_ranges(&self) -> &[TypeCheckRange] {
        &self.type_check_ranges
    }

    /// Dispatch table; empty for types that are never instantiated
    pub fn vtable(&self) -> &[Option<HostedMethodId>] {
        &self.vtable
    }
}

/// Code produced for one method by the code generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompiledGraph {
    pub node_count: usize,
    pub code_size: usize,
}

#[derive(Debug)]
pub struct HostedMethod {
    pub(crate) id: HostedMethodId,
    pub(crate) analysis: MethodId,
    pub(crate) declaring: HostedTypeId,
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) has_body: bool,
    pub(crate) is_entry_point: bool,
    pub(crate) vtable_index: Option<usize>,
    pub(crate) implementations: Vec<HostedMethodId>,
    pub(crate) compiled: Mutex<Option<CompiledGraph>>,
}

impl HostedMethod {
    pub fn id(&self) -> HostedMethodId {
        self.id
    }

    pub fn analysis_id(&self) -> MethodId {
        self.analysis
    }

    pub fn declaring_type(&self) -> HostedTypeId {
        self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn has_body(&self) -> bool {
        self.has_body
    }

    pub fn is_entry_point(&self) -> bool {
        self.is_entry_point
    }

    /// Dispatch-table slot; `None` for direct methods
    pub fn vtable_index(&self) -> Option<usize> {
        self.vtable_index
    }

    pub fn is_direct(&self) -> bool {
        self.vtable_index.is_none()
    }

    /// Sorted concrete targets a call to this method can reach
    pub fn implementations(&self) -> &[HostedMethodId] {
        &self.implementations
    }

    pub fn compiled_graph(&self) -> Option<CompiledGraph> {
        *self.compiled.lock()
    }
}

#[derive(Debug, Clone)]
pub struct HostedField {
    pub(crate) id: HostedFieldId,
    pub(crate) analysis: FieldId,
    pub(crate) declaring: HostedTypeId,
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) declared_type: Option<HostedTypeId>,
    pub(crate) is_static: bool,
}

impl HostedField {
    pub fn id(&self) -> HostedFieldId {
        self.id
    }

    pub fn analysis_id(&self) -> FieldId {
        self.analysis
    }

    pub fn declaring_type(&self) -> HostedTypeId {
        self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// `None` when the declared type itself never became reachable
    pub fn declared_type(&self) -> Option<HostedTypeId> {
        self.declared_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// Dense, layout-ready view of the program handed to code generation
#[derive(Debug, Default)]
pub struct HostedUniverse {
    pub(crate) types: Vec<HostedType>,
    pub(crate) methods: Vec<HostedMethod>,
    pub(crate) fields: Vec<HostedField>,
    pub(crate) type_map: FxHashMap<TypeId, HostedTypeId>,
    pub(crate) method_map: FxHashMap<MethodId, HostedMethodId>,
    pub(crate) field_map: FxHashMap<FieldId, HostedFieldId>,
    pub(crate) entry_points: Vec<HostedMethodId>,
    pub(crate) main_entry_point: Option<HostedMethodId>,
}

impl HostedUniverse {
    pub fn types(&self) -> &[HostedType] {
        &self.types
    }

    pub fn methods(&self) -> &[HostedMethod] {
        &self.methods
    }

    pub fn fields(&self) -> &[HostedField] {
        &self.fields
    }

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn ty(&self, id: HostedTypeId) -> &HostedType {
        &self.types[id.index()]
    }

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn method(&self, id: HostedMethodId) -> &HostedMethod {
        &self.methods[id.index()]
    }

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn field(&self, id: HostedFieldId) -> &HostedField {
        &self.fields[id.index()]
    }

    pub fn lookup_type(&self, analysis: TypeId) -> Option<HostedTypeId> {
        self.type_map.get(&analysis).copied()
    }

    pub fn lookup_method(&self, analysis: MethodId) -> Option<HostedMethodId> {
        self.method_map.get(&analysis).copied()
    }

    pub fn lookup_field(&self, analysis: FieldId) -> Option<HostedFieldId> {
        self.field_map.get(&analysis).copied()
    }

    pub fn find_type(&self, name: &str) -> Option<&HostedType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn find_method(&self, qualified_name: &str) -> Option<&HostedMethod> {
        self.methods.iter().find(|m| m.qualified_name == qualified_name)
    }

    /// A value of type `sub` can be stored where `sup` is expected
    pub fn is_assignable_from(&self, sup: HostedTypeId, sub: HostedTypeId) -> bool {
        ranges_contain(&self.ty(sup).type_check_ranges, sub.raw())
    }

    pub fn entry_points(&self) -> &[HostedMethodId] {
        &self.entry_points
    }

    pub fn main_entry_point(&self) -> Option<HostedMethodId> {
        self.main_entry_point
    }

    /// Attach generated code to a method
    pub fn set_compiled_graph(&self, method: HostedMethodId, graph: CompiledGraph) {
        *self.method(method).compiled.lock() = Some(graph);
    }

    /// Release every compiled graph. Returns how many were held.
    pub fn clear_compiled_graphs(&self) -> usize {
        self.methods
            .iter()
            .filter(|m| m.compiled.lock().take().is_some())
            .count()
    }

    pub fn compiled_graph_count(&self) -> usize {
        self.methods.iter().filter(|m| m.compiled.lock().is_some()).count()
    }

    pub fn print_universe(&self) {
        info!(
            types = self.types.len(),
            methods = self.methods.len(),
            fields = self.fields.len(),
            "Hosted universe"
        );
        for ty in &self.types {
            let ranges: Vec<String> = ty.type_check_ranges.iter().map(|r| r.to_string()).collect();
            info!(
                id = ty.id.raw(),
                name = %ty.name,
                ranges = %ranges.join(" "),
                vtable = ty.vtable.len(),
                "type"
            );
        }
    }
}
