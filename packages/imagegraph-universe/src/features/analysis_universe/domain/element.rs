//! Analysis-time program elements
//!
//! Types, methods and fields as the fixpoint loop sees them. Everything except
//! the reachability flags and the recorded callers is fixed at registration.

use crate::shared::models::{FieldId, MethodId, Reachability, ReachabilityFlag, TypeId};
use serde::{Deserialize, Serialize};

/// Kind of an analysis type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Concrete or abstract class (see `AnalysisType::is_abstract`)
    Class,
    Interface,
    /// Primitive value type; never instantiated, never dispatched on
    Primitive,
}

#[derive(Debug, Clone)]
pub struct AnalysisType {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) is_abstract: bool,
    pub(crate) superclass: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) enclosing: Option<TypeId>,
    pub(crate) annotations: Vec<String>,
    pub(crate) declared_methods: Vec<MethodId>,
    pub(crate) declared_fields: Vec<FieldId>,
    pub(crate) reachability: Reachability,
}

impl AnalysisType {
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name, e.g. `java.lang.String`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    /// Interfaces are always abstract
    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.is_interface()
    }

    /// Class that can have instances of exactly this type
    pub fn is_concrete_class(&self) -> bool {
        self.is_class() && !self.is_abstract
    }

    pub fn superclass(&self) -> Option<TypeId> {
        self.superclass
    }

    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    /// Enclosing type for nested types
    pub fn enclosing_type(&self) -> Option<TypeId> {
        self.enclosing
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }

    pub fn declared_methods(&self) -> &[MethodId] {
        &self.declared_methods
    }

    pub fn declared_fields(&self) -> &[FieldId] {
        &self.declared_fields
    }

    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    pub fn is_reachable(&self) -> bool {
        !self.reachability.is_empty()
    }

    pub fn is_instantiated(&self) -> bool {
        self.reachability.has(ReachabilityFlag::Instantiated)
    }

    pub fn is_in_type_check(&self) -> bool {
        self.reachability.has(ReachabilityFlag::InTypeCheck)
    }
}

/// Method modifiers relevant to dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodModifiers {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_constructor: bool,
    pub is_private: bool,
}

/// Native entry point data (C ABI calling convention)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPointData {
    /// Exported symbol name
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisMethod {
    pub(crate) id: MethodId,
    pub(crate) declaring: TypeId,
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parameter_types: Vec<TypeId>,
    pub(crate) return_type: Option<TypeId>,
    pub(crate) modifiers: MethodModifiers,
    pub(crate) entry_point: Option<EntryPointData>,
    pub(crate) annotations: Vec<String>,
    pub(crate) reachability: Reachability,
    pub(crate) invoked_by: Vec<MethodId>,
}

impl AnalysisMethod {
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring
    }

    /// Simple name, e.g. `toString`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Type.name(P1, P2)` with fully qualified type names
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn parameter_types(&self) -> &[TypeId] {
        &self.parameter_types
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_types.len()
    }

    /// Declared type of the method value. `None` for `void`.
    pub fn return_type(&self) -> Option<TypeId> {
        self.return_type
    }

    pub fn modifiers(&self) -> MethodModifiers {
        self.modifiers
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract
    }

    pub fn is_constructor(&self) -> bool {
        self.modifiers.is_constructor
    }

    /// Has a body that can be compiled
    pub fn has_body(&self) -> bool {
        !self.modifiers.is_abstract
    }

    /// Candidate for a dispatch-table slot
    pub fn is_dispatchable(&self) -> bool {
        !self.modifiers.is_static && !self.modifiers.is_constructor && !self.modifiers.is_private
    }

    /// Same name and parameter types: one overrides the other
    pub fn same_signature(&self, other: &AnalysisMethod) -> bool {
        self.name == other.name && self.parameter_types == other.parameter_types
    }

    pub fn entry_point(&self) -> Option<&EntryPointData> {
        self.entry_point.as_ref()
    }

    pub fn is_entry_point(&self) -> bool {
        self.entry_point.is_some()
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }

    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    pub fn is_invoked(&self) -> bool {
        self.reachability.has(ReachabilityFlag::Invoked)
    }

    pub fn is_implementation_invoked(&self) -> bool {
        self.reachability.has(ReachabilityFlag::ImplementationInvoked)
    }

    /// Invoked directly or as a resolved implementation
    pub fn is_reachable(&self) -> bool {
        self.is_invoked() || self.is_implementation_invoked()
    }

    /// Internal callers, in discovery order
    pub fn invoked_by(&self) -> &[MethodId] {
        &self.invoked_by
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisField {
    pub(crate) id: FieldId,
    pub(crate) declaring: TypeId,
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) declared_type: TypeId,
    pub(crate) is_static: bool,
    pub(crate) reachability: Reachability,
}

impl AnalysisField {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Type.name`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn declared_type(&self) -> TypeId {
        self.declared_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    pub fn is_accessed(&self) -> bool {
        self.reachability.has(ReachabilityFlag::Accessed)
    }

    pub fn is_reachable(&self) -> bool {
        !self.reachability.is_empty()
    }
}
