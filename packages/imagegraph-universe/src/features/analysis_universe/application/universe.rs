//! Analysis universe arena
//!
//! Append-only arenas for types, methods and fields plus name indices. Ids are
//! arena indices, so an element keeps the identity it received at first
//! registration for the rest of the build.

use crate::features::analysis_universe::domain::{
    AnalysisField, AnalysisMethod, AnalysisType, FieldDescriptor, MethodDescriptor,
    TypeDescriptor, TypeKind,
};
use crate::features::analysis_universe::error::{UniverseError, UniverseResult};
use crate::shared::models::{
    FieldId, MethodId, Reachability, ReachabilityFlag, TypeId, TypeState,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Element counts, used for growth accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseCounts {
    pub types: usize,
    pub methods: usize,
    pub fields: usize,
}

impl fmt::Display for UniverseCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} methods, {} fields",
            self.types, self.methods, self.fields
        )
    }
}

#[derive(Debug, Default)]
pub struct AnalysisUniverse {
    types: Vec<AnalysisType>,
    methods: Vec<AnalysisMethod>,
    fields: Vec<AnalysisField>,
    type_index: FxHashMap<String, TypeId>,
    method_index: FxHashMap<String, MethodId>,
    field_index: FxHashMap<String, FieldId>,
}

impl AnalysisUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> UniverseCounts {
        UniverseCounts {
            types: self.types.len(),
            methods: self.methods.len(),
            fields: self.fields.len(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════════════════

    /// Register a type. A name that is already known returns the existing id.
    pub fn register_type(&mut self, desc: TypeDescriptor) -> UniverseResult<TypeId> {
        if let Some(&id) = self.type_index.get(&desc.name) {
            return Ok(id);
        }

        if let Some(superclass) = desc.superclass {
            let sup = self.get_type(superclass).ok_or(UniverseError::UnknownType(superclass))?;
            if desc.kind != TypeKind::Class || sup.kind() != TypeKind::Class {
                return Err(UniverseError::InvalidHierarchy {
                    name: desc.name,
                    reason: format!("superclass '{}' must be a class extended by a class", sup.name()),
                });
            }
        }
        for &iface in &desc.interfaces {
            let sup = self.get_type(iface).ok_or(UniverseError::UnknownType(iface))?;
            if !sup.is_interface() || desc.kind == TypeKind::Primitive {
                return Err(UniverseError::InvalidHierarchy {
                    name: desc.name,
                    reason: format!("'{}' is not an implementable interface", sup.name()),
                });
            }
        }
        if let Some(enclosing) = desc.enclosing {
            self.get_type(enclosing).ok_or(UniverseError::UnknownType(enclosing))?;
        }

        let id = TypeId::from_index(self.types.len());
        trace!(%id, name = %desc.name, kind = ?desc.kind, "register type");
        self.type_index.insert(desc.name.clone(), id);
        self.types.push(AnalysisType {
            id,
            name: desc.name,
            kind: desc.kind,
            is_abstract: desc.is_abstract,
            superclass: desc.superclass,
            interfaces: desc.interfaces,
            enclosing: desc.enclosing,
            annotations: desc.annotations,
            declared_methods: Vec::new(),
            declared_fields: Vec::new(),
            reachability: Reachability::new(),
        });
        Ok(id)
    }

    /// Register a method. Qualified name `Type.name(P1, P2)` is the identity key.
    pub fn register_method(&mut self, desc: MethodDescriptor) -> UniverseResult<MethodId> {
        let declaring = self
            .get_type(desc.declaring)
            .ok_or(UniverseError::UnknownType(desc.declaring))?;
        let mut params = Vec::with_capacity(desc.parameter_types.len());
        for &param in &desc.parameter_types {
            params.push(
                self.get_type(param)
                    .ok_or(UniverseError::UnknownType(param))?
                    .name(),
            );
        }
        if let Some(ret) = desc.return_type {
            self.get_type(ret).ok_or(UniverseError::UnknownType(ret))?;
        }

        let qualified_name = format!("{}.{}({})", declaring.name(), desc.name, params.join(", "));
        if let Some(&id) = self.method_index.get(&qualified_name) {
            return Ok(id);
        }

        let id = MethodId::from_index(self.methods.len());
        trace!(%id, name = %qualified_name, "register method");
        self.method_index.insert(qualified_name.clone(), id);
        self.types[desc.declaring.index()].declared_methods.push(id);
        self.methods.push(AnalysisMethod {
            id,
            declaring: desc.declaring,
            name: desc.name,
            qualified_name,
            parameter_types: desc.parameter_types,
            return_type: desc.return_type,
            modifiers: desc.modifiers,
            entry_point: desc.entry_point,
            annotations: desc.annotations,
            reachability: Reachability::new(),
            invoked_by: Vec::new(),
        });
        Ok(id)
    }

    /// Register a field. Qualified name `Type.name` is the identity key.
    pub fn register_field(&mut self, desc: FieldDescriptor) -> UniverseResult<FieldId> {
        let declaring = self
            .get_type(desc.declaring)
            .ok_or(UniverseError::UnknownType(desc.declaring))?;
        self.get_type(desc.declared_type)
            .ok_or(UniverseError::UnknownType(desc.declared_type))?;

        let qualified_name = format!("{}.{}", declaring.name(), desc.name);
        if let Some(&id) = self.field_index.get(&qualified_name) {
            return Ok(id);
        }

        let id = FieldId::from_index(self.fields.len());
        trace!(%id, name = %qualified_name, "register field");
        self.field_index.insert(qualified_name.clone(), id);
        self.types[desc.declaring.index()].declared_fields.push(id);
        self.fields.push(AnalysisField {
            id,
            declaring: desc.declaring,
            name: desc.name,
            qualified_name,
            declared_type: desc.declared_type,
            is_static: desc.is_static,
            reachability: Reachability::new(),
        });
        Ok(id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Access
    // ═══════════════════════════════════════════════════════════════════════

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn ty(&self, id: TypeId) -> &AnalysisType {
        &self.types[id.index()]
    }

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn method(&self, id: MethodId) -> &AnalysisMethod {
        &self.methods[id.index()]
    }

    /// # Panics
    /// If `id` was not issued by this universe
    pub fn field(&self, id: FieldId) -> &AnalysisField {
        &self.fields[id.index()]
    }

    pub fn get_type(&self, id: TypeId) -> Option<&AnalysisType> {
        self.types.get(id.index())
    }

    pub fn get_method(&self, id: MethodId) -> Option<&AnalysisMethod> {
        self.methods.get(id.index())
    }

    pub fn get_field(&self, id: FieldId) -> Option<&AnalysisField> {
        self.fields.get(id.index())
    }

    pub fn types(&self) -> &[AnalysisType] {
        &self.types
    }

    pub fn methods(&self) -> &[AnalysisMethod] {
        &self.methods
    }

    pub fn fields(&self) -> &[AnalysisField] {
        &self.fields
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(name).copied()
    }

    /// Lookup by `Type.name(P1, P2)`
    pub fn lookup_method(&self, qualified_name: &str) -> Option<MethodId> {
        self.method_index.get(qualified_name).copied()
    }

    /// Lookup by `Type.name`
    pub fn lookup_field(&self, qualified_name: &str) -> Option<FieldId> {
        self.field_index.get(qualified_name).copied()
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        self.ty(id).name()
    }

    pub fn entry_points(&self) -> Vec<MethodId> {
        self.methods
            .iter()
            .filter(|m| m.is_entry_point())
            .map(|m| m.id())
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Monotonic reachability updates
    // ═══════════════════════════════════════════════════════════════════════

    /// Add `flag` to a type. Supertypes become `Reachable`.
    /// Returns `true` if any flag was newly set.
    pub fn mark_type(&mut self, id: TypeId, flag: ReachabilityFlag) -> bool {
        let mut changed = self.types[id.index()].reachability.mark(flag);
        for sup in self.supertypes(id) {
            changed |= self.types[sup.index()]
                .reachability
                .mark(ReachabilityFlag::Reachable);
        }
        changed
    }

    /// Add `flag` to a method. The declaring type becomes `Reachable`.
    pub fn mark_method(&mut self, id: MethodId, flag: ReachabilityFlag) -> bool {
        let declaring = self.methods[id.index()].declaring;
        let changed = self.methods[id.index()].reachability.mark(flag);
        self.mark_type(declaring, ReachabilityFlag::Reachable) || changed
    }

    /// Add `flag` to a field. The declaring type becomes `Reachable`.
    pub fn mark_field(&mut self, id: FieldId, flag: ReachabilityFlag) -> bool {
        let declaring = self.fields[id.index()].declaring;
        let changed = self.fields[id.index()].reachability.mark(flag);
        self.mark_type(declaring, ReachabilityFlag::Reachable) || changed
    }

    /// Record an internal call edge `caller -> callee`. Returns `true` if new.
    pub fn register_invocation(&mut self, caller: MethodId, callee: MethodId) -> bool {
        let invoked_by = &mut self.methods[callee.index()].invoked_by;
        if invoked_by.contains(&caller) {
            return false;
        }
        invoked_by.push(caller);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Hierarchy queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Transitive supertypes (excluding `id`): superclass chain first, then
    /// interfaces breadth-first
    pub fn supertypes(&self, id: TypeId) -> Vec<TypeId> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();

        let mut current = self.ty(id).superclass;
        queue.extend(self.ty(id).interfaces.iter().copied());
        while let Some(sup) = current {
            if seen.insert(sup) {
                result.push(sup);
            }
            queue.extend(self.ty(sup).interfaces.iter().copied());
            current = self.ty(sup).superclass;
        }
        while let Some(iface) = queue.pop_front() {
            if seen.insert(iface) {
                result.push(iface);
                queue.extend(self.ty(iface).interfaces.iter().copied());
            }
        }
        result
    }

    /// `sub` is `sup` or a transitive subtype of it
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        sub == sup || self.supertypes(sub).contains(&sup)
    }

    /// Sorted ids of every instantiated type
    pub fn instantiated_types(&self) -> Vec<TypeId> {
        self.types
            .iter()
            .filter(|t| t.is_instantiated())
            .map(|t| t.id())
            .collect()
    }

    /// Sorted ids of instantiated types assignable to `declared`
    pub fn instantiated_subtypes(&self, declared: TypeId) -> Vec<TypeId> {
        self.types
            .iter()
            .filter(|t| t.is_instantiated() && self.is_subtype_of(t.id(), declared))
            .map(|t| t.id())
            .collect()
    }

    /// Concrete implementation of `method` for a receiver of exact type
    /// `receiver`: superclass chain first, then default interface methods.
    /// Non-dispatchable methods resolve to themselves when they have a body.
    pub fn resolve_concrete_method(&self, receiver: TypeId, method: MethodId) -> Option<MethodId> {
        let target = self.method(method);
        if !target.is_dispatchable() {
            return target.has_body().then_some(method);
        }

        let mut current = Some(receiver);
        while let Some(ty) = current {
            let found = self.ty(ty).declared_methods.iter().copied().find(|&m| {
                let candidate = self.method(m);
                candidate.is_dispatchable() && candidate.has_body() && candidate.same_signature(target)
            });
            if found.is_some() {
                return found;
            }
            current = self.ty(ty).superclass;
        }

        self.supertypes(receiver)
            .into_iter()
            .filter(|&sup| self.ty(sup).is_interface())
            .find_map(|iface| {
                self.ty(iface).declared_methods.iter().copied().find(|&m| {
                    let candidate = self.method(m);
                    candidate.has_body() && !candidate.is_static() && candidate.same_signature(target)
                })
            })
    }

    /// Render a type state as `[a.B, c.D]`
    pub fn format_type_state(&self, state: &TypeState) -> String {
        state.display_with(|ty| self.type_name(ty))
    }
}
