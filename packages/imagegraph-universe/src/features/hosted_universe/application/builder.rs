//! Universe Builder
//!
//! Turns the converged analysis universe into the compilation universe in one
//! pass: choose the hosted element set, number types in hierarchy order,
//! encode type-check ranges, lay out dispatch tables and resolve the
//! implementations of every method.

use crate::config::{UniverseConfig, ValidatedConfig};
use crate::errors::{BuildError, Result};
use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::hosted_universe::domain::{
    encode_ranges, HostedField, HostedFieldId, HostedMethod, HostedMethodId, HostedType,
    HostedTypeId, HostedUniverse, TypeCheckRange,
};
use crate::features::hosted_universe::infrastructure::{build_dispatch_tables, order_types};
use crate::shared::models::{FieldId, MethodId, TypeId};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct UniverseBuilder {
    config: UniverseConfig,
    main_entry_point: Option<String>,
}

impl UniverseBuilder {
    pub fn new(config: UniverseConfig) -> Self {
        Self {
            config,
            main_entry_point: None,
        }
    }

    pub fn from_config(config: &ValidatedConfig) -> Self {
        let builder = Self::new(config.universe());
        match config.main_entry_point() {
            Some(name) => builder.main_entry_point(name),
            None => builder,
        }
    }

    /// Builder: Require a named main entry point (`Type.name(Params)`)
    pub fn main_entry_point(mut self, qualified_name: impl Into<String>) -> Self {
        self.main_entry_point = Some(qualified_name.into());
        self
    }

    pub fn build(&self, universe: &AnalysisUniverse) -> Result<HostedUniverse> {
        let entry_points = universe.entry_points();
        if entry_points.is_empty() {
            return Err(BuildError::NoEntryPoints);
        }
        let main = self.resolve_main(universe)?;

        let methods: Vec<MethodId> = universe
            .methods()
            .iter()
            .filter(|m| m.is_reachable() || m.is_entry_point())
            .map(|m| m.id())
            .collect();
        let fields: Vec<FieldId> = universe
            .fields()
            .iter()
            .filter(|f| f.is_reachable())
            .map(|f| f.id())
            .collect();

        let included = hosted_type_set(universe, &methods, &fields);
        let order = order_types(universe, &included);
        let type_map: FxHashMap<TypeId, HostedTypeId> = order
            .iter()
            .enumerate()
            .map(|(pos, &ty)| (ty, HostedTypeId::from_index(pos)))
            .collect();

        let ranges = type_check_ranges(universe, &order, &type_map);
        let tables = build_dispatch_tables(universe, &order, &ranges);
        debug!(types = order.len(), dispatchable = tables.slots.len(), "Laid out dispatch tables");

        let mut methods = methods;
        methods.sort_by(|&a, &b| {
            let (ma, mb) = (universe.method(a), universe.method(b));
            type_map[&ma.declaring_type()]
                .cmp(&type_map[&mb.declaring_type()])
                .then_with(|| ma.qualified_name().cmp(mb.qualified_name()))
        });
        let method_map: FxHashMap<MethodId, HostedMethodId> = methods
            .iter()
            .enumerate()
            .map(|(pos, &m)| (m, HostedMethodId::from_index(pos)))
            .collect();

        let mut fields = fields;
        fields.sort_by(|&a, &b| {
            let (fa, fb) = (universe.field(a), universe.field(b));
            type_map[&fa.declaring_type()]
                .cmp(&type_map[&fb.declaring_type()])
                .then_with(|| fa.name().cmp(fb.name()))
        });
        let field_map: FxHashMap<FieldId, HostedFieldId> = fields
            .iter()
            .enumerate()
            .map(|(pos, &f)| (f, HostedFieldId::from_index(pos)))
            .collect();

        let hosted_types = order
            .iter()
            .zip(ranges)
            .zip(tables.vtables)
            .enumerate()
            .map(|(pos, ((&ty, type_check_ranges), vtable))| {
                let t = universe.ty(ty);
                HostedType {
                    id: HostedTypeId::from_index(pos),
                    analysis: ty,
                    name: t.name().to_string(),
                    kind: t.kind(),
                    is_abstract: t.is_abstract(),
                    is_instantiated: t.is_instantiated(),
                    superclass: t.superclass().and_then(|s| type_map.get(&s).copied()),
                    interfaces: t.interfaces().iter().filter_map(|i| type_map.get(i).copied()).collect(),
                    type_check_ranges,
                    vtable: vtable
                        .into_iter()
                        .map(|slot| slot.and_then(|m| method_map.get(&m).copied()))
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        let hosted_methods = methods
            .iter()
            .enumerate()
            .map(|(pos, &m)| {
                let method = universe.method(m);
                let id = HostedMethodId::from_index(pos);
                let vtable_index = tables.slots.get(&m).copied();
                let implementations = match vtable_index {
                    Some(_) => dispatch_targets(universe, &order, &hosted_types, &type_map, &method_map, m),
                    None if method.has_body() => vec![id],
                    None => Vec::new(),
                };
                HostedMethod {
                    id,
                    analysis: m,
                    declaring: type_map[&method.declaring_type()],
                    name: method.name().to_string(),
                    qualified_name: method.qualified_name().to_string(),
                    has_body: method.has_body(),
                    is_entry_point: method.is_entry_point(),
                    vtable_index,
                    implementations,
                    compiled: Mutex::new(None),
                }
            })
            .collect();

        let hosted_fields = fields
            .iter()
            .enumerate()
            .map(|(pos, &f)| {
                let field = universe.field(f);
                HostedField {
                    id: HostedFieldId::from_index(pos),
                    analysis: f,
                    declaring: type_map[&field.declaring_type()],
                    name: field.name().to_string(),
                    qualified_name: field.qualified_name().to_string(),
                    declared_type: type_map.get(&field.declared_type()).copied(),
                    is_static: field.is_static(),
                }
            })
            .collect();

        let mut hosted_entry_points: Vec<HostedMethodId> =
            entry_points.iter().filter_map(|m| method_map.get(m).copied()).collect();
        hosted_entry_points.sort_unstable();

        let hosted = HostedUniverse {
            types: hosted_types,
            methods: hosted_methods,
            fields: hosted_fields,
            main_entry_point: main.and_then(|m| method_map.get(&m).copied()),
            type_map,
            method_map,
            field_map,
            entry_points: hosted_entry_points,
        };

        info!(
            types = hosted.types.len(),
            methods = hosted.methods.len(),
            fields = hosted.fields.len(),
            entry_points = hosted.entry_points.len(),
            "Built hosted universe"
        );
        if self.config.print_universe {
            hosted.print_universe();
        }
        Ok(hosted)
    }

    fn resolve_main(&self, universe: &AnalysisUniverse) -> Result<Option<MethodId>> {
        let Some(name) = &self.main_entry_point else {
            return Ok(None);
        };
        universe
            .lookup_method(name)
            .filter(|&m| universe.method(m).is_entry_point())
            .map(Some)
            .ok_or_else(|| BuildError::MainEntryPointNotFound { name: name.clone() })
    }
}

/// Reachable types, declaring types of hosted members, and all their supertypes
fn hosted_type_set(universe: &AnalysisUniverse, methods: &[MethodId], fields: &[FieldId]) -> FxHashSet<TypeId> {
    let mut seeds: Vec<TypeId> = universe
        .types()
        .iter()
        .filter(|t| t.is_reachable())
        .map(|t| t.id())
        .collect();
    seeds.extend(methods.iter().map(|&m| universe.method(m).declaring_type()));
    seeds.extend(fields.iter().map(|&f| universe.field(f).declaring_type()));

    let mut included = FxHashSet::default();
    for ty in seeds {
        if included.insert(ty) {
            included.extend(universe.supertypes(ty));
        }
    }
    included
}

fn type_check_ranges(
    universe: &AnalysisUniverse,
    order: &[TypeId],
    type_map: &FxHashMap<TypeId, HostedTypeId>,
) -> Vec<Vec<TypeCheckRange>> {
    let mut members: Vec<Vec<u32>> = (0..order.len()).map(|pos| vec![pos as u32]).collect();
    for (pos, &ty) in order.iter().enumerate() {
        for sup in universe.supertypes(ty) {
            if let Some(sup_id) = type_map.get(&sup) {
                members[sup_id.index()].push(pos as u32);
            }
        }
    }
    members.into_iter().map(encode_ranges).collect()
}

/// Concrete targets of a dispatchable method over instantiated subtypes
fn dispatch_targets(
    universe: &AnalysisUniverse,
    order: &[TypeId],
    hosted_types: &[HostedType],
    type_map: &FxHashMap<TypeId, HostedTypeId>,
    method_map: &FxHashMap<MethodId, HostedMethodId>,
    method: MethodId,
) -> Vec<HostedMethodId> {
    let declaring = type_map[&universe.method(method).declaring_type()];
    let mut targets: Vec<HostedMethodId> = hosted_types[declaring.index()]
        .type_check_ranges
        .iter()
        .flat_map(|r| r.start as usize..r.end as usize)
        .filter(|&pos| universe.ty(order[pos]).is_concrete_class() && hosted_types[pos].is_instantiated)
        .filter_map(|pos| universe.resolve_concrete_method(order[pos], method))
        .filter_map(|m| method_map.get(&m).copied())
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}
