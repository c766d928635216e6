//! Built-in reflection feature
//!
//! Keeps reflectively accessed elements alive: every configured type becomes
//! reachable, configured methods become analysis roots and configured fields
//! are treated as accessed.

use crate::config::ReflectionConfig;
use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::feature_hooks::domain::access::{
    AfterAnalysisAccess, AnalysisAccess, DuringAnalysisAccess,
};
use crate::features::feature_hooks::infrastructure::reflection_config::{
    ReflectionConfigurationParser, ReflectionEntry,
};
use crate::features::feature_hooks::ports::{Feature, FeatureError, FeatureResult};
use crate::shared::models::{FieldId, MethodId, ReachabilityFlag, TypeId};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

pub struct ReflectionFeature {
    config: ReflectionConfig,
    entries: Vec<ReflectionEntry>,
    types: FxHashSet<TypeId>,
    methods: FxHashSet<MethodId>,
    fields: FxHashSet<FieldId>,
    sealed: bool,
}

impl ReflectionFeature {
    pub const NAME: &'static str = "reflection";

    pub fn new(config: ReflectionConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            types: FxHashSet::default(),
            methods: FxHashSet::default(),
            fields: FxHashSet::default(),
            sealed: false,
        }
    }

    /// Register an entry programmatically. Fails once analysis has finished.
    pub fn register(&mut self, entry: ReflectionEntry) -> FeatureResult {
        if self.sealed {
            return Err(FeatureError::LateRegistration {
                feature: Self::NAME.to_string(),
                element: entry.name,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[ReflectionEntry] {
        &self.entries
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Types registered for reflection, sorted
    pub fn registered_types(&self) -> Vec<TypeId> {
        sorted(&self.types)
    }

    pub fn registered_methods(&self) -> Vec<MethodId> {
        sorted(&self.methods)
    }

    pub fn registered_fields(&self) -> Vec<FieldId> {
        sorted(&self.fields)
    }

    fn annotation_entries(&self, universe: &AnalysisUniverse) -> Vec<ReflectionEntry> {
        universe
            .types()
            .iter()
            .flat_map(|ty| {
                ty.annotations().iter().filter_map(move |annotation| {
                    ReflectionConfigurationParser::parse_annotation(
                        &self.config.annotation,
                        ty.name(),
                        annotation,
                    )
                })
            })
            .collect()
    }

    /// Mark everything `entry` names. Returns `true` if anything changed.
    fn apply(&mut self, universe: &mut AnalysisUniverse, entry: &ReflectionEntry) -> bool {
        let Some(ty) = universe.lookup_type(&entry.name) else {
            return false;
        };
        let mut changed = universe.mark_type(ty, ReachabilityFlag::Reachable);
        self.types.insert(ty);

        let methods: Vec<MethodId> = universe
            .ty(ty)
            .declared_methods()
            .iter()
            .copied()
            .filter(|&m| entry.all_declared_methods || matches_method(universe, m, entry))
            .collect();
        for method in methods {
            changed |= universe.mark_method(method, ReachabilityFlag::Invoked);
            self.methods.insert(method);
        }

        let fields: Vec<FieldId> = universe
            .ty(ty)
            .declared_fields()
            .iter()
            .copied()
            .filter(|&f| {
                entry.all_declared_fields
                    || entry.fields.iter().any(|e| e.name == universe.field(f).name())
            })
            .collect();
        for field in fields {
            changed |= universe.mark_field(field, ReachabilityFlag::Accessed);
            self.fields.insert(field);
        }

        changed
    }
}

fn matches_method(universe: &AnalysisUniverse, method: MethodId, entry: &ReflectionEntry) -> bool {
    let m = universe.method(method);
    entry.methods.iter().any(|e| {
        e.name == m.name()
            && e.parameter_types.as_ref().map_or(true, |params| {
                params.len() == m.parameter_count()
                    && params
                        .iter()
                        .zip(m.parameter_types())
                        .all(|(name, &ty)| name == universe.type_name(ty))
            })
    })
}

fn sorted<T: Copy + Ord>(set: &FxHashSet<T>) -> Vec<T> {
    let mut v: Vec<T> = set.iter().copied().collect();
    v.sort_unstable();
    v
}

impl Feature for ReflectionFeature {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn during_setup(&mut self, access: &mut AnalysisAccess<'_>) -> FeatureResult {
        if !self.config.enabled {
            debug!("reflection feature disabled");
            return Ok(());
        }

        let annotated = self.annotation_entries(access.universe());
        let from_files =
            ReflectionConfigurationParser::parse_files(Self::NAME, &self.config.configuration_files)?;
        info!(
            annotated = annotated.len(),
            configured = from_files.len(),
            files = self.config.configuration_files.len(),
            "reflection configuration loaded"
        );

        self.entries.extend(annotated);
        self.entries.extend(from_files);
        Ok(())
    }

    fn during_analysis(&mut self, access: &mut DuringAnalysisAccess<'_>) -> FeatureResult {
        let entries = std::mem::take(&mut self.entries);
        let mut changed = false;
        for entry in &entries {
            changed |= self.apply(access.universe_mut(), entry);
        }
        self.entries = entries;

        if changed {
            debug!(
                types = self.types.len(),
                methods = self.methods.len(),
                fields = self.fields.len(),
                "reflection registrations grew"
            );
            access.require_analysis_iteration();
        }
        Ok(())
    }

    fn after_analysis(&mut self, access: &AfterAnalysisAccess<'_>) -> FeatureResult {
        self.sealed = true;
        for entry in &self.entries {
            if access.universe().lookup_type(&entry.name).is_none() {
                warn!(name = %entry.name, "reflection configuration names unknown type");
                access.report_unsupported(
                    entry.name.clone(),
                    format!("Reflection configuration names unknown type {}", entry.name),
                );
            }
        }
        Ok(())
    }
}
