//! Virtual dispatch table layout
//!
//! A reachable, dispatchable method that overrides nothing is a root and
//! takes the lowest slot that is free in its declaring type and every
//! subtype. Overriding methods share the slot of the first root found among
//! their supertypes (superclass chain, then interfaces). Tables are filled
//! only for instantiated concrete classes, by resolving each slot's root
//! against the receiver type.

use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::hosted_universe::domain::TypeCheckRange;
use crate::shared::models::{MethodId, TypeId};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct DispatchTables {
    /// Slot of every dispatchable method
    pub slots: FxHashMap<MethodId, usize>,
    /// Resolved tables, indexed like the type order; `None` marks a slot
    /// whose implementation is unreachable
    pub vtables: Vec<Vec<Option<MethodId>>>,
}

fn is_dispatchable(universe: &AnalysisUniverse, method: MethodId) -> bool {
    let m = universe.method(method);
    m.is_dispatchable() && m.is_reachable()
}

fn overridden_in(universe: &AnalysisUniverse, sup: TypeId, method: MethodId) -> impl Iterator<Item = MethodId> + '_ {
    let target = universe.method(method);
    universe
        .ty(sup)
        .declared_methods()
        .iter()
        .copied()
        .filter(move |&m| is_dispatchable(universe, m) && universe.method(m).same_signature(target))
}

/// Lay out dispatch tables for types in hosted order.
/// `ranges[i]` holds the positions of every subtype of `order[i]`, itself included.
pub fn build_dispatch_tables(
    universe: &AnalysisUniverse,
    order: &[TypeId],
    ranges: &[Vec<TypeCheckRange>],
) -> DispatchTables {
    let mut slots: FxHashMap<MethodId, usize> = FxHashMap::default();
    // Per type: slot -> root occupying it
    let mut slot_roots: Vec<FxHashMap<usize, MethodId>> = vec![FxHashMap::default(); order.len()];
    let mut overriders: Vec<(TypeId, MethodId)> = Vec::new();

    for (pos, &ty) in order.iter().enumerate() {
        let mut declared: Vec<MethodId> = universe
            .ty(ty)
            .declared_methods()
            .iter()
            .copied()
            .filter(|&m| is_dispatchable(universe, m))
            .collect();
        declared.sort_by(|&a, &b| universe.method(a).qualified_name().cmp(universe.method(b).qualified_name()));

        for method in declared {
            let overrides = universe
                .supertypes(ty)
                .into_iter()
                .any(|sup| overridden_in(universe, sup, method).next().is_some());
            if overrides {
                overriders.push((ty, method));
                continue;
            }

            let subtypes: Vec<usize> = ranges[pos]
                .iter()
                .flat_map(|r| r.start as usize..r.end as usize)
                .collect();
            let slot = (0..)
                .find(|slot| subtypes.iter().all(|&t| !slot_roots[t].contains_key(slot)))
                .unwrap_or_default();
            for t in subtypes {
                slot_roots[t].insert(slot, method);
            }
            slots.insert(method, slot);
        }
    }

    for (ty, method) in overriders {
        let root_slot = universe
            .supertypes(ty)
            .into_iter()
            .flat_map(|sup| overridden_in(universe, sup, method).collect::<Vec<_>>())
            .find_map(|root| slots.get(&root).copied());
        match root_slot {
            Some(slot) => {
                slots.insert(method, slot);
            }
            None => debug!(method = %universe.method(method).qualified_name(), "override without root slot"),
        }
    }

    let vtables = order
        .iter()
        .enumerate()
        .map(|(pos, &ty)| {
            let analysis_type = universe.ty(ty);
            if !(analysis_type.is_concrete_class() && analysis_type.is_instantiated()) {
                return Vec::new();
            }
            let len = slot_roots[pos].keys().max().map_or(0, |&max| max + 1);
            let mut table = vec![None; len];
            for (&slot, &root) in &slot_roots[pos] {
                table[slot] = universe
                    .resolve_concrete_method(ty, root)
                    .filter(|&m| universe.method(m).is_reachable());
            }
            table
        })
        .collect();

    DispatchTables { slots, vtables }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::analysis_universe::{MethodDescriptor, TypeDescriptor};
    use crate::features::hosted_universe::domain::encode_ranges;
    use crate::shared::models::ReachabilityFlag;

    /// Object <- Animal (abstract, speak/name) <- Dog (speak) ; Pet iface (play) <- Dog
    #[test]
    fn test_roots_and_overrides_share_slots() {
        let mut u = AnalysisUniverse::new();
        let object = u.register_type(TypeDescriptor::class("java.lang.Object")).unwrap();
        let pet = u.register_type(TypeDescriptor::interface("app.Pet")).unwrap();
        let animal = u.register_type(TypeDescriptor::abstract_class("app.Animal").extends(object)).unwrap();
        let dog = u.register_type(TypeDescriptor::class("app.Dog").extends(animal).implements(pet)).unwrap();

        let speak = u.register_method(MethodDescriptor::new(animal, "speak").abstract_method()).unwrap();
        let name = u.register_method(MethodDescriptor::new(animal, "name")).unwrap();
        let play = u.register_method(MethodDescriptor::new(pet, "play").abstract_method()).unwrap();
        let dog_speak = u.register_method(MethodDescriptor::new(dog, "speak")).unwrap();
        let dog_play = u.register_method(MethodDescriptor::new(dog, "play")).unwrap();

        for m in [speak, name, play] {
            u.mark_method(m, ReachabilityFlag::Invoked);
        }
        for m in [dog_speak, dog_play] {
            u.mark_method(m, ReachabilityFlag::ImplementationInvoked);
        }
        u.mark_type(dog, ReachabilityFlag::Instantiated);

        // Object(0) Animal(1) Dog(2) Pet(3)
        let order = vec![object, animal, dog, pet];
        let ranges = vec![
            encode_ranges(vec![0, 1, 2]),
            encode_ranges(vec![1, 2]),
            encode_ranges(vec![2]),
            encode_ranges(vec![2, 3]),
        ];
        let tables = build_dispatch_tables(&u, &order, &ranges);

        assert_eq!(tables.slots[&name], 0);
        assert_eq!(tables.slots[&speak], 1);
        assert_eq!(tables.slots[&dog_speak], 1);
        assert_eq!(tables.slots[&play], 2);
        assert_eq!(tables.slots[&dog_play], 2);

        assert_eq!(tables.vtables[2], vec![Some(name), Some(dog_speak), Some(dog_play)]);
        assert!(tables.vtables[1].is_empty());
        assert!(tables.vtables[3].is_empty());
    }

    #[test]
    fn test_unrelated_roots_reuse_slots() {
        let mut u = AnalysisUniverse::new();
        let a = u.register_type(TypeDescriptor::class("app.A")).unwrap();
        let b = u.register_type(TypeDescriptor::class("app.B")).unwrap();
        let fa = u.register_method(MethodDescriptor::new(a, "f")).unwrap();
        let gb = u.register_method(MethodDescriptor::new(b, "g")).unwrap();
        let hidden = u.register_method(MethodDescriptor::new(b, "h").private()).unwrap();
        for m in [fa, gb, hidden] {
            u.mark_method(m, ReachabilityFlag::Invoked);
        }

        let tables = build_dispatch_tables(&u, &[a, b], &[encode_ranges(vec![0]), encode_ranges(vec![1])]);
        assert_eq!(tables.slots[&fa], 0);
        assert_eq!(tables.slots[&gb], 0);
        assert!(!tables.slots.contains_key(&hidden));
    }
}
