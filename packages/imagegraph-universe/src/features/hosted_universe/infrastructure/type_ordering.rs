//! Type-id ordering
//!
//! Classes (and primitives) are numbered by a pre-order walk of the
//! superclass tree so every class subtree occupies one contiguous id range.
//! Interfaces follow, numbered by a pre-order walk of the super-interface
//! forest. Roots and children are visited in name order.

use crate::features::analysis_universe::AnalysisUniverse;
use crate::shared::models::TypeId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

/// Supertype -> subtype edges over the included types of one kind
struct HierarchyForest<'a> {
    universe: &'a AnalysisUniverse,
    graph: DiGraph<TypeId, ()>,
}

impl<'a> HierarchyForest<'a> {
    fn new(universe: &'a AnalysisUniverse, members: &[TypeId], parents: impl Fn(TypeId) -> Vec<TypeId>) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes: FxHashMap<TypeId, NodeIndex> = FxHashMap::default();
        for &ty in members {
            nodes.insert(ty, graph.add_node(ty));
        }
        for &ty in members {
            for parent in parents(ty) {
                // Parents outside the member set make `ty` a root
                if let Some(&from) = nodes.get(&parent) {
                    graph.add_edge(from, nodes[&ty], ());
                }
            }
        }
        Self { universe, graph }
    }

    fn sorted_by_name(&self, mut nodes: Vec<NodeIndex>) -> Vec<NodeIndex> {
        nodes.sort_by(|&a, &b| {
            self.universe
                .type_name(self.graph[a])
                .cmp(self.universe.type_name(self.graph[b]))
        });
        nodes.dedup();
        nodes
    }

    fn preorder(&self) -> Vec<TypeId> {
        let roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&n| self.graph.neighbors_directed(n, Direction::Incoming).next().is_none())
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut visited = FxHashSet::default();
        let mut stack: Vec<NodeIndex> = self.sorted_by_name(roots).into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            // Interfaces with several super-interfaces are reached more than once
            if !visited.insert(node) {
                continue;
            }
            order.push(self.graph[node]);
            let children = self.sorted_by_name(self.graph.neighbors_directed(node, Direction::Outgoing).collect());
            stack.extend(children.into_iter().rev().filter(|c| !visited.contains(c)));
        }
        order
    }
}

/// Hosted numbering of `included`: position in the result is the hosted id
pub fn order_types(universe: &AnalysisUniverse, included: &FxHashSet<TypeId>) -> Vec<TypeId> {
    let mut classes = Vec::new();
    let mut interfaces = Vec::new();
    for &ty in included {
        if universe.ty(ty).is_interface() {
            interfaces.push(ty);
        } else {
            classes.push(ty);
        }
    }
    classes.sort_unstable();
    interfaces.sort_unstable();

    let class_forest = HierarchyForest::new(universe, &classes, |ty| universe.ty(ty).superclass().into_iter().collect());
    let interface_forest = HierarchyForest::new(universe, &interfaces, |ty| universe.ty(ty).interfaces().to_vec());

    let mut order = class_forest.preorder();
    order.extend(interface_forest.preorder());
    order
}
