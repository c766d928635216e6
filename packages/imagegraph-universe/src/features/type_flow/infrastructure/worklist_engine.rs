//! Worklist Type-Flow Engine
//!
//! Inclusion-based (Andersen-style) propagation of concrete types over a flow
//! graph whose nodes are method locals, parameters, receivers, return values
//! and fields. Method bodies are linked lazily as methods become reachable,
//! and virtual calls are resolved per receiver type as types reach the
//! receiver.
//!
//! # Complexity
//! - Propagation: O(E * T) per run, E flow edges, T instantiated types
//! - Virtual resolution: one lookup per (call site, receiver type) pair
//!
//! # References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Wimmer et al. "Points-to Analysis for Java" (closed-world image builders)

use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::diagnostics::UnsupportedFeatures;
use crate::features::type_flow::domain::{FlowProgram, FlowStatement, InvokeKind, Local};
use crate::features::type_flow::ports::{EngineError, TypeFlowEngine};
use crate::shared::models::{FieldId, MethodId, ReachabilityFlag, TypeId, TypeState};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, trace};

/// Node of the flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FlowNode {
    Local(MethodId, Local),
    Param(MethodId, usize),
    Receiver(MethodId),
    Return(MethodId),
    Field(FieldId),
}

/// Virtual call waiting for receiver types
#[derive(Debug, Clone)]
struct VirtualSite {
    caller: MethodId,
    target: MethodId,
    receiver: FlowNode,
    args: Vec<FlowNode>,
    result: Option<FlowNode>,
    resolved: FxHashSet<TypeId>,
}

/// Statistics for the worklist engine
#[derive(Debug, Clone, Default)]
pub struct WorklistEngineStats {
    pub runs: usize,
    pub linked_methods: usize,
    pub propagations: usize,
    pub resolved_virtual_calls: usize,
    pub duration_ms: f64,
}

/// Reference type-flow engine
pub struct WorklistTypeFlowEngine {
    /// Bodies by method
    program: FlowProgram,

    /// Type sets (node → concrete types)
    states: FxHashMap<FlowNode, FxHashSet<TypeId>>,

    /// Inclusion edges (source → {targets})
    edges: FxHashMap<FlowNode, FxHashSet<FlowNode>>,

    /// Methods whose bodies are already part of the graph
    linked: FxHashSet<MethodId>,

    virtual_sites: Vec<VirtualSite>,

    /// Nodes whose successors may be missing types
    pending: VecDeque<FlowNode>,

    stats: WorklistEngineStats,
}

impl WorklistTypeFlowEngine {
    pub fn new(program: FlowProgram) -> Self {
        Self {
            program,
            states: FxHashMap::default(),
            edges: FxHashMap::default(),
            linked: FxHashSet::default(),
            virtual_sites: Vec::new(),
            pending: VecDeque::new(),
            stats: WorklistEngineStats::default(),
        }
    }

    pub fn stats(&self) -> &WorklistEngineStats {
        &self.stats
    }

    /// Program the engine links bodies from. Features may add bodies for
    /// methods they make reachable.
    pub fn program_mut(&mut self) -> &mut FlowProgram {
        &mut self.program
    }

    pub fn is_linked(&self, method: MethodId) -> bool {
        self.linked.contains(&method)
    }

    fn add_edge(&mut self, from: FlowNode, to: FlowNode) {
        if from == to {
            return;
        }
        if self.edges.entry(from).or_default().insert(to) {
            self.pending.push_back(from);
        }
    }

    fn seed(&mut self, node: FlowNode, ty: TypeId) -> bool {
        let inserted = self.states.entry(node).or_default().insert(ty);
        if inserted {
            self.pending.push_back(node);
        }
        inserted
    }

    /// Link bodies of methods that became reachable since the last call
    fn link_reachable_methods(
        &mut self,
        universe: &mut AnalysisUniverse,
        unsupported: &UnsupportedFeatures,
    ) -> Result<bool, EngineError> {
        let roots: Vec<MethodId> = universe
            .methods()
            .iter()
            .filter(|m| (m.is_reachable() || m.is_entry_point()) && !self.linked.contains(&m.id()))
            .map(|m| m.id())
            .collect();
        if roots.is_empty() {
            return Ok(false);
        }

        for method in roots {
            self.linked.insert(method);
            self.stats.linked_methods += 1;
            if universe.method(method).is_entry_point() {
                universe.mark_method(method, ReachabilityFlag::Invoked);
            }
            if !universe.method(method).has_body() {
                continue;
            }
            let Some(body) = self.program.body(method).cloned() else {
                debug!(method = %universe.method(method).qualified_name(), "no flow body, treated as opaque");
                continue;
            };
            trace!(method = %universe.method(method).qualified_name(), statements = body.statements().len(), "link body");
            for statement in body.statements() {
                self.link_statement(method, statement, universe, unsupported)?;
            }
        }
        Ok(true)
    }

    fn link_statement(
        &mut self,
        method: MethodId,
        statement: &FlowStatement,
        universe: &mut AnalysisUniverse,
        unsupported: &UnsupportedFeatures,
    ) -> Result<(), EngineError> {
        match statement {
            FlowStatement::New { ty, dest } => {
                universe.mark_type(*ty, ReachabilityFlag::Instantiated);
                self.seed(FlowNode::Local(method, *dest), *ty);
            }
            FlowStatement::Copy { from, to } => {
                self.add_edge(FlowNode::Local(method, *from), FlowNode::Local(method, *to));
            }
            FlowStatement::LoadReceiver { dest } => {
                if universe.method(method).is_static() {
                    return Err(EngineError::MalformedProgram {
                        method: universe.method(method).qualified_name().to_string(),
                        reason: "static method has no receiver".to_string(),
                    });
                }
                self.add_edge(FlowNode::Receiver(method), FlowNode::Local(method, *dest));
            }
            FlowStatement::LoadParam { index, dest } => {
                if *index >= universe.method(method).parameter_count() {
                    return Err(EngineError::MalformedProgram {
                        method: universe.method(method).qualified_name().to_string(),
                        reason: format!("parameter index {} out of range", index),
                    });
                }
                self.add_edge(FlowNode::Param(method, *index), FlowNode::Local(method, *dest));
            }
            FlowStatement::Return { src } => {
                self.add_edge(FlowNode::Local(method, *src), FlowNode::Return(method));
            }
            FlowStatement::LoadField { field, dest } => {
                universe.mark_field(*field, ReachabilityFlag::Accessed);
                self.add_edge(FlowNode::Field(*field), FlowNode::Local(method, *dest));
            }
            FlowStatement::StoreField { field, src } => {
                universe.mark_field(*field, ReachabilityFlag::Accessed);
                self.add_edge(FlowNode::Local(method, *src), FlowNode::Field(*field));
            }
            FlowStatement::InstanceOf { ty } => {
                universe.mark_type(*ty, ReachabilityFlag::InTypeCheck);
            }
            FlowStatement::Invoke {
                kind,
                target,
                receiver,
                args,
                result,
            } => {
                Self::check_call_shape(universe, method, *kind, *target, receiver.is_some(), args.len())?;
                let args: Vec<FlowNode> = args.iter().map(|a| FlowNode::Local(method, *a)).collect();
                let receiver = receiver.map(|r| FlowNode::Local(method, r));
                let result = result.map(|r| FlowNode::Local(method, r));

                universe.mark_method(*target, ReachabilityFlag::Invoked);
                match kind {
                    InvokeKind::Static | InvokeKind::Special => {
                        universe.register_invocation(method, *target);
                        if let Some(receiver) = receiver {
                            self.add_edge(receiver, FlowNode::Receiver(*target));
                        }
                        self.link_arguments(*target, &args, result);
                    }
                    InvokeKind::Virtual => {
                        if let Some(receiver) = receiver {
                            self.virtual_sites.push(VirtualSite {
                                caller: method,
                                target: *target,
                                receiver,
                                args,
                                result,
                                resolved: FxHashSet::default(),
                            });
                        }
                    }
                }
            }
            FlowStatement::Unsupported { reason } => {
                let name = universe.method(method).qualified_name().to_string();
                unsupported.add_message(
                    name.clone(),
                    Some(method),
                    format!("Unsupported construct in {}: {}", name, reason),
                );
            }
        }
        Ok(())
    }

    fn check_call_shape(
        universe: &AnalysisUniverse,
        caller: MethodId,
        kind: InvokeKind,
        target: MethodId,
        has_receiver: bool,
        arg_count: usize,
    ) -> Result<(), EngineError> {
        let callee = universe.method(target);
        let reason = if callee.parameter_count() != arg_count {
            Some(format!(
                "call to {} passes {} arguments, expected {}",
                callee.qualified_name(),
                arg_count,
                callee.parameter_count()
            ))
        } else if (kind == InvokeKind::Static) != callee.is_static() {
            Some(format!("invoke kind {:?} does not match {}", kind, callee.qualified_name()))
        } else if (kind != InvokeKind::Static) != has_receiver {
            Some(format!("invoke kind {:?} with receiver mismatch", kind))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(EngineError::MalformedProgram {
                method: universe.method(caller).qualified_name().to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn link_arguments(&mut self, callee: MethodId, args: &[FlowNode], result: Option<FlowNode>) {
        for (index, arg) in args.iter().enumerate() {
            self.add_edge(*arg, FlowNode::Param(callee, index));
        }
        if let Some(result) = result {
            self.add_edge(FlowNode::Return(callee), result);
        }
    }

    /// Standard worklist propagation. Returns `true` if any state grew.
    fn propagate(&mut self) -> bool {
        let mut grew = false;
        let mut in_worklist: FxHashSet<FlowNode> = self.pending.iter().copied().collect();

        while let Some(node) = self.pending.pop_front() {
            in_worklist.remove(&node);

            let current: Vec<TypeId> = match self.states.get(&node) {
                Some(types) if !types.is_empty() => types.iter().copied().collect(),
                _ => continue,
            };
            let Some(successors) = self.edges.get(&node).cloned() else {
                continue;
            };

            for succ in successors {
                let succ_types = self.states.entry(succ).or_default();
                let old_len = succ_types.len();
                succ_types.extend(current.iter().copied());
                if succ_types.len() > old_len {
                    grew = true;
                    self.stats.propagations += 1;
                    if in_worklist.insert(succ) {
                        self.pending.push_back(succ);
                    }
                }
            }
        }
        grew
    }

    /// Resolve virtual sites for receiver types seen for the first time
    fn resolve_virtual_calls(&mut self, universe: &mut AnalysisUniverse) -> bool {
        let mut progress = false;

        for index in 0..self.virtual_sites.len() {
            let mut receiver_types: Vec<TypeId> = self
                .states
                .get(&self.virtual_sites[index].receiver)
                .map(|types| types.iter().copied().collect())
                .unwrap_or_default();
            receiver_types.sort_unstable();

            for ty in receiver_types {
                if !self.virtual_sites[index].resolved.insert(ty) {
                    continue;
                }
                progress = true;
                let site = self.virtual_sites[index].clone();
                match universe.resolve_concrete_method(ty, site.target) {
                    Some(callee) => {
                        self.stats.resolved_virtual_calls += 1;
                        universe.mark_method(callee, ReachabilityFlag::ImplementationInvoked);
                        universe.register_invocation(site.caller, callee);
                        self.seed(FlowNode::Receiver(callee), ty);
                        self.link_arguments(callee, &site.args, site.result);
                    }
                    None => {
                        debug!(
                            receiver = %universe.type_name(ty),
                            target = %universe.method(site.target).qualified_name(),
                            "no implementation for receiver type"
                        );
                    }
                }
            }
        }
        progress
    }

    fn state_of(&self, node: FlowNode) -> Option<TypeState> {
        self.states
            .get(&node)
            .map(|types| TypeState::from_types(types.iter().copied()))
    }
}

impl TypeFlowEngine for WorklistTypeFlowEngine {
    fn run_once(
        &mut self,
        universe: &mut AnalysisUniverse,
        unsupported: &UnsupportedFeatures,
    ) -> Result<bool, EngineError> {
        let start = Instant::now();
        self.stats.runs += 1;

        let mut changed = false;
        loop {
            let mut progress = self.link_reachable_methods(universe, unsupported)?;
            progress |= self.propagate();
            progress |= self.resolve_virtual_calls(universe);
            if !progress {
                break;
            }
            changed = true;
        }

        self.stats.duration_ms += start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            run = self.stats.runs,
            changed,
            linked = self.linked.len(),
            propagations = self.stats.propagations,
            "type-flow run finished"
        );
        Ok(changed)
    }

    fn parameter_type_state(&self, method: MethodId, index: usize) -> Option<TypeState> {
        if !self.linked.contains(&method) {
            return None;
        }
        Some(self.state_of(FlowNode::Param(method, index)).unwrap_or_default())
    }

    fn field_type_state(&self, field: FieldId) -> Option<TypeState> {
        self.state_of(FlowNode::Field(field))
    }

    fn name(&self) -> &str {
        "worklist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::analysis_universe::{FieldDescriptor, MethodDescriptor, TypeDescriptor};
    use crate::features::type_flow::domain::MethodBody;

    struct Fixture {
        universe: AnalysisUniverse,
        shape: TypeId,
        circle: TypeId,
        square: TypeId,
        main: MethodId,
        area: MethodId,
        circle_area: MethodId,
        square_area: MethodId,
        holder: FieldId,
    }

    fn fixture() -> Fixture {
        let mut u = AnalysisUniverse::new();
        let object = u.register_type(TypeDescriptor::class("java.lang.Object")).unwrap();
        let shape = u.register_type(TypeDescriptor::interface("app.Shape")).unwrap();
        let circle = u
            .register_type(TypeDescriptor::class("app.Circle").extends(object).implements(shape))
            .unwrap();
        let square = u
            .register_type(TypeDescriptor::class("app.Square").extends(object).implements(shape))
            .unwrap();
        let main_ty = u.register_type(TypeDescriptor::class("app.Main").extends(object)).unwrap();
        let main = u
            .register_method(MethodDescriptor::new(main_ty, "main").static_method().entry_point("main"))
            .unwrap();
        let area = u
            .register_method(MethodDescriptor::new(shape, "area").abstract_method())
            .unwrap();
        let circle_area = u.register_method(MethodDescriptor::new(circle, "area")).unwrap();
        let square_area = u.register_method(MethodDescriptor::new(square, "area")).unwrap();
        let holder = u
            .register_field(FieldDescriptor::new(main_ty, "current", shape).static_field())
            .unwrap();
        Fixture {
            universe: u,
            shape,
            circle,
            square,
            main,
            area,
            circle_area,
            square_area,
            holder,
        }
    }

    #[test]
    fn test_virtual_call_resolves_only_instantiated_receivers() {
        let mut f = fixture();
        let program = FlowProgram::new().with_body(
            f.main,
            MethodBody::new()
                .new_instance(f.circle, 0)
                .store_field(f.holder, 0)
                .load_field(f.holder, 1)
                .invoke_virtual(f.area, 1, vec![], None),
        );
        let mut engine = WorklistTypeFlowEngine::new(program);
        let unsupported = UnsupportedFeatures::new();

        assert!(engine.run_once(&mut f.universe, &unsupported).unwrap());

        let u = &f.universe;
        assert!(u.ty(f.circle).is_instantiated());
        assert!(!u.ty(f.square).is_instantiated());
        assert!(u.method(f.area).is_invoked());
        assert!(u.method(f.circle_area).is_implementation_invoked());
        assert!(!u.method(f.square_area).is_reachable());
        assert_eq!(u.method(f.circle_area).invoked_by(), &[f.main]);
        assert!(u.field(f.holder).is_accessed());
        assert_eq!(engine.field_type_state(f.holder), Some(TypeState::single(f.circle)));

        // Nothing new: a second run is a no-op
        assert!(!engine.run_once(&mut f.universe, &unsupported).unwrap());
        assert!(unsupported.is_empty());
    }

    #[test]
    fn test_new_roots_are_linked_on_next_run() {
        let mut f = fixture();
        let program = FlowProgram::new()
            .with_body(f.main, MethodBody::new())
            .with_body(f.square_area, MethodBody::new().new_instance(f.square, 0));
        let mut engine = WorklistTypeFlowEngine::new(program);
        let unsupported = UnsupportedFeatures::new();

        assert!(engine.run_once(&mut f.universe, &unsupported).unwrap());
        assert!(!f.universe.ty(f.square).is_instantiated());

        f.universe.mark_method(f.square_area, ReachabilityFlag::Invoked);
        assert!(engine.run_once(&mut f.universe, &unsupported).unwrap());
        assert!(f.universe.ty(f.square).is_instantiated());
        assert!(engine.is_linked(f.square_area));
    }

    #[test]
    fn test_unsupported_construct_is_deferred() {
        let mut f = fixture();
        let program = FlowProgram::new().with_body(f.main, MethodBody::new().unsupported("invokedynamic"));
        let mut engine = WorklistTypeFlowEngine::new(program);
        let unsupported = UnsupportedFeatures::new();

        engine.run_once(&mut f.universe, &unsupported).unwrap();
        let messages = unsupported.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key, "app.Main.main()");
        assert!(messages[0].message.contains("invokedynamic"));
    }

    #[test]
    fn test_malformed_call_is_an_error() {
        let mut f = fixture();
        let program = FlowProgram::new().with_body(
            f.main,
            MethodBody::new().invoke_static(f.circle_area, vec![], None),
        );
        let mut engine = WorklistTypeFlowEngine::new(program);
        let err = engine
            .run_once(&mut f.universe, &UnsupportedFeatures::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedProgram { .. }));
    }

    #[test]
    fn test_parameter_state_requires_linked_method() {
        let mut f = fixture();
        let mut engine = WorklistTypeFlowEngine::new(FlowProgram::new());
        assert_eq!(engine.parameter_type_state(f.main, 0), None);
        engine
            .run_once(&mut f.universe, &UnsupportedFeatures::new())
            .unwrap();
        assert_eq!(engine.parameter_type_state(f.main, 0), Some(TypeState::empty()));
        assert_eq!(
            engine.declared_type_state(&f.universe, f.shape),
            TypeState::empty()
        );
    }
}
