//! Test program builders

use imagegraph_universe::features::analysis_universe::{
    AnalysisUniverse, FieldDescriptor, MethodDescriptor, TypeDescriptor,
};
use imagegraph_universe::features::fixpoint::BuildContext;
use imagegraph_universe::features::type_flow::{FlowProgram, MethodBody, WorklistTypeFlowEngine};
use imagegraph_universe::shared::models::{FieldId, MethodId, TypeId};

/// Builds an analysis universe and its flow program side by side.
/// Every class extends `java.lang.Object` unless a parent is given.
pub struct ProgramBuilder {
    universe: AnalysisUniverse,
    program: FlowProgram,
    object: TypeId,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let mut universe = AnalysisUniverse::new();
        let object = universe
            .register_type(TypeDescriptor::class("java.lang.Object"))
            .unwrap();
        Self {
            universe,
            program: FlowProgram::new(),
            object,
        }
    }

    pub fn object(&self) -> TypeId {
        self.object
    }

    pub fn class(&mut self, name: &str) -> TypeId {
        let object = self.object;
        self.subclass(name, object)
    }

    pub fn subclass(&mut self, name: &str, parent: TypeId) -> TypeId {
        self.universe
            .register_type(TypeDescriptor::class(name).extends(parent))
            .unwrap()
    }

    pub fn class_implementing(&mut self, name: &str, interfaces: &[TypeId]) -> TypeId {
        let desc = interfaces.iter().fold(
            TypeDescriptor::class(name).extends(self.object),
            |desc, &iface| desc.implements(iface),
        );
        self.universe.register_type(desc).unwrap()
    }

    pub fn interface(&mut self, name: &str) -> TypeId {
        self.universe.register_type(TypeDescriptor::interface(name)).unwrap()
    }

    pub fn type_from(&mut self, desc: TypeDescriptor) -> TypeId {
        self.universe.register_type(desc).unwrap()
    }

    pub fn method(&mut self, desc: MethodDescriptor) -> MethodId {
        self.universe.register_method(desc).unwrap()
    }

    /// Static entry point `declaring.name()` exported as `name`
    pub fn entry_point(&mut self, declaring: TypeId, name: &str) -> MethodId {
        self.method(MethodDescriptor::new(declaring, name).static_method().entry_point(name))
    }

    pub fn field(&mut self, desc: FieldDescriptor) -> FieldId {
        self.universe.register_field(desc).unwrap()
    }

    pub fn body(&mut self, method: MethodId, body: MethodBody) -> &mut Self {
        self.program.insert(method, body);
        self
    }

    pub fn universe(&self) -> &AnalysisUniverse {
        &self.universe
    }

    pub fn build(self) -> (BuildContext, WorklistTypeFlowEngine) {
        (
            BuildContext::new(self.universe),
            WorklistTypeFlowEngine::new(self.program),
        )
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
