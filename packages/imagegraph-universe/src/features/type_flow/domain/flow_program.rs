//! Declarative flow programs
//!
//! A method body is a list of flow statements over numbered locals. Bodies
//! are only linked into the flow graph once the method becomes reachable.

use crate::shared::models::{FieldId, MethodId, TypeId};
use rustc_hash::FxHashMap;

/// Method-local variable
pub type Local = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    /// No receiver, target fixed
    Static,
    /// Receiver present, target fixed (constructors, private, super calls)
    Special,
    /// Receiver present, target resolved per receiver type
    Virtual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatement {
    /// `dest = new ty`
    New { ty: TypeId, dest: Local },
    /// `to = from`
    Copy { from: Local, to: Local },
    /// `dest = this`
    LoadReceiver { dest: Local },
    /// `dest = param[index]`
    LoadParam { index: usize, dest: Local },
    /// `return src`
    Return { src: Local },
    /// `dest = field` (field-insensitive on the base object)
    LoadField { field: FieldId, dest: Local },
    /// `field = src`
    StoreField { field: FieldId, src: Local },
    /// `x instanceof ty`
    InstanceOf { ty: TypeId },
    /// `result = receiver.target(args)`
    Invoke {
        kind: InvokeKind,
        target: MethodId,
        receiver: Option<Local>,
        args: Vec<Local>,
        result: Option<Local>,
    },
    /// Construct the engine cannot model; reported as unsupported
    Unsupported { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    statements: Vec<FlowStatement>,
}

impl MethodBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[FlowStatement] {
        &self.statements
    }

    pub fn push(&mut self, statement: FlowStatement) {
        self.statements.push(statement);
    }

    /// Builder: `dest = new ty`
    pub fn new_instance(mut self, ty: TypeId, dest: Local) -> Self {
        self.push(FlowStatement::New { ty, dest });
        self
    }

    /// Builder: `to = from`
    pub fn copy(mut self, from: Local, to: Local) -> Self {
        self.push(FlowStatement::Copy { from, to });
        self
    }

    /// Builder: `dest = this`
    pub fn load_receiver(mut self, dest: Local) -> Self {
        self.push(FlowStatement::LoadReceiver { dest });
        self
    }

    /// Builder: `dest = param[index]`
    pub fn load_param(mut self, index: usize, dest: Local) -> Self {
        self.push(FlowStatement::LoadParam { index, dest });
        self
    }

    /// Builder: `return src`
    pub fn returns(mut self, src: Local) -> Self {
        self.push(FlowStatement::Return { src });
        self
    }

    /// Builder: `dest = field`
    pub fn load_field(mut self, field: FieldId, dest: Local) -> Self {
        self.push(FlowStatement::LoadField { field, dest });
        self
    }

    /// Builder: `field = src`
    pub fn store_field(mut self, field: FieldId, src: Local) -> Self {
        self.push(FlowStatement::StoreField { field, src });
        self
    }

    /// Builder: `_ instanceof ty`
    pub fn instance_of(mut self, ty: TypeId) -> Self {
        self.push(FlowStatement::InstanceOf { ty });
        self
    }

    /// Builder: static call
    pub fn invoke_static(mut self, target: MethodId, args: Vec<Local>, result: Option<Local>) -> Self {
        self.push(FlowStatement::Invoke {
            kind: InvokeKind::Static,
            target,
            receiver: None,
            args,
            result,
        });
        self
    }

    /// Builder: call with a fixed target on `receiver`
    pub fn invoke_special(
        mut self,
        target: MethodId,
        receiver: Local,
        args: Vec<Local>,
        result: Option<Local>,
    ) -> Self {
        self.push(FlowStatement::Invoke {
            kind: InvokeKind::Special,
            target,
            receiver: Some(receiver),
            args,
            result,
        });
        self
    }

    /// Builder: dispatched call on `receiver`
    pub fn invoke_virtual(
        mut self,
        target: MethodId,
        receiver: Local,
        args: Vec<Local>,
        result: Option<Local>,
    ) -> Self {
        self.push(FlowStatement::Invoke {
            kind: InvokeKind::Virtual,
            target,
            receiver: Some(receiver),
            args,
            result,
        });
        self
    }

    /// Builder: unsupported construct
    pub fn unsupported(mut self, reason: impl Into<String>) -> Self {
        self.push(FlowStatement::Unsupported {
            reason: reason.into(),
        });
        self
    }
}

/// Bodies for every method the engine can analyze
#[derive(Debug, Clone, Default)]
pub struct FlowProgram {
    bodies: FxHashMap<MethodId, MethodBody>,
}

impl FlowProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the body of `method`
    pub fn insert(&mut self, method: MethodId, body: MethodBody) {
        self.bodies.insert(method, body);
    }

    /// Builder form of `insert`
    pub fn with_body(mut self, method: MethodId, body: MethodBody) -> Self {
        self.insert(method, body);
        self
    }

    pub fn body(&self, method: MethodId) -> Option<&MethodBody> {
        self.bodies.get(&method)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
