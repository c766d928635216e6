//! Type-flow domain models

pub mod flow_program;

pub use flow_program::{FlowProgram, FlowStatement, InvokeKind, Local, MethodBody};
