//! # Type-Flow Engine
//!
//! Port for the points-to / type-flow computation the fixpoint driver runs
//! to convergence, plus a small inclusion-based reference engine over
//! declarative flow programs.
//!
//! ## Usage
//! ```text
//! let program = FlowProgram::new().with_body(
//!     main,
//!     MethodBody::new().new_instance(circle, 0).invoke_virtual(area, 0, vec![], None),
//! );
//! let mut engine = WorklistTypeFlowEngine::new(program);
//! let changed = engine.run_once(&mut universe, &unsupported)?;
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{FlowProgram, FlowStatement, InvokeKind, Local, MethodBody};
pub use infrastructure::{WorklistEngineStats, WorklistTypeFlowEngine};
pub use ports::{EngineError, TypeFlowEngine};
