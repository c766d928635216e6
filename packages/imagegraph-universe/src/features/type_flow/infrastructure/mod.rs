//! Type-flow engine adapters

pub mod worklist_engine;

pub use worklist_engine::{WorklistEngineStats, WorklistTypeFlowEngine};
