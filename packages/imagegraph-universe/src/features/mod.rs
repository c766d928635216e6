//! Feature modules, one per build component

pub mod analysis_universe;
pub mod class_init;
pub mod consistency;
pub mod diagnostics;
pub mod feature_hooks;
pub mod fixpoint;
pub mod hosted_universe;
pub mod type_flow;
