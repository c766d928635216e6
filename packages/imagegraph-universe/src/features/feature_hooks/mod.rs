//! # Feature Hook Registry
//!
//! Plugins observe and extend the build at fixed checkpoints. Features are
//! dispatched in registration order; the access type of each checkpoint
//! decides what a hook may touch.
//!
//! ## Usage
//! ```text
//! let mut registry = FeatureRegistry::new();
//! registry.register(ReflectionFeature::new(config.reflection().clone()));
//! registry.register(MyFeature::default());
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{FeatureRegistry, IsolatedFailure};
pub use domain::{
    AfterAnalysisAccess, AnalysisAccess, CompilationAccess, DuringAnalysisAccess,
    ImageWriteAccess, OnAnalysisExitAccess,
};
pub use infrastructure::{ReflectionConfigurationParser, ReflectionEntry, ReflectionFeature};
pub use ports::{Checkpoint, Feature, FeatureError, FeatureResult, HookError};
