//! # Analysis Universe
//!
//! The program-element universe the fixpoint loop grows: types, methods and
//! fields with monotonic reachability flags, stable arena ids, and the
//! internal call edges the type-flow engine discovers.
//!
//! ## Usage
//! ```text
//! let mut universe = AnalysisUniverse::new();
//! let object = universe.register_type(TypeDescriptor::class("java.lang.Object"))?;
//! let main = universe.register_method(
//!     MethodDescriptor::new(object, "main").static_method().entry_point("main"),
//! )?;
//! universe.mark_method(main, ReachabilityFlag::Invoked);
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub use application::{AnalysisUniverse, UniverseCounts};
pub use domain::{
    AnalysisField, AnalysisMethod, AnalysisType, EntryPointData, FieldDescriptor,
    MethodDescriptor, MethodModifiers, TypeDescriptor, TypeKind,
};
pub use error::{UniverseError, UniverseResult};
