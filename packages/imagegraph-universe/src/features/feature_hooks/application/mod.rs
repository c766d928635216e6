//! Feature hook application layer

pub mod registry;

pub use registry::{FeatureRegistry, IsolatedFailure};
