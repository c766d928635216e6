//! Built-in features

pub mod reflection;
pub mod reflection_config;

pub use reflection::ReflectionFeature;
pub use reflection_config::{
    FieldEntry, MethodEntry, ReflectionConfigurationParser, ReflectionEntry,
};
