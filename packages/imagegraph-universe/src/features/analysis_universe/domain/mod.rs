//! Analysis universe domain models

pub mod descriptor;
pub mod element;

pub use descriptor::{FieldDescriptor, MethodDescriptor, TypeDescriptor};
pub use element::{
    AnalysisField, AnalysisMethod, AnalysisType, EntryPointData, MethodModifiers, TypeKind,
};
