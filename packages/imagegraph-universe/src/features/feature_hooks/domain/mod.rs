//! Feature hook domain: access types handed to each checkpoint

pub mod access;

pub use access::{
    AfterAnalysisAccess, AnalysisAccess, CompilationAccess, DuringAnalysisAccess,
    ImageWriteAccess, OnAnalysisExitAccess,
};
