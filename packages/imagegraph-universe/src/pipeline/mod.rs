//! # Image Pipeline
//!
//! Runs one image build end to end: fixpoint analysis, hosted universe,
//! then code generation, heap layout and image writing through an
//! `ImageBackend`, dispatching feature checkpoints around each stage.

pub mod backend;
pub mod error;
pub mod image_pipeline;
pub mod result;

pub use backend::ImageBackend;
pub use error::BackendError;
pub use image_pipeline::ImagePipeline;
pub use result::BuildResult;
