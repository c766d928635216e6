//! Code generation backend port
//!
//! The pipeline owns checkpoint dispatch; a backend only turns the hosted
//! universe into code, a heap and an image file. Compiled graphs attached in
//! `compile` are released by the pipeline once `after_compilation` hooks ran.

use crate::features::hosted_universe::HostedUniverse;
use crate::pipeline::error::BackendError;
use std::path::PathBuf;

pub trait ImageBackend {
    fn name(&self) -> &str {
        "backend"
    }

    /// Generate code; may attach graphs with `HostedUniverse::set_compiled_graph`
    fn compile(&mut self, universe: &HostedUniverse) -> Result<(), BackendError>;

    fn layout_heap(&mut self, universe: &HostedUniverse) -> Result<(), BackendError>;

    /// Write the image and return its path
    fn write_image(&mut self, universe: &HostedUniverse, image_name: &str) -> Result<PathBuf, BackendError>;
}
