//! End-to-end image build
//!
//! ```text
//! analysis (fixpoint driver) -> outcome must be Converged
//! return_after_analysis?      -> stop
//! universe builder            -> before_compilation
//! deferred problems?          -> Unsupported
//! backend: compile -> after_compilation -> clear graphs
//!          -> before_heap_layout -> layout_heap -> after_heap_layout
//!          -> before_image_write -> write_image -> after_image_write
//! ```

use crate::config::ValidatedConfig;
use crate::errors::{BuildError, Result};
use crate::features::feature_hooks::{
    Checkpoint, CompilationAccess, FeatureRegistry, ImageWriteAccess, ReflectionFeature,
};
use crate::features::fixpoint::{BuildContext, FixpointDriver};
use crate::features::hosted_universe::{HostedUniverse, UniverseBuilder};
use crate::features::type_flow::TypeFlowEngine;
use crate::pipeline::backend::ImageBackend;
use crate::pipeline::result::BuildResult;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub struct ImagePipeline {
    config: ValidatedConfig,
    driver: FixpointDriver,
    builder: UniverseBuilder,
}

impl ImagePipeline {
    pub fn new(config: ValidatedConfig) -> Self {
        let driver = FixpointDriver::from_config(&config);
        let builder = UniverseBuilder::from_config(&config);
        Self {
            config,
            driver,
            builder,
        }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Built-in features in registration order
    pub fn default_features(&self) -> FeatureRegistry {
        FeatureRegistry::new().with(ReflectionFeature::new(self.config.reflection()))
    }

    /// Run one image build. `backend == None` stops after the hosted
    /// universe is built and `before_compilation` hooks ran.
    pub fn run(
        &self,
        ctx: &mut BuildContext,
        engine: &mut dyn TypeFlowEngine,
        features: &mut FeatureRegistry,
        backend: Option<&mut dyn ImageBackend>,
    ) -> Result<BuildResult> {
        let total_start = Instant::now();
        let image_name = self.config.image_name().to_string();
        info!(image = %image_name, preset = %self.config.preset(), "image build started");

        let analysis_start = Instant::now();
        let iterations = self.driver.run_analysis(ctx, engine, features)?.into_result()?;
        let analysis_duration = analysis_start.elapsed();

        let mut result = BuildResult {
            image_name,
            iterations,
            analysis_duration,
            ..Default::default()
        };

        if self.driver.analysis_config().return_after_analysis {
            info!(iterations, "returning after analysis");
            result.total_duration = total_start.elapsed();
            return Ok(result);
        }

        let hosted = self.builder.build(&ctx.universe)?;
        {
            let access = CompilationAccess::new(&ctx.universe, &hosted, &ctx.unsupported);
            features.dispatch(Checkpoint::BeforeCompilation, |feature| feature.before_compilation(&access))?;
        }
        ctx.unsupported.report().map_err(BuildError::Unsupported)?;

        if let Some(backend) = backend {
            let (released, path) = self.generate(ctx, &hosted, features, backend, &result.image_name)?;
            result.released_graphs = released;
            result.image_path = Some(path);
        }

        result.hosted = Some(hosted);
        result.total_duration = total_start.elapsed();
        info!(
            image = %result.image_name,
            iterations = result.iterations,
            elapsed_ms = result.total_duration.as_millis() as u64,
            "image build finished"
        );
        Ok(result)
    }

    fn generate(
        &self,
        ctx: &BuildContext,
        hosted: &HostedUniverse,
        features: &mut FeatureRegistry,
        backend: &mut dyn ImageBackend,
        image_name: &str,
    ) -> Result<(usize, PathBuf)> {
        let access = CompilationAccess::new(&ctx.universe, hosted, &ctx.unsupported);

        debug!(backend = backend.name(), "compile");
        backend.compile(hosted)?;
        features.dispatch(Checkpoint::AfterCompilation, |feature| feature.after_compilation(&access))?;
        let released = hosted.clear_compiled_graphs();
        debug!(released, "released compiled graphs");

        features.dispatch(Checkpoint::BeforeHeapLayout, |feature| feature.before_heap_layout(&access))?;
        backend.layout_heap(hosted)?;
        features.dispatch(Checkpoint::AfterHeapLayout, |feature| feature.after_heap_layout(&access))?;

        let before_write = ImageWriteAccess::new(hosted, image_name, None);
        features.dispatch(Checkpoint::BeforeImageWrite, |feature| feature.before_image_write(&before_write))?;
        let path = backend.write_image(hosted, image_name)?;
        let after_write = ImageWriteAccess::new(hosted, image_name, Some(path.as_path()));
        features.dispatch(Checkpoint::AfterImageWrite, |feature| feature.after_image_write(&after_write))?;

        info!(backend = backend.name(), path = %path.display(), "image written");
        Ok((released, path))
    }
}
