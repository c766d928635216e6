//! Shared test fixtures: a small shapes program, test features and a
//! recording backend

use super::builders::ProgramBuilder;
use imagegraph_universe::config::{ImageConfig, Preset, ValidatedConfig};
use imagegraph_universe::features::analysis_universe::{FieldDescriptor, MethodDescriptor};
use imagegraph_universe::features::feature_hooks::{
    Checkpoint, CompilationAccess, DuringAnalysisAccess, Feature, FeatureError, FeatureResult,
    ImageWriteAccess, OnAnalysisExitAccess,
};
use imagegraph_universe::features::hosted_universe::{CompiledGraph, HostedUniverse};
use imagegraph_universe::features::type_flow::MethodBody;
use imagegraph_universe::pipeline::{BackendError, ImageBackend};
use imagegraph_universe::shared::models::{FieldId, MethodId, ReachabilityFlag, TypeId};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Balanced preset with the checker on the calling thread
pub fn sequential_config() -> ValidatedConfig {
    ImageConfig::preset(Preset::Balanced)
        .parallel(|p| p.enable_rayon(false))
        .build()
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Shapes program
// ═══════════════════════════════════════════════════════════════════════════

/// ```text
/// interface Shape { area() }
/// class Circle implements Shape, Square implements Shape, Unrelated
/// class Main {
///   static Shape current;
///   static main()        // entry point
///   static draw(Shape s) // s.area()
///   static callback()    // entry point
/// }
/// ```
pub struct Shapes {
    pub builder: ProgramBuilder,
    pub shape: TypeId,
    pub circle: TypeId,
    pub square: TypeId,
    pub unrelated: TypeId,
    pub main_type: TypeId,
    pub main: MethodId,
    pub callback: MethodId,
    pub draw: MethodId,
    pub area: MethodId,
    pub circle_area: MethodId,
    pub square_area: MethodId,
    pub current: FieldId,
}

pub fn shapes() -> Shapes {
    let mut b = ProgramBuilder::new();
    let shape = b.interface("app.Shape");
    let circle = b.class_implementing("app.Circle", &[shape]);
    let square = b.class_implementing("app.Square", &[shape]);
    let unrelated = b.class("app.Unrelated");
    let main_type = b.class("app.Main");

    let main = b.entry_point(main_type, "main");
    let callback = b.entry_point(main_type, "callback");
    let draw = b.method(MethodDescriptor::new(main_type, "draw").static_method().params([shape]));
    let area = b.method(MethodDescriptor::new(shape, "area").abstract_method());
    let circle_area = b.method(MethodDescriptor::new(circle, "area"));
    let square_area = b.method(MethodDescriptor::new(square, "area"));
    let current = b.field(FieldDescriptor::new(main_type, "current", shape).static_field());

    b.body(draw, MethodBody::new().load_param(0, 0).invoke_virtual(area, 0, vec![], None));

    Shapes {
        builder: b,
        shape,
        circle,
        square,
        unrelated,
        main_type,
        main,
        callback,
        draw,
        area,
        circle_area,
        square_area,
        current,
    }
}

impl Shapes {
    /// `main` stores a new `ty` in `current` and draws it
    pub fn main_draws(&mut self, ty: TypeId) {
        let body = MethodBody::new()
            .new_instance(ty, 0)
            .store_field(self.current, 0)
            .load_field(self.current, 1)
            .invoke_static(self.draw, vec![1], None);
        self.builder.body(self.main, body);
    }

    /// `main` only stores a new `ty` in `current`
    pub fn main_stores(&mut self, ty: TypeId) {
        let body = MethodBody::new().new_instance(ty, 0).store_field(self.current, 0);
        self.builder.body(self.main, body);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Features
// ═══════════════════════════════════════════════════════════════════════════

/// Makes one more method reachable on each of its first `rounds` iterations
pub struct GrowingFeature {
    pub declaring: TypeId,
    pub rounds: usize,
    pub request: bool,
    pub added: Vec<MethodId>,
}

impl GrowingFeature {
    pub fn new(declaring: TypeId, rounds: usize) -> Self {
        Self {
            declaring,
            rounds,
            request: true,
            added: Vec::new(),
        }
    }

    pub fn without_request(mut self) -> Self {
        self.request = false;
        self
    }
}

impl Feature for GrowingFeature {
    fn name(&self) -> &str {
        "growing"
    }

    fn during_analysis(&mut self, access: &mut DuringAnalysisAccess<'_>) -> FeatureResult {
        if self.added.len() >= self.rounds {
            return Ok(());
        }
        let name = format!("generated{}", self.added.len());
        let id = access
            .universe_mut()
            .register_method(MethodDescriptor::new(self.declaring, name).static_method())?;
        access.universe_mut().mark_method(id, ReachabilityFlag::Invoked);
        self.added.push(id);
        if self.request {
            access.require_analysis_iteration();
        }
        Ok(())
    }
}

/// Requests another iteration forever without changing anything
pub struct AlwaysRequest;

impl Feature for AlwaysRequest {
    fn name(&self) -> &str {
        "always-request"
    }

    fn during_analysis(&mut self, access: &mut DuringAnalysisAccess<'_>) -> FeatureResult {
        access.require_analysis_iteration();
        Ok(())
    }
}

/// Fails or panics in `on_analysis_exit`
pub struct BrokenExit {
    pub panic: bool,
}

impl Feature for BrokenExit {
    fn name(&self) -> &str {
        if self.panic {
            "panicking-exit"
        } else {
            "failing-exit"
        }
    }

    fn on_analysis_exit(&mut self, _access: &OnAnalysisExitAccess<'_>) -> FeatureResult {
        if self.panic {
            panic!("exit hook exploded");
        }
        Err(FeatureError::failed("failing-exit", "report could not be written"))
    }
}

pub type CheckpointLog = Arc<Mutex<Vec<Checkpoint>>>;

/// Records every post-analysis checkpoint it sees
pub struct CheckpointRecorder {
    pub log: CheckpointLog,
    pub compiled_graphs_seen: Arc<Mutex<Vec<usize>>>,
}

impl CheckpointRecorder {
    pub fn new() -> Self {
        Self {
            log: Arc::default(),
            compiled_graphs_seen: Arc::default(),
        }
    }

    fn record(&self, checkpoint: Checkpoint) {
        self.log.lock().push(checkpoint);
    }
}

impl Feature for CheckpointRecorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_analysis_exit(&mut self, _access: &OnAnalysisExitAccess<'_>) -> FeatureResult {
        self.record(Checkpoint::OnAnalysisExit);
        Ok(())
    }

    fn before_compilation(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        self.record(Checkpoint::BeforeCompilation);
        Ok(())
    }

    fn after_compilation(&mut self, access: &CompilationAccess<'_>) -> FeatureResult {
        self.record(Checkpoint::AfterCompilation);
        self.compiled_graphs_seen
            .lock()
            .push(access.hosted_universe().compiled_graph_count());
        Ok(())
    }

    fn before_heap_layout(&mut self, access: &CompilationAccess<'_>) -> FeatureResult {
        self.record(Checkpoint::BeforeHeapLayout);
        self.compiled_graphs_seen
            .lock()
            .push(access.hosted_universe().compiled_graph_count());
        Ok(())
    }

    fn after_heap_layout(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        self.record(Checkpoint::AfterHeapLayout);
        Ok(())
    }

    fn before_image_write(&mut self, access: &ImageWriteAccess<'_>) -> FeatureResult {
        assert!(access.image_path().is_none());
        self.record(Checkpoint::BeforeImageWrite);
        Ok(())
    }

    fn after_image_write(&mut self, access: &ImageWriteAccess<'_>) -> FeatureResult {
        assert!(access.image_path().is_some());
        self.record(Checkpoint::AfterImageWrite);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Backend
// ═══════════════════════════════════════════════════════════════════════════

/// Compiles every method with a body into a dummy graph and writes a JSON
/// listing of the hosted types
pub struct RecordingBackend {
    pub output_dir: PathBuf,
    pub compiled: usize,
    pub heap_laid_out: bool,
}

impl RecordingBackend {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            compiled: 0,
            heap_laid_out: false,
        }
    }
}

impl ImageBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn compile(&mut self, universe: &HostedUniverse) -> Result<(), BackendError> {
        for method in universe.methods().iter().filter(|m| m.has_body()) {
            universe.set_compiled_graph(
                method.id(),
                CompiledGraph {
                    node_count: 1 + method.implementations().len(),
                    code_size: 16,
                },
            );
            self.compiled += 1;
        }
        Ok(())
    }

    fn layout_heap(&mut self, _universe: &HostedUniverse) -> Result<(), BackendError> {
        self.heap_laid_out = true;
        Ok(())
    }

    fn write_image(&mut self, universe: &HostedUniverse, image_name: &str) -> Result<PathBuf, BackendError> {
        let path = self.output_dir.join(format!("{}.json", image_name));
        let names: Vec<&str> = universe.types().iter().map(|t| t.name()).collect();
        let content = serde_json::to_string_pretty(&names).map_err(|e| BackendError::internal(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| BackendError::io(path.display().to_string(), e.to_string()))?;
        Ok(path)
    }
}
