#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gcx::gpu::{
    BackendFactory, BackendOps, BackendProgram, Capabilities, ContextInfo, GpuError, Result,
    ShaderStage, StageSources,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Dispatch counters shared between a test and its mock backend.
#[derive(Default)]
pub struct Counters {
    pub creates: AtomicUsize,
    pub inits: AtomicUsize,
    pub releases: AtomicUsize,
}

impl Counters {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

struct RecordingProgram;

/// Mock backend that counts every table dispatch.
///
/// Sources starting with "broken" fail compilation with a diagnostic;
/// stages outside the configured capabilities fail with UnsupportedStage.
pub struct RecordingBackend {
    name: &'static str,
    caps: Capabilities,
    fail_creates: bool,
    counters: Arc<Counters>,
}

impl BackendOps for RecordingBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn caps(&self) -> Capabilities {
        self.caps
    }

    fn program_create(&mut self) -> Result<BackendProgram> {
        self.counters.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates {
            return Err(GpuError::AllocationFailure("backend program state"));
        }
        Ok(BackendProgram::new(RecordingProgram))
    }

    fn program_init(&mut self, _program: &mut BackendProgram, stages: &StageSources) -> Result<()> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);

        for (stage, source) in [
            (ShaderStage::Vertex, stages.vertex),
            (ShaderStage::Fragment, stages.fragment),
            (ShaderStage::Compute, stages.compute),
        ] {
            let Some(source) = source else {
                continue;
            };
            if !self.caps.contains(stage.capability()) {
                return Err(GpuError::UnsupportedStage {
                    backend: self.name,
                    stage,
                });
            }
            if source.starts_with("broken") {
                return Err(GpuError::CompilationFailure(format!(
                    "{} stage: syntax error near 'broken'",
                    stage
                )));
            }
        }

        Ok(())
    }

    fn program_release(&mut self, program: BackendProgram) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
        drop(program);
    }
}

/// Factory for [`RecordingBackend`] with configurable probe behavior.
pub struct RecordingFactory {
    name: &'static str,
    caps: Capabilities,
    probe_ok: bool,
    fail_creates: bool,
    counters: Arc<Counters>,
}

impl RecordingFactory {
    pub fn new(name: &'static str) -> Self {
        Self::with_caps(name, Capabilities::all())
    }

    pub fn with_caps(name: &'static str, caps: Capabilities) -> Self {
        Self {
            name,
            caps,
            probe_ok: true,
            fail_creates: false,
            counters: Arc::new(Counters::default()),
        }
    }

    /// A factory whose probe always rejects, regardless of capabilities.
    pub fn failing(name: &'static str) -> Self {
        Self {
            probe_ok: false,
            ..Self::new(name)
        }
    }

    /// A factory whose backend fails every `program_create` dispatch.
    pub fn failing_creates(name: &'static str) -> Self {
        Self {
            fail_creates: true,
            ..Self::new(name)
        }
    }

    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }
}

impl BackendFactory for RecordingFactory {
    fn name(&self) -> &'static str {
        self.name
    }

    fn probe(&self, required: Capabilities) -> bool {
        self.probe_ok && self.caps.contains(required)
    }

    fn make_backend(&self, _info: &ContextInfo) -> Result<Box<dyn BackendOps>> {
        Ok(Box::new(RecordingBackend {
            name: self.name,
            caps: self.caps,
            fail_creates: self.fail_creates,
            counters: self.counters.clone(),
        }))
    }
}
