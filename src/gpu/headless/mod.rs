//! Software backend with no GPU behind it.
//!
//! Accepts any well-formed program and keeps its state on the heap. Used
//! for surface-less tooling and by the crate's own tests; advertised
//! capabilities are configurable so callers can emulate a restricted
//! backend.

use super::backend::{BackendFactory, BackendOps, BackendProgram};
use super::error::{GpuError, Result};
use super::structs::{Capabilities, ContextInfo, ShaderStage, StageSources};

const BACKEND_NAME: &str = "headless";

/// Factory for the headless backend.
pub struct HeadlessFactory {
    caps: Capabilities,
}

impl HeadlessFactory {
    /// Restrict the advertised capabilities, e.g. graphics only.
    pub fn with_caps(caps: Capabilities) -> Self {
        Self { caps }
    }
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self {
            caps: Capabilities::GRAPHICS | Capabilities::COMPUTE,
        }
    }
}

impl BackendFactory for HeadlessFactory {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn probe(&self, required: Capabilities) -> bool {
        self.caps.contains(required)
    }

    fn make_backend(&self, _info: &ContextInfo) -> Result<Box<dyn BackendOps>> {
        Ok(Box::new(HeadlessBackend { caps: self.caps }))
    }
}

struct HeadlessBackend {
    caps: Capabilities,
}

/// Backend-private program state: the stages accepted at init.
#[derive(Default)]
struct HeadlessProgram {
    stages: Vec<ShaderStage>,
}

impl HeadlessBackend {
    fn check_source(&self, stage: ShaderStage, source: &str) -> Result<()> {
        if !self.caps.contains(stage.capability()) {
            return Err(GpuError::UnsupportedStage {
                backend: BACKEND_NAME,
                stage,
            });
        }

        if source.trim().is_empty() {
            return Err(GpuError::CompilationFailure(format!(
                "{} stage: empty source",
                stage
            )));
        }

        Ok(())
    }
}

impl BackendOps for HeadlessBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn caps(&self) -> Capabilities {
        self.caps
    }

    fn program_create(&mut self) -> Result<BackendProgram> {
        Ok(BackendProgram::new(HeadlessProgram::default()))
    }

    fn program_init(&mut self, program: &mut BackendProgram, stages: &StageSources) -> Result<()> {
        let mut accepted = Vec::new();

        for (stage, source) in [
            (ShaderStage::Vertex, stages.vertex),
            (ShaderStage::Fragment, stages.fragment),
            (ShaderStage::Compute, stages.compute),
        ] {
            let Some(source) = source else {
                continue;
            };
            self.check_source(stage, source)?;
            accepted.push(stage);
        }

        let state = program
            .downcast_mut::<HeadlessProgram>()
            .ok_or(GpuError::InvalidHandle)?;
        state.stages = accepted;
        Ok(())
    }

    fn program_release(&mut self, program: BackendProgram) {
        drop(program);
    }
}
