use log::debug;

use crate::utils::Pool;

use super::backend::{BackendOps, BackendRegistry};
use super::error::{GpuError, Result};
use super::structs::{Capabilities, ContextInfo, Program};

/// Dispatch root for GPU resources.
///
/// A context binds exactly one backend operation table at construction and
/// owns the pool of program records created through it. The table never
/// changes afterwards, so resource calls dispatch without any locking.
///
/// # Threading
///
/// Thread-compatible, not thread-safe: a context is `Send` and may move
/// between threads, but every resource operation takes `&mut self`, so
/// concurrent use requires external confinement or synchronization.
pub struct Context {
    pub(crate) backend: Box<dyn BackendOps>,
    pub(crate) programs: Pool<Program>,
    pub(crate) live_programs: usize,
    backend_name: &'static str,
    caps: Capabilities,
    debug_name: String,
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("backend_name", &self.backend_name)
            .field("caps", &self.caps)
            .field("debug_name", &self.debug_name)
            .field("live_programs", &self.live_programs)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Construct a context, selecting a backend from the built-in registry.
    pub fn new(info: &ContextInfo) -> Result<Self> {
        Self::with_registry(info, &BackendRegistry::with_default_backends())
    }

    /// Construct a context, selecting a backend from an explicit registry.
    ///
    /// Factories are probed in registration order against
    /// `info.required_caps`; the first acceptable backend is bound for the
    /// lifetime of the context. Fails with
    /// [`GpuError::UnsupportedBackend`] when nothing probes successfully —
    /// fatal to the caller, never retried internally.
    pub fn with_registry(info: &ContextInfo, registry: &BackendRegistry) -> Result<Self> {
        // Handles index with 16 bits; a larger pool could not address every
        // program it holds.
        if info.program_capacity > Pool::<Program>::MAX_CAPACITY {
            return Err(GpuError::AllocationFailure("program handle range"));
        }

        let backend = registry.select(info)?;
        let backend_name = backend.name();
        let caps = backend.caps();

        Ok(Self {
            backend,
            programs: Pool::new(info.program_capacity),
            live_programs: 0,
            backend_name,
            caps,
            debug_name: info.debug_name.to_string(),
        })
    }

    /// Identifier of the backend bound at construction.
    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Capabilities advertised by the bound backend.
    pub fn caps(&self) -> Capabilities {
        self.caps
    }

    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }

    /// Number of program handles issued and not yet released.
    pub fn live_programs(&self) -> usize {
        self.live_programs
    }

    /// Tear the context down.
    ///
    /// Every handle issued by this context must have been released first;
    /// outstanding handles are a caller bug and are reported as
    /// [`GpuError::HandlesOutstanding`] without releasing anything
    /// backend-side.
    pub fn destroy(self) -> Result<()> {
        if self.live_programs > 0 {
            return Err(GpuError::HandlesOutstanding {
                live: self.live_programs,
            });
        }

        debug!("destroyed context '{}'", self.debug_name);
        Ok(())
    }
}
