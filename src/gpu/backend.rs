use std::any::Any;

use log::{debug, info};

use super::error::{GpuError, Result};
use super::structs::{Capabilities, ContextInfo, StageSources};

/// Opaque backend-private program state.
///
/// Created by [`BackendOps::program_create`] and handed back on every later
/// dispatch for the same program; the dispatch layer never looks inside.
pub struct BackendProgram(Box<dyn Any + Send>);

impl BackendProgram {
    pub fn new<T: Any + Send>(state: T) -> Self {
        Self(Box::new(state))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut()
    }
}

/// Per-backend table of resource lifecycle operations.
///
/// One implementation per graphics API. A context binds exactly one table at
/// construction and forwards every resource call through it, which is what
/// lets call sites stay untouched when a backend is added or swapped.
///
/// Every backend must implement all three program operations. A backend
/// that cannot run some stage still implements `program_init` and fails it
/// with [`GpuError::UnsupportedStage`]; omitting the operation is not an
/// option the trait allows. Call order is always
/// create → init → (use)* → release and is enforced by the context shim,
/// not re-validated here.
pub trait BackendOps: Send {
    /// Stable identifier, also used in diagnostics.
    fn name(&self) -> &'static str;

    /// Pipeline capabilities this backend supports.
    fn caps(&self) -> Capabilities;

    /// Allocate backend-private program state. Must not compile anything.
    fn program_create(&mut self) -> Result<BackendProgram>;

    /// Validate, compile and link the supplied stage sources.
    fn program_init(
        &mut self,
        program: &mut BackendProgram,
        stages: &StageSources,
    ) -> Result<()>;

    /// Free backend-private program state.
    ///
    /// Must accept state that was never initialized, and state whose init
    /// failed.
    fn program_release(&mut self, program: BackendProgram);
}

/// Probes availability of one backend kind and constructs it.
pub trait BackendFactory {
    fn name(&self) -> &'static str;

    /// Whether this backend can serve `required` in the current
    /// environment. Must be side-effect free.
    fn probe(&self, required: Capabilities) -> bool;

    fn make_backend(&self, info: &ContextInfo) -> Result<Box<dyn BackendOps>>;
}

/// Priority-ordered set of backend factories.
///
/// Selection is deterministic: factories are tried strictly in registration
/// order and the first successful probe wins. Given the same registry and
/// the same environment, the same backend is chosen every run.
#[derive(Default)]
pub struct BackendRegistry {
    factories: Vec<Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registry holding the built-in backends, most capable first.
    pub fn with_default_backends() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "gcx-headless")]
        registry.register(Box::new(super::headless::HeadlessFactory::default()));
        registry
    }

    /// Append a factory; earlier registrations take precedence.
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) {
        self.factories.push(factory);
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn select(&self, info: &ContextInfo) -> Result<Box<dyn BackendOps>> {
        for factory in &self.factories {
            if !factory.probe(info.required_caps) {
                debug!(
                    "backend '{}' rejected probe for caps {:?}",
                    factory.name(),
                    info.required_caps
                );
                continue;
            }

            match factory.make_backend(info) {
                Ok(backend) => {
                    info!(
                        "selected backend '{}' for context '{}'",
                        backend.name(),
                        info.debug_name
                    );
                    return Ok(backend);
                }
                Err(err) => {
                    debug!(
                        "backend '{}' probed but failed to construct: {}",
                        factory.name(),
                        err
                    );
                }
            }
        }

        Err(GpuError::UnsupportedBackend)
    }
}
