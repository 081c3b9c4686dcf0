use thiserror::Error;

use super::structs::ShaderStage;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, GpuError>;

/// Errors surfaced by the dispatch layer.
///
/// [`UnsupportedBackend`](GpuError::UnsupportedBackend) and
/// [`AllocationFailure`](GpuError::AllocationFailure) are fatal to the
/// caller and never retried internally. Stage and compilation errors are
/// recoverable: fix the pipeline shape or the source and retry with a
/// fresh handle. Errors are returned to the immediate caller, never logged
/// or swallowed inside the layer.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Handle or context allocation exhausted.
    #[error("allocation failed: {0} exhausted")]
    AllocationFailure(&'static str),

    /// No registered backend satisfied the required capabilities.
    #[error("no supported backend")]
    UnsupportedBackend,

    /// The active backend cannot run programs using this stage.
    #[error("backend '{backend}' does not support the {stage} stage")]
    UnsupportedStage {
        backend: &'static str,
        stage: ShaderStage,
    },

    /// Backend compile/link diagnostics, passed through verbatim.
    #[error("compilation failed: {0}")]
    CompilationFailure(String),

    /// Graphics and compute stage sources were supplied together.
    #[error("graphics and compute stage sources are mutually exclusive")]
    StageConflict,

    /// The stage set is missing a required source.
    #[error("incomplete stage set: {0}")]
    IncompleteStages(&'static str),

    /// The handle does not refer to a live resource of this context.
    #[error("invalid or released resource handle")]
    InvalidHandle,

    /// `init` was called on a handle that already left the allocated state.
    #[error("program already initialized or failed; re-initialization requires a fresh handle")]
    AlreadyInitialized,

    /// Context teardown was requested while issued handles are still live.
    #[error("context destroyed with {live} live handle(s)")]
    HandlesOutstanding { live: usize },
}
