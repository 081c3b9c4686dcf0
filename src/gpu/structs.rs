use std::fmt;

use bitflags::bitflags;

#[cfg(feature = "gcx-serde")]
use serde::{Deserialize, Serialize};

use super::backend::BackendProgram;
use super::error::{GpuError, Result};

bitflags! {
    /// Pipeline capabilities a backend advertises and a context may require.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const GRAPHICS = 0x1;
        const COMPUTE  = 0x2;
    }
}

/// Pipeline phase whose source is supplied at program initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "gcx-serde", derive(Serialize, Deserialize))]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// The capability a backend must advertise to run this stage.
    pub fn capability(self) -> Capabilities {
        match self {
            ShaderStage::Vertex | ShaderStage::Fragment => Capabilities::GRAPHICS,
            ShaderStage::Compute => Capabilities::COMPUTE,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
            ShaderStage::Compute => write!(f, "compute"),
        }
    }
}

/// Lifecycle state of a program record.
///
/// `Allocated` and `Failed` only ever move forward; releasing the handle is
/// the sole exit from either `Initialized` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "gcx-serde", derive(Serialize, Deserialize))]
pub enum ProgramState {
    #[default]
    Allocated,
    Initialized,
    Failed,
}

/// Pipeline family a program belongs to after a successful init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "gcx-serde", derive(Serialize, Deserialize))]
pub enum ProgramKind {
    Graphics,
    Compute,
}

/// Context construction parameters.
///
/// Backend selection is driven entirely by this struct and the registry
/// passed to [`Context::with_registry`](super::context::Context::with_registry);
/// there is no environment-implicit state, so the same inputs always pick
/// the same backend.
#[derive(Debug, Clone)]
pub struct ContextInfo<'a> {
    pub debug_name: &'a str,
    /// Capabilities a backend must advertise to be eligible.
    pub required_caps: Capabilities,
    /// Maximum number of simultaneously live program handles.
    pub program_capacity: usize,
}

impl Default for ContextInfo<'_> {
    fn default() -> Self {
        Self {
            debug_name: "gcx context",
            required_caps: Capabilities::GRAPHICS,
            program_capacity: 1024,
        }
    }
}

/// Program creation parameters.
#[derive(Debug, Clone)]
pub struct ProgramInfo<'a> {
    pub debug_name: &'a str,
}

impl Default for ProgramInfo<'_> {
    fn default() -> Self {
        Self {
            debug_name: "program",
        }
    }
}

/// Stage sources handed to program initialization.
///
/// Exactly one of the graphics pair (vertex + fragment) or the compute
/// stage may be supplied; anything else is rejected before the backend is
/// dispatched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageSources<'a> {
    pub vertex: Option<&'a str>,
    pub fragment: Option<&'a str>,
    pub compute: Option<&'a str>,
}

impl<'a> StageSources<'a> {
    pub fn graphics(vertex: &'a str, fragment: &'a str) -> Self {
        Self {
            vertex: Some(vertex),
            fragment: Some(fragment),
            compute: None,
        }
    }

    pub fn compute(compute: &'a str) -> Self {
        Self {
            compute: Some(compute),
            ..Default::default()
        }
    }

    pub(crate) fn classify(&self) -> Result<ProgramKind> {
        let has_graphics = self.vertex.is_some() || self.fragment.is_some();
        match (has_graphics, self.compute.is_some()) {
            (true, true) => Err(GpuError::StageConflict),
            (false, false) => Err(GpuError::IncompleteStages("no stage sources supplied")),
            (false, true) => Ok(ProgramKind::Compute),
            (true, false) => {
                if self.vertex.is_none() {
                    Err(GpuError::IncompleteStages(
                        "graphics programs require a vertex stage",
                    ))
                } else if self.fragment.is_none() {
                    Err(GpuError::IncompleteStages(
                        "graphics programs require a fragment stage",
                    ))
                } else {
                    Ok(ProgramKind::Graphics)
                }
            }
        }
    }
}

/// A shader program record owned by a context pool slot.
///
/// The backend-private state is created by the table's `program_create`,
/// belongs exclusively to this record, and is returned to the table exactly
/// once on release.
pub struct Program {
    pub(crate) backend_state: Option<BackendProgram>,
    pub(crate) state: ProgramState,
    pub(crate) kind: Option<ProgramKind>,
    pub(crate) debug_name: String,
}

impl core::fmt::Debug for Program {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Program")
            .field("state", &self.state)
            .field("kind", &self.kind)
            .field("debug_name", &self.debug_name)
            .field("has_backend_state", &self.backend_state.is_some())
            .finish()
    }
}

impl Program {
    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn kind(&self) -> Option<ProgramKind> {
        self.kind
    }

    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }
}
