pub mod backend;
pub mod context;
pub mod error;
pub mod structs;

mod program;

#[cfg(feature = "gcx-headless")]
pub mod headless;

pub use backend::{BackendFactory, BackendOps, BackendProgram, BackendRegistry};
pub use context::Context;
pub use error::{GpuError, Result};
pub use structs::*;
