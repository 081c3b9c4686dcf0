//! Multi-backend GPU context and resource dispatch layer.
//!
//! A [`Context`] binds exactly one backend operation table at construction
//! and issues generational [`Handle`]s to the resources created through it.
//! Callers follow the same three-call lifecycle — make, init, destroy — no
//! matter which backend is active, and new backends plug in through
//! [`gpu::BackendFactory`] without touching any call site.

pub mod gpu;
pub mod utils;

pub use gpu::*;
pub use utils::{Handle, Pool};
