//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, tasks, or host plumbing.

pub mod errors;
pub mod handle;

pub use errors::{HostError, HostResult, Result, RuntimeError};
pub use handle::AgentHandle;
