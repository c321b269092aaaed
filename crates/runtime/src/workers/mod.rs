//! Worker tasks that back the runtime orchestration.
//!
//! The interaction worker offers incoming events to the hooks; the periodic
//! tasks (heartbeat, idle tracking) live in their own modules.

mod interaction;

pub use interaction::{Command, InteractionWorker};
