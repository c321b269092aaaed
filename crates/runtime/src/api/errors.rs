//! Unified error types surfaced by the runtime API.
//!
//! [`HostError`] describes failures at the external game boundary; those are
//! absorbed by the query layer and hooks and never escape the core.
//! [`RuntimeError`] covers orchestration failures (configuration, worker
//! coordination) that clients can bubble up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Result type returned by every [`GameHost`](crate::host::GameHost) method.
pub type HostResult<T> = std::result::Result<T, HostError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("game state unavailable: {0}")]
    Unavailable(String),

    #[error("insufficient resource to perform the action")]
    InsufficientResource,

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("host rejected the request: {0}")]
    Rejected(String),

    #[error("host call timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a game host to be configured before building")]
    MissingHost,

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),

    #[error("interaction worker command channel closed")]
    CommandChannelClosed,

    #[error("interaction worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("interaction worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
