//! Core domain: error taxonomy for the motion core.
//!
//! Every variant is locally recoverable. Callers log and degrade; nothing
//! here is allowed to abort the host.

use thiserror::Error;

use crate::jump::JumpPhase;

/// Failures reported by the external physics collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("spatial query failed: {0}")]
    QueryFailed(String),
    #[error("physics body is no longer available")]
    BodyUnavailable,
    #[error("physics body reported a non-finite {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("invalid timestep {delta_ms} ms, clamped to {clamped_ms} ms")]
    InvalidTimestep { delta_ms: f32, clamped_ms: f32 },

    #[error("no physics body attached, frame skipped")]
    MissingBody,

    #[error("invalid jump transition {from:?} -> {to:?}, ignored")]
    InvalidTransition { from: JumpPhase, to: JumpPhase },

    /// Jump attempted with every jump spent and the post-triple cooldown running.
    #[error("jump attempted while exhausted")]
    JumpExhausted,

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("rejected {kind} event: {reason}")]
    InvalidEvent { kind: &'static str, reason: String },
}
