//! Error types for event wiring.

use thiserror::Error;

use crate::family::Family;
use crate::ids::EmitterId;

/// Errors that can occur while wiring handlers to emitters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The emitter does not declare the event family in its capability set.
    #[error("{emitter} cannot emit {event} ({family})")]
    UnsupportedFamily {
        emitter: EmitterId,
        family: Family,
        event: &'static str,
    },

    /// Configuration value could not be parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for event operations.
pub type Result<T> = std::result::Result<T, EventError>;
