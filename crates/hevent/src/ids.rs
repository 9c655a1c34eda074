//! Identities for the two sides of a connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_EMITTER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmitterId(u64);

impl EmitterId {
    /// Allocates the next unused emitter id.
    pub(crate) fn next() -> Self {
        Self(NEXT_EMITTER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter#{}", self.0)
    }
}

/// Process-unique identity of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Allocates the next unused handler id.
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = EmitterId::next();
        let b = EmitterId::next();
        assert_ne!(a, b);

        let h1 = HandlerId::next();
        let h2 = HandlerId::next();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_display() {
        let id = EmitterId(7);
        assert_eq!(id.to_string(), "emitter#7");
        assert_eq!(HandlerId(3).to_string(), "handler#3");
    }
}
