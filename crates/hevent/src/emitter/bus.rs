//! Unrestricted emitter.

use crate::config::EmitterConfig;
use crate::family::Family;

use super::{Emitter, EmitterCore};

/// Emitter that can relay events of any type.
#[derive(Debug)]
pub struct Bus {
    core: EmitterCore,
}

impl Bus {
    /// Creates a bus with default configuration.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            core: EmitterCore::new(config),
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for Bus {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn can_emit(&self, _family: Family) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::family::family_of;

    struct Anything;
    impl Event for Anything {}

    #[test]
    fn test_bus_accepts_every_family() {
        let bus = Bus::new();
        assert!(bus.can_emit_event::<Anything>());
        assert!(bus.can_emit(family_of::<String>()));
    }

    #[test]
    fn test_emit_without_handlers() {
        let bus = Bus::new();
        assert!(!bus.emit(&Anything));

        let stats = bus.stats();
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.unhandled, 1);
    }

    #[test]
    fn test_ids_differ() {
        assert_ne!(Bus::new().id(), Bus::default().id());
    }
}
