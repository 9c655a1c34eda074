//! Event types and the common event view used for dispatch.
//!
//! A concrete event is any `'static` type implementing the [`Event`] marker:
//!
//! ```
//! use hevent::Event;
//!
//! #[derive(Debug, Clone)]
//! struct BuildFinished {
//!     success: bool,
//! }
//!
//! impl Event for BuildFinished {}
//! ```
//!
//! Emitters only ever see events through [`AnyEvent`]. The blanket
//! implementation knows the concrete type, so its dispatch step
//! hands the event back to the emitter typed, which is how a handler's typed
//! callbacks get resolved without the emitter knowing `T`.
//!
//! That step can only be started by [`Emitter::emit`](crate::Emitter::emit),
//! so the capability check and delivery counters always apply:
//!
//! ```compile_fail
//! use hevent::{AnyEvent, Bus, Emitter, Event};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! let bus = Bus::new();
//! let event: &dyn AnyEvent = &Ping;
//! event.dispatch_into(bus.core(), hevent::event::sealed::DispatchToken::new());
//! ```

use std::any::{type_name, Any};

use crate::emitter::EmitterCore;
use crate::family::Family;

/// Marker trait for concrete event types.
///
/// The family of an event type is obtained with [`family_of`](crate::family_of).
pub trait Event: Any {}

pub(crate) mod sealed {
    pub trait Sealed {}

    impl<T: super::Event> Sealed for T {}

    /// Proof that a dispatch was started from inside this crate.
    pub struct DispatchToken(());

    impl DispatchToken {
        pub(crate) fn new() -> Self {
            Self(())
        }
    }
}

/// Type-erased view of an event, implemented for every [`Event`].
pub trait AnyEvent: sealed::Sealed {
    /// Family of the concrete event type.
    fn family(&self) -> Family;

    /// Name of the concrete event type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Returns the event as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Delivers this event, at its concrete type, to every handler connected
    /// to `emitter`. Returns true if any callback ran.
    ///
    /// Only reachable through [`Emitter::emit`](crate::Emitter::emit), which
    /// applies the capability check first.
    #[doc(hidden)]
    fn dispatch_into(&self, emitter: &EmitterCore, token: sealed::DispatchToken) -> bool;
}

impl<T: Event> AnyEvent for T {
    fn family(&self) -> Family {
        Family::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispatch_into(&self, emitter: &EmitterCore, _token: sealed::DispatchToken) -> bool {
        emitter.deliver(self)
    }
}

impl dyn AnyEvent + '_ {
    /// Returns true if the concrete event type is `T`.
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns the event as `&T` if that is its concrete type.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::family_of;

    #[derive(Debug, PartialEq)]
    struct Ping(u32);
    impl Event for Ping {}

    struct Pong;
    impl Event for Pong {}

    #[test]
    fn test_family_matches_type() {
        let ping = Ping(1);
        let erased: &dyn AnyEvent = &ping;

        assert_eq!(erased.family(), family_of::<Ping>());
        assert_ne!(erased.family(), family_of::<Pong>());
    }

    #[test]
    fn test_downcast() {
        let ping = Ping(42);
        let erased: &dyn AnyEvent = &ping;

        assert!(erased.is::<Ping>());
        assert!(!erased.is::<Pong>());
        assert_eq!(erased.downcast_ref::<Ping>(), Some(&Ping(42)));
        assert!(erased.downcast_ref::<Pong>().is_none());
    }

    #[test]
    fn test_type_name() {
        let erased: &dyn AnyEvent = &Pong;
        assert!(erased.type_name().ends_with("Pong"));
    }
}
