//! Emitters - broadcast events to connected handlers.
//!
//! Two concrete emitters are provided:
//! - [`TypedEmitter`]: declares a closed set of event types, e.g.
//!   `TypedEmitter<(Opened, Closed)>`.
//! - [`Bus`]: relays events of any type.
//!
//! Custom emitters embed an [`EmitterCore`] and implement [`Emitter`].

mod base;
mod bus;
mod typed;

pub use self::base::{EmitStats, EmitterCore};
pub use self::bus::Bus;
pub use self::typed::{FamilySet, TypedEmitter};

pub(crate) use self::base::EmitterShared;

use crate::error::Result;
use crate::event::{AnyEvent, Event};
use crate::family::{family_of, Family};
use crate::handler::Handler;
use crate::ids::EmitterId;

/// Common interface of all emitters.
pub trait Emitter {
    /// Returns the shared emitter state.
    fn core(&self) -> &EmitterCore;

    /// Returns true if this emitter declares `family` among the events it emits.
    fn can_emit(&self, family: Family) -> bool;

    /// Returns this emitter's id.
    fn id(&self) -> EmitterId {
        self.core().id()
    }

    /// Returns true if this emitter declares `T` among the events it emits.
    fn can_emit_event<T: Event>(&self) -> bool
    where
        Self: Sized,
    {
        self.can_emit(family_of::<T>())
    }

    /// Sends `event` to every connected handler.
    ///
    /// Returns true if at least one handler ran a callback for it. Emitting a
    /// family outside [`can_emit`](Self::can_emit) is a contract violation,
    /// handled per [`ContractPolicy`](crate::ContractPolicy): a panic by
    /// default, or a `false` return under `Reject`.
    fn emit(&self, event: &dyn AnyEvent) -> bool {
        let permitted = self.can_emit(event.family());
        self.core().emit(event, permitted)
    }

    /// Same as [`Handler::connect_with`] with this emitter.
    fn connect<T, F>(&self, handler: &Handler, callback: F) -> Result<()>
    where
        Self: Sized,
        T: Event,
        F: Fn(&T) + 'static,
    {
        handler.connect_with::<T, Self, F>(self, callback)
    }

    /// Same as [`Handler::disconnect`] with this emitter.
    fn disconnect(&self, handler: &Handler) {
        handler.disconnect(self);
    }

    /// Returns true if `handler` is connected to this emitter.
    fn is_connected(&self, handler: &Handler) -> bool {
        self.core().has_handler(handler.id())
    }

    /// Returns the number of connected handlers.
    fn handler_count(&self) -> usize {
        self.core().handler_count()
    }

    /// Returns a snapshot of the delivery counters.
    fn stats(&self) -> EmitStats {
        self.core().stats()
    }
}
