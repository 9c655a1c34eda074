//! Shared emitter state: connected handlers, delivery and teardown.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{ContractPolicy, EmitterConfig};
use crate::event::sealed::DispatchToken;
use crate::event::{AnyEvent, Event};
use crate::handler::HandlerShared;
use crate::ids::{EmitterId, HandlerId};

/// Delivery counters for one emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitStats {
    /// Events dispatched to handlers.
    pub emitted: u64,
    /// Dispatched events for which at least one callback ran.
    pub handled: u64,
    /// Dispatched events no callback matched.
    pub unhandled: u64,
    /// Events refused because their family is outside the emitter's set.
    pub rejected: u64,
}

/// The part every emitter has in common.
///
/// Concrete emitters embed an `EmitterCore` and expose it through
/// [`Emitter::core`](super::Emitter::core). Dropping the core disconnects
/// every handler still connected to it.
pub struct EmitterCore {
    shared: Rc<EmitterShared>,
    config: EmitterConfig,
    stats: Cell<EmitStats>,
}

impl EmitterCore {
    /// Creates a core with no connected handlers.
    pub fn new(config: EmitterConfig) -> Self {
        let core = Self {
            shared: Rc::new(EmitterShared {
                id: EmitterId::next(),
                handlers: RefCell::new(Vec::new()),
            }),
            config,
            stats: Cell::new(EmitStats::default()),
        };
        debug!(emitter = %core.id(), label = ?core.config.label, "emitter created");
        core
    }

    /// Returns this emitter's id.
    pub fn id(&self) -> EmitterId {
        self.shared.id
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Returns a snapshot of the delivery counters.
    pub fn stats(&self) -> EmitStats {
        self.stats.get()
    }

    /// Returns the number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.shared.handlers.borrow().len()
    }

    /// Returns true if the handler with `id` is connected.
    pub fn has_handler(&self, id: HandlerId) -> bool {
        self.shared
            .handlers
            .borrow()
            .iter()
            .any(|(handler, _)| *handler == id)
    }

    /// Applies the contract policy, then dispatches `event`.
    ///
    /// `permitted` is the result of the owning emitter's capability check.
    pub(crate) fn emit(&self, event: &dyn AnyEvent, permitted: bool) -> bool {
        let family = event.family();

        if !permitted {
            match self.config.contract_policy {
                ContractPolicy::Panic => panic!(
                    "{} cannot emit {} ({family}): not in its declared family set",
                    self.id(),
                    event.type_name(),
                ),
                ContractPolicy::Reject => {
                    warn!(
                        emitter = %self.id(),
                        label = ?self.config.label,
                        event = event.type_name(),
                        %family,
                        "rejected event outside declared family set"
                    );
                    self.record(|stats| stats.rejected += 1);
                    return false;
                }
            }
        }

        let handled = event.dispatch_into(self, DispatchToken::new());

        self.record(|stats| {
            stats.emitted += 1;
            if handled {
                stats.handled += 1;
            } else {
                stats.unhandled += 1;
            }
        });

        trace!(
            emitter = %self.id(),
            label = ?self.config.label,
            event = event.type_name(),
            %family,
            handled,
            "emitted event"
        );

        handled
    }

    /// Hands `event` to every connected handler at its concrete type.
    ///
    /// Iterates over a snapshot, and skips handlers that were dropped or
    /// disconnected by an earlier callback in the same pass.
    pub(crate) fn deliver<T: Event>(&self, event: &T) -> bool {
        let emitter = self.id();
        let handlers: Vec<Weak<HandlerShared>> = self
            .shared
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        let mut handled = false;
        for handler in handlers {
            let Some(handler) = handler.upgrade() else {
                continue;
            };
            if !handler.is_connected_to(emitter) {
                continue;
            }
            if handler.receive(emitter, event) {
                handled = true;
            }
        }
        handled
    }

    pub(crate) fn register(&self, id: HandlerId, handler: Weak<HandlerShared>) {
        self.shared.register(id, handler);
    }

    pub(crate) fn unregister(&self, id: HandlerId) {
        self.shared.unregister(id);
    }

    pub(crate) fn downgrade(&self) -> Weak<EmitterShared> {
        Rc::downgrade(&self.shared)
    }

    fn record(&self, update: impl FnOnce(&mut EmitStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl Drop for EmitterCore {
    fn drop(&mut self) {
        let handlers = std::mem::take(&mut *self.shared.handlers.borrow_mut());

        for (_, handler) in &handlers {
            if let Some(handler) = handler.upgrade() {
                handler.forget_emitter(self.shared.id);
            }
        }

        debug!(
            emitter = %self.shared.id,
            handlers = handlers.len(),
            "emitter dropped"
        );
    }
}

impl fmt::Debug for EmitterCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterCore")
            .field("id", &self.shared.id)
            .field("label", &self.config.label)
            .field("handlers", &self.handler_count())
            .field("stats", &self.stats.get())
            .finish()
    }
}

/// State reachable from handlers through a `Weak` reference.
pub(crate) struct EmitterShared {
    id: EmitterId,
    handlers: RefCell<Vec<(HandlerId, Weak<HandlerShared>)>>,
}

impl EmitterShared {
    fn register(&self, id: HandlerId, handler: Weak<HandlerShared>) {
        let mut handlers = self.handlers.borrow_mut();
        if !handlers.iter().any(|(existing, _)| *existing == id) {
            handlers.push((id, handler));
        }
    }

    pub(crate) fn unregister(&self, id: HandlerId) {
        self.handlers.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}
