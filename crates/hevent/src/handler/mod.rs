//! Handler - receives events from connected emitters through bound callbacks.
//!
//! # Callback Resolution
//!
//! For an event of type `T` arriving from emitter `E`, exactly one callback
//! runs, picked in this order:
//! 1. the callback installed with [`Handler::connect_with`] for `(E, T)`
//! 2. the callback installed with [`Handler::bind`] for `T`
//! 3. the default callback, which sees the event as `&dyn AnyEvent`
//!
//! If none exists the event is ignored.
//!
//! # Lifecycle
//!
//! Connections are recorded on both sides as weak references. Dropping a
//! `Handler` removes it from every emitter it is connected to, and dropping an
//! emitter removes it (and its per-emitter callbacks) from every handler.

mod callback;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::emitter::{Emitter, EmitterCore, EmitterShared};
use crate::error::{EventError, Result};
use crate::event::{AnyEvent, Event};
use crate::family::{family_of, Family};
use crate::ids::{EmitterId, HandlerId};

use self::callback::{DefaultCallback, Resolved, TypedCallback};

/// Receives events from any number of emitters.
///
/// All methods take `&self`, so callbacks holding a reference (or a `Weak`)
/// to their own handler may rebind or disconnect it while an event is being
/// delivered.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use hevent::{Bus, Emitter, Event, Handler};
///
/// struct Saved(&'static str);
/// impl Event for Saved {}
///
/// let bus = Bus::new();
/// let handler = Handler::new();
/// let last = Rc::new(Cell::new(""));
///
/// let l = last.clone();
/// handler.bind(move |e: &Saved| l.set(e.0));
/// handler.connect(&bus);
///
/// assert!(bus.emit(&Saved("notes.txt")));
/// assert_eq!(last.get(), "notes.txt");
/// ```
pub struct Handler {
    shared: Rc<HandlerShared>,
}

impl Handler {
    /// Creates a handler with no callbacks.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(HandlerShared {
                id: HandlerId::next(),
                state: RefCell::new(HandlerState::default()),
            }),
        }
    }

    /// Creates a handler whose default callback is `callback`.
    pub fn with_default<F>(callback: F) -> Self
    where
        F: Fn(&dyn AnyEvent) + 'static,
    {
        let handler = Self::new();
        handler.set_default(callback);
        handler
    }

    /// Returns this handler's id.
    pub fn id(&self) -> HandlerId {
        self.shared.id
    }

    /// Sets the callback used when no typed callback matches.
    pub fn set_default<F>(&self, callback: F)
    where
        F: Fn(&dyn AnyEvent) + 'static,
    {
        let callback: DefaultCallback = Rc::new(callback);
        // The old callback may own a connected emitter; drop it unborrowed.
        let old = self.shared.state.borrow_mut().default.replace(callback);
        drop(old);
    }

    /// Removes the default callback.
    pub fn clear_default(&self) {
        // Take first so the old callback is dropped outside the borrow.
        let old = self.shared.state.borrow_mut().default.take();
        drop(old);
    }

    /// Sets the callback for events of type `T` from any emitter.
    ///
    /// Replaces any earlier binding for `T`. No connection is needed; the
    /// binding applies to every emitter this handler is or will be connected to.
    pub fn bind<T, F>(&self, callback: F)
    where
        T: Event,
        F: Fn(&T) + 'static,
    {
        let family = family_of::<T>();
        let old = self
            .shared
            .state
            .borrow_mut()
            .by_family
            .insert(family, TypedCallback::new(callback));
        drop(old);
    }

    /// Removes the callback bound for `T`. Returns true if one existed.
    pub fn unbind<T: Event>(&self) -> bool {
        let family = family_of::<T>();
        let old = self.shared.state.borrow_mut().by_family.remove(&family);
        old.is_some()
    }

    /// Connects to `emitter` using the callbacks already bound on this handler.
    ///
    /// Connecting twice is a no-op.
    pub fn connect<E>(&self, emitter: &E)
    where
        E: Emitter + ?Sized,
    {
        self.attach(emitter.core());
    }

    /// Connects to `emitter` and sets the callback for `T` events from it.
    ///
    /// This callback takes precedence over [`bind`](Self::bind) for events
    /// coming from `emitter`. Fails without connecting if `emitter` does not
    /// declare `T` in its family set.
    pub fn connect_with<T, E, F>(&self, emitter: &E, callback: F) -> Result<()>
    where
        T: Event,
        E: Emitter + ?Sized,
        F: Fn(&T) + 'static,
    {
        let family = family_of::<T>();
        let core = emitter.core();

        if !emitter.can_emit(family) {
            return Err(EventError::UnsupportedFamily {
                emitter: core.id(),
                family,
                event: std::any::type_name::<T>(),
            });
        }

        self.attach(core);

        let old = self
            .shared
            .state
            .borrow_mut()
            .by_emitter
            .entry(core.id())
            .or_default()
            .insert(family, TypedCallback::new(callback));
        drop(old);

        Ok(())
    }

    /// Disconnects from `emitter`, dropping any callbacks specific to it.
    ///
    /// Disconnecting an emitter that is not connected is a no-op.
    pub fn disconnect<E>(&self, emitter: &E)
    where
        E: Emitter + ?Sized,
    {
        let core = emitter.core();
        let emitter_id = core.id();

        let (was_connected, callbacks) = {
            let mut state = self.shared.state.borrow_mut();
            let before = state.emitters.len();
            state.emitters.retain(|(id, _)| *id != emitter_id);
            (state.emitters.len() != before, state.by_emitter.remove(&emitter_id))
        };
        drop(callbacks);

        core.unregister(self.shared.id);

        if was_connected {
            debug!(handler = %self.shared.id, emitter = %emitter_id, "handler disconnected");
        }
    }

    /// Returns true if this handler is connected to `emitter`.
    pub fn is_connected<E>(&self, emitter: &E) -> bool
    where
        E: Emitter + ?Sized,
    {
        self.shared.is_connected_to(emitter.core().id())
    }

    /// Returns the number of emitters this handler is connected to.
    pub fn emitter_count(&self) -> usize {
        self.shared.state.borrow().emitters.len()
    }

    /// Records the connection on both sides.
    fn attach(&self, core: &EmitterCore) {
        let emitter_id = core.id();

        let added = {
            let mut state = self.shared.state.borrow_mut();
            if state.emitters.iter().any(|(id, _)| *id == emitter_id) {
                false
            } else {
                state.emitters.push((emitter_id, core.downgrade()));
                true
            }
        };

        core.register(self.shared.id, Rc::downgrade(&self.shared));

        if added {
            debug!(handler = %self.shared.id, emitter = %emitter_id, "handler connected");
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Handler {
    fn drop(&mut self) {
        // Callbacks are dropped with `state`, after the borrow is released.
        let state = std::mem::take(&mut *self.shared.state.borrow_mut());

        for (_, emitter) in &state.emitters {
            if let Some(emitter) = emitter.upgrade() {
                emitter.unregister(self.shared.id);
            }
        }

        debug!(
            handler = %self.shared.id,
            emitters = state.emitters.len(),
            "handler dropped"
        );
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Handler")
            .field("id", &self.shared.id)
            .field("emitters", &state.emitters.len())
            .field("has_default", &state.default.is_some())
            .field("bound", &state.by_family.len())
            .finish()
    }
}

/// State reachable from emitters through a `Weak` reference.
pub(crate) struct HandlerShared {
    id: HandlerId,
    state: RefCell<HandlerState>,
}

#[derive(Default)]
struct HandlerState {
    default: Option<DefaultCallback>,
    by_family: HashMap<Family, TypedCallback>,
    by_emitter: HashMap<EmitterId, HashMap<Family, TypedCallback>>,
    emitters: Vec<(EmitterId, Weak<EmitterShared>)>,
}

impl HandlerShared {
    pub(crate) fn is_connected_to(&self, emitter: EmitterId) -> bool {
        self.state
            .borrow()
            .emitters
            .iter()
            .any(|(id, _)| *id == emitter)
    }

    /// Delivers `event` from `emitter`. Returns true if a callback ran.
    pub(crate) fn receive<T: Event>(&self, emitter: EmitterId, event: &T) -> bool {
        let Some(callback) = self.resolve::<T>(emitter) else {
            return false;
        };

        callback.invoke(event);
        true
    }

    fn resolve<T: Event>(&self, emitter: EmitterId) -> Option<Resolved<T>> {
        let family = family_of::<T>();
        let state = self.state.borrow();

        let typed = state
            .by_emitter
            .get(&emitter)
            .and_then(|callbacks| callbacks.get(&family))
            .or_else(|| state.by_family.get(&family))
            .and_then(TypedCallback::typed::<T>);

        match typed {
            Some(callback) => Some(Resolved::Typed(callback)),
            None => state.default.clone().map(Resolved::Default),
        }
    }

    /// Called when a connected emitter is dropped.
    pub(crate) fn forget_emitter(&self, emitter: EmitterId) {
        let callbacks = {
            let mut state = self.state.borrow_mut();
            state.emitters.retain(|(id, _)| *id != emitter);
            state.by_emitter.remove(&emitter)
        };
        drop(callbacks);
    }
}
