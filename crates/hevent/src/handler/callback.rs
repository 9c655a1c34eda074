//! Callback storage.

use std::any::Any;
use std::rc::Rc;

use crate::event::{AnyEvent, Event};

/// Fallback callback, sees events only through their common view.
pub(crate) type DefaultCallback = Rc<dyn Fn(&dyn AnyEvent)>;

/// A callback for one concrete event type, stored without its type parameter.
///
/// Always keyed by the family of the `T` it was built for, so [`typed`]
/// only misses if the key and the callback disagree.
///
/// [`typed`]: TypedCallback::typed
#[derive(Clone)]
pub(crate) struct TypedCallback(Rc<dyn Any>);

impl TypedCallback {
    pub(crate) fn new<T, F>(callback: F) -> Self
    where
        T: Event,
        F: Fn(&T) + 'static,
    {
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        Self(Rc::new(callback))
    }

    /// Recovers the callback at its concrete event type.
    pub(crate) fn typed<T: Event>(&self) -> Option<Rc<dyn Fn(&T)>> {
        self.0.downcast_ref::<Rc<dyn Fn(&T)>>().cloned()
    }
}

/// Callback chosen for one delivery, cloned out of the handler state.
pub(crate) enum Resolved<T: Event> {
    Typed(Rc<dyn Fn(&T)>),
    Default(DefaultCallback),
}

impl<T: Event> Resolved<T> {
    pub(crate) fn invoke(&self, event: &T) {
        match self {
            Resolved::Typed(callback) => callback(event),
            Resolved::Default(callback) => callback(event as &dyn AnyEvent),
        }
    }
}
