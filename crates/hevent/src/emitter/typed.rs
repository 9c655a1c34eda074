//! Emitter restricted to a closed set of event types.

use std::fmt;
use std::marker::PhantomData;

use crate::config::EmitterConfig;
use crate::event::Event;
use crate::family::{family_of, Family};

use super::{Emitter, EmitterCore};

/// A closed set of event types, expressed as a tuple.
///
/// Implemented for `()` and for tuples of up to twelve [`Event`] types.
pub trait FamilySet: 'static {
    /// Returns true if `family` belongs to the set.
    fn contains(family: Family) -> bool;

    /// Lists the families in declaration order.
    fn families() -> Vec<Family>;
}

impl FamilySet for () {
    fn contains(_family: Family) -> bool {
        false
    }

    fn families() -> Vec<Family> {
        Vec::new()
    }
}

macro_rules! impl_family_set {
    ($($event:ident),+) => {
        impl<$($event: Event),+> FamilySet for ($($event,)+) {
            fn contains(family: Family) -> bool {
                $(family == family_of::<$event>())||+
            }

            fn families() -> Vec<Family> {
                vec![$(family_of::<$event>()),+]
            }
        }
    };
}

impl_family_set!(A);
impl_family_set!(A, B);
impl_family_set!(A, B, C);
impl_family_set!(A, B, C, D);
impl_family_set!(A, B, C, D, E);
impl_family_set!(A, B, C, D, E, F);
impl_family_set!(A, B, C, D, E, F, G);
impl_family_set!(A, B, C, D, E, F, G, H);
impl_family_set!(A, B, C, D, E, F, G, H, I);
impl_family_set!(A, B, C, D, E, F, G, H, I, J);
impl_family_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_family_set!(A, B, C, D, E, F, G, H, I, J, K, L);

/// Emitter that only emits the event types in `S`.
///
/// ```
/// use hevent::{Emitter, Event, TypedEmitter};
///
/// struct Opened;
/// impl Event for Opened {}
/// struct Closed;
/// impl Event for Closed {}
///
/// let door: TypedEmitter<(Opened, Closed)> = TypedEmitter::new();
/// assert!(door.can_emit_event::<Opened>());
/// ```
pub struct TypedEmitter<S: FamilySet> {
    core: EmitterCore,
    _families: PhantomData<fn() -> S>,
}

impl<S: FamilySet> TypedEmitter<S> {
    /// Creates an emitter with default configuration.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter with the given configuration.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            core: EmitterCore::new(config),
            _families: PhantomData,
        }
    }

    /// Lists the declared families.
    pub fn families(&self) -> Vec<Family> {
        S::families()
    }
}

impl<S: FamilySet> Default for TypedEmitter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FamilySet> Emitter for TypedEmitter<S> {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn can_emit(&self, family: Family) -> bool {
        S::contains(family)
    }
}

impl<S: FamilySet> fmt::Debug for TypedEmitter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEmitter")
            .field("core", &self.core)
            .field("families", &S::families())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContractPolicy;

    struct Opened;
    impl Event for Opened {}
    struct Closed;
    impl Event for Closed {}
    struct Locked;
    impl Event for Locked {}

    type Door = TypedEmitter<(Opened, Closed)>;

    #[test]
    fn test_declared_families() {
        let door = Door::new();

        assert!(door.can_emit_event::<Opened>());
        assert!(door.can_emit_event::<Closed>());
        assert!(!door.can_emit_event::<Locked>());
        assert_eq!(
            door.families(),
            vec![family_of::<Opened>(), family_of::<Closed>()]
        );
    }

    #[test]
    fn test_empty_set_emits_nothing() {
        let silent: TypedEmitter<()> = TypedEmitter::new();
        assert!(!silent.can_emit_event::<Opened>());
        assert!(silent.families().is_empty());
    }

    #[test]
    fn test_single_element_set() {
        let only: TypedEmitter<(Locked,)> = TypedEmitter::new();
        assert!(only.can_emit_event::<Locked>());
        assert!(!only.can_emit_event::<Opened>());
    }

    #[test]
    #[should_panic(expected = "cannot emit")]
    fn test_out_of_set_emit_panics() {
        let door = Door::new();
        door.emit(&Locked);
    }

    #[test]
    fn test_out_of_set_emit_rejected() {
        let door = Door::with_config(
            EmitterConfig::new().with_contract_policy(ContractPolicy::Reject),
        );

        assert!(!door.emit(&Locked));

        let stats = door.stats();
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.emitted, 0);
    }

    #[test]
    fn test_in_set_emit_without_handlers() {
        let door = Door::new();
        assert!(!door.emit(&Opened));
        assert_eq!(door.stats().unhandled, 1);
    }
}
