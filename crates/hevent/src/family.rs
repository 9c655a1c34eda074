//! Event family identity.
//!
//! Every concrete event type is assigned a [`Family`] the first time it is
//! asked for. Ids come from a single process-wide counter and are never
//! reused, so the mapping from type to family is injective and stable.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{OnceLock, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

static FAMILY_COUNTER: AtomicU32 = AtomicU32::new(0);
static FAMILY_REGISTRY: OnceLock<RwLock<HashMap<TypeId, Family>>> = OnceLock::new();

/// Unique identifier of a concrete event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family(u32);

impl Family {
    /// Returns the family of `T`, assigning one on first use.
    pub fn of<T: 'static + ?Sized>() -> Self {
        let registry = FAMILY_REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
        let key = TypeId::of::<T>();

        // The map is insert-only, so a poisoned lock still holds valid data.
        if let Some(family) = registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return *family;
        }

        let mut map = registry.write().unwrap_or_else(|e| e.into_inner());
        *map.entry(key).or_insert_with(|| {
            let family = Family(FAMILY_COUNTER.fetch_add(1, Ordering::Relaxed));
            debug!(%family, event = type_name::<T>(), "assigned event family");
            family
        })
    }

    /// Returns the raw numeric id.
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "family#{}", self.0)
    }
}

/// Returns the family of `T`. Shorthand for [`Family::of`].
pub fn family_of<T: 'static + ?Sized>() -> Family {
    Family::of::<T>()
}
