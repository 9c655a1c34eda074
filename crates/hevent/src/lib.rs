//! Synchronous, type-safe in-process events.
//!
//! This crate provides:
//! - **Events**: any `'static` type implementing the [`Event`] marker, each
//!   with a process-unique [`Family`] id
//! - **Emitters**: [`TypedEmitter`] for a closed set of event types and
//!   [`Bus`] for any type, both implementing [`Emitter`]
//! - **Handlers**: [`Handler`] with per-emitter, per-type and default callbacks
//!
//! Delivery is immediate: `emit` calls every matching callback before it
//! returns. Handlers and emitters reference each other weakly and unregister
//! on drop, so neither side ever dispatches to a destroyed peer.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use hevent::{Bus, Emitter, Event, Handler, TypedEmitter};
//!
//! struct Connected;
//! impl Event for Connected {}
//! struct Disconnected;
//! impl Event for Disconnected {}
//!
//! let link: TypedEmitter<(Connected, Disconnected)> = TypedEmitter::new();
//! let bus = Bus::new();
//!
//! let seen = Rc::new(Cell::new(0));
//! let s = seen.clone();
//! let handler = Handler::with_default(move |_| s.set(s.get() + 1));
//! handler.connect(&link);
//! handler.connect(&bus);
//!
//! // Per-emitter callback takes precedence over the default.
//! link.connect(&handler, |_: &Connected| println!("link up")).unwrap();
//!
//! assert!(link.emit(&Connected));
//! assert!(bus.emit(&Disconnected));
//! assert_eq!(seen.get(), 1);
//!
//! drop(handler);
//! assert_eq!(bus.handler_count(), 0);
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod family;
mod handler;
pub mod ids;

pub use config::{ContractPolicy, EmitterConfig};
pub use emitter::{Bus, EmitStats, Emitter, EmitterCore, FamilySet, TypedEmitter};
pub use error::{EventError, Result};
pub use event::{AnyEvent, Event};
pub use family::{family_of, Family};
pub use handler::Handler;
pub use ids::{EmitterId, HandlerId};
