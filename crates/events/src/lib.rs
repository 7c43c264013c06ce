//! `carbonharvest-events` — event trait and pub/sub plumbing.
//!
//! Transport-agnostic: the ledger defines its events against [`Event`], and
//! consumers (notification worker, SSE stream) subscribe through [`EventBus`]
//! without caring which transport backs it.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
