//! Domain events.
//!
//! Every state change in the order domain is described by an event emitted
//! from an aggregate's `handle` and folded back in with `apply`.

pub mod event;

pub use event::Event;
