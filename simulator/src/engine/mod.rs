//! Discrete-event simulation kernel
//!
//! The kernel owns the logical clock and the event queue, and drives a
//! single control loop: pop the earliest event, advance the clock to its
//! time, dispatch it to the registered [`EventHandler`]. Handlers receive
//! the mutable [`SimulationContext`] so they can schedule follow-up events
//! back into the same run.
//!
//! The loop ends when a `Stop` event is dispatched (remaining queued
//! events are discarded) or when the queue runs dry.

mod event;
mod simulation;

pub use event::{Event, EventKind, EventQueue};
pub use simulation::{
    CallbackKind, EventHandler, SimulationContext, SimulationEngine, SimulationError,
    SimulationObserver,
};
