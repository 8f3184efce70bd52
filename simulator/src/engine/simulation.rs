//! Simulation engine: control loop, context, callbacks
//!
//! The engine is created once per run, seeded once, and destroyed with the
//! run. A run is single-threaded and cooperative: all state mutation
//! happens synchronously inside handler dispatch, so no locking exists
//! anywhere in the core.

use thiserror::Error;
use tracing::debug;

use super::event::{Event, EventQueue};
use crate::models::BidderError;
use crate::rng::RngManager;

/// Errors raised while a simulation is running.
///
/// Both variants indicate programmer-visible defects, not transient
/// conditions; there are no retries in this core.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// An attempt to schedule an event in the past relative to the clock.
    #[error("cannot schedule event at {event_time} behind the clock at {clock}")]
    InvalidSchedule { event_time: f64, clock: f64 },

    /// Capacity was released for a request id that was never allocated;
    /// indicates an event-ordering defect.
    #[error("no capacity was dedicated to request {request_id}")]
    UnknownRequest { request_id: u64 },
}

impl From<BidderError> for SimulationError {
    fn from(err: BidderError) -> Self {
        match err {
            BidderError::UnknownRequest { request_id } => {
                SimulationError::UnknownRequest { request_id }
            }
        }
    }
}

/// Which engine notification a registered observer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Start,
    Stop,
    Event,
}

/// Diagnostic observer invoked on run start, run stop, or every dispatched
/// event. Observers cannot affect control flow.
pub trait SimulationObserver {
    fn on_start(&mut self) {}
    fn on_stop(&mut self) {}
    fn on_event(&mut self, _event: &Event) {}
}

/// The capability every concrete handler implements. No default behavior
/// is provided; a handler must implement all three operations.
pub trait EventHandler {
    /// Called exactly once, before any event dispatch.
    fn on_start(&mut self, ctx: &mut SimulationContext) -> Result<(), SimulationError>;

    /// Called once per dispatched non-terminal event, in non-decreasing
    /// time order.
    fn on_event(&mut self, ctx: &mut SimulationContext, event: &Event)
        -> Result<(), SimulationError>;

    /// Called exactly once, after the terminal event or once the queue
    /// runs dry.
    fn on_stop(&mut self, ctx: &mut SimulationContext) -> Result<(), SimulationError>;
}

/// Explicit simulation state passed to handlers: logical clock, event
/// queue, and the run's random generator. Replaces the global singleton
/// engine of the original design, so independent runs compose in-process.
#[derive(Debug)]
pub struct SimulationContext {
    clock: f64,
    queue: EventQueue,
    rng: RngManager,
}

impl SimulationContext {
    pub fn new(seed: u64) -> Self {
        Self {
            clock: 0.0,
            queue: EventQueue::new(),
            rng: RngManager::new(seed),
        }
    }

    /// Current simulation time. Monotonically non-decreasing.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// The run's random generator. All stochastic draws go through here.
    pub fn rng(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    /// Number of events still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Insert an event into the queue.
    pub fn schedule(&mut self, event: Event) -> Result<(), SimulationError> {
        if event.time() < self.clock {
            return Err(SimulationError::InvalidSchedule {
                event_time: event.time(),
                clock: self.clock,
            });
        }
        debug!(time = event.time(), kind = ?event.kind(), "scheduling event");
        self.queue.push(event);
        Ok(())
    }

    /// Pop the earliest event and advance the clock to its time.
    fn pop_next(&mut self) -> Option<Event> {
        let event = self.queue.pop()?;
        self.clock = event.time();
        Some(event)
    }
}

/// Owns the context and the observer callbacks; drives the control loop.
///
/// # Example
/// ```
/// use marketplace_simulator_core::{
///     Event, EventHandler, EventKind, ServiceType, SimulationContext, SimulationEngine,
///     SimulationError,
/// };
///
/// struct Counter(usize);
///
/// impl EventHandler for Counter {
///     fn on_start(&mut self, _ctx: &mut SimulationContext) -> Result<(), SimulationError> {
///         Ok(())
///     }
///     fn on_event(
///         &mut self,
///         _ctx: &mut SimulationContext,
///         _event: &Event,
///     ) -> Result<(), SimulationError> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn on_stop(&mut self, _ctx: &mut SimulationContext) -> Result<(), SimulationError> {
///         Ok(())
///     }
/// }
///
/// let mut engine = SimulationEngine::new(42);
/// engine
///     .schedule(Event::new(
///         EventKind::ServiceRequest {
///             service_type: ServiceType::Email,
///             price_weight_index: 0,
///         },
///         1.0,
///     ))
///     .unwrap();
/// engine.stop(10.0).unwrap();
///
/// let mut handler = Counter(0);
/// engine.start(&mut handler).unwrap();
/// assert_eq!(handler.0, 1);
/// assert_eq!(engine.clock(), 10.0);
/// ```
pub struct SimulationEngine {
    ctx: SimulationContext,
    observers: Vec<(CallbackKind, Box<dyn SimulationObserver>)>,
}

impl SimulationEngine {
    /// Create an engine for a single run, seeding its random generator.
    pub fn new(seed: u64) -> Self {
        Self {
            ctx: SimulationContext::new(seed),
            observers: Vec::new(),
        }
    }

    pub fn clock(&self) -> f64 {
        self.ctx.clock()
    }

    /// Insert an event into the queue.
    pub fn schedule(&mut self, event: Event) -> Result<(), SimulationError> {
        self.ctx.schedule(event)
    }

    /// Schedule the terminal `Stop` event `horizon` time units from the
    /// current clock, establishing the run's horizon.
    pub fn stop(&mut self, horizon: f64) -> Result<(), SimulationError> {
        let at = self.ctx.clock() + horizon;
        self.ctx
            .schedule(Event::new(super::event::EventKind::Stop, at))
    }

    /// Attach a diagnostic observer for the given notification kind.
    pub fn register_callback(&mut self, observer: Box<dyn SimulationObserver>, kind: CallbackKind) {
        self.observers.push((kind, observer));
    }

    /// Run the control loop to completion.
    ///
    /// Blocks until the `Stop` event dispatches or the queue empties.
    /// Guarantees at most one `on_start` and one `on_stop` per run, and
    /// `on_event` exactly once per non-terminal event in non-decreasing
    /// time order. Once `Stop` dispatches, still-queued events are
    /// discarded, not executed.
    pub fn start<H: EventHandler>(&mut self, handler: &mut H) -> Result<(), SimulationError> {
        debug!(seed_state = self.ctx.rng.state(), "simulation starting");
        handler.on_start(&mut self.ctx)?;
        self.notify(CallbackKind::Start, None);

        while let Some(event) = self.ctx.pop_next() {
            if event.is_stop() {
                self.ctx.queue.clear();
                break;
            }
            self.notify(CallbackKind::Event, Some(&event));
            handler.on_event(&mut self.ctx, &event)?;
        }

        handler.on_stop(&mut self.ctx)?;
        self.notify(CallbackKind::Stop, None);
        debug!(clock = self.ctx.clock(), "simulation finished");
        Ok(())
    }

    fn notify(&mut self, kind: CallbackKind, event: Option<&Event>) {
        for (registered, observer) in &mut self.observers {
            if *registered != kind {
                continue;
            }
            match kind {
                CallbackKind::Start => observer.on_start(),
                CallbackKind::Stop => observer.on_stop(),
                CallbackKind::Event => {
                    if let Some(event) = event {
                        observer.on_event(event);
                    }
                }
            }
        }
    }
}
