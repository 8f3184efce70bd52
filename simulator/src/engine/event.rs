//! Event model and time-ordered event queue
//!
//! Exactly one event taxonomy is modeled: buyer service requests, service
//! terminations, and the terminal `Stop` marker. Events are immutable once
//! created. The queue dispatches by ascending time; events at equal times
//! dispatch in FIFO insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::{BidderId, ServiceType};

/// Event discriminant plus its domain payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// A buyer arrives requesting a service; triggers an auction.
    ServiceRequest {
        service_type: ServiceType,
        /// Index into the marketplace's discretized price-weight space.
        price_weight_index: usize,
    },
    /// The winning bidder finishes servicing a request and reclaims the
    /// capacity dedicated to it.
    ServiceTermination { bidder: BidderId, request_id: u64 },
    /// Terminal event; ends the control loop.
    Stop,
}

/// Immutable record of a scheduled occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    kind: EventKind,
    time: f64,
}

impl Event {
    pub fn new(kind: EventKind, time: f64) -> Self {
        Self { kind, time }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.kind, EventKind::Stop)
    }
}

#[derive(Debug)]
struct QueuedEvent {
    event: Event,
    seq: u64,
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap: earliest time
        // first, then lowest insertion sequence (FIFO within a time).
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

/// Min-time-first event queue with stable FIFO tie ordering.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedEvent { event, seq });
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|queued| queued.event)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_at(time: f64, price_weight_index: usize) -> Event {
        Event::new(
            EventKind::ServiceRequest {
                service_type: ServiceType::WebBrowsing,
                price_weight_index,
            },
            time,
        )
    }

    #[test]
    fn pops_events_in_time_order() {
        let mut queue = EventQueue::new();
        queue.push(request_at(10.0, 0));
        queue.push(request_at(5.0, 1));
        queue.push(request_at(20.0, 2));

        assert_eq!(queue.pop().unwrap().time(), 5.0);
        assert_eq!(queue.pop().unwrap().time(), 10.0);
        assert_eq!(queue.pop().unwrap().time(), 20.0);
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_times_pop_in_insertion_order() {
        let mut queue = EventQueue::new();
        for index in 0..5 {
            queue.push(request_at(1.0, index));
        }

        for expected in 0..5 {
            match queue.pop().unwrap().kind() {
                EventKind::ServiceRequest {
                    price_weight_index, ..
                } => assert_eq!(price_weight_index, expected),
                other => panic!("unexpected event kind: {:?}", other),
            }
        }
    }
}
