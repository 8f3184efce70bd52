//! Marketplace Simulator Core
//!
//! Discrete-event simulator of a two-operator digital marketplace: buyers
//! arrive stochastically requesting a service, two network operators
//! ("bidders") compete for each request through sealed bids weighted by
//! price and reputation, and the winner's capacity and reputation evolve
//! as requests are serviced and terminated.
//!
//! # Architecture
//!
//! - **engine**: discrete-event kernel (clock, event queue, dispatch)
//! - **marketplace**: auction orchestration (the domain event handler)
//! - **models**: domain types (ServiceType, Bidder, SimulationReport)
//! - **strategy**: bidding and reputation-update policies
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness flows through one seeded [`RngManager`] per run, in a
//!    fixed draw order: same seed, same scenario, same results.
//! 2. Events dispatch in non-decreasing time order; ties dispatch in FIFO
//!    insertion order.
//! 3. A bidder's available capacity plus its dedicated capacity always
//!    equals its total capacity, and its reputation rating stays in [0, 1].

pub mod engine;
pub mod errors;
pub mod marketplace;
pub mod models;
pub mod rng;
pub mod strategy;

// Re-exports for convenience
pub use engine::{
    CallbackKind, Event, EventHandler, EventKind, SimulationContext, SimulationEngine,
    SimulationError, SimulationObserver,
};
pub use errors::ConfigError;
pub use marketplace::{Marketplace, MarketplaceConfig};
pub use models::{
    Bidder, BidderConfig, BidderError, BidderId, BidderSeries, PriceSeries, ServiceType,
    SimulationReport,
};
pub use rng::RngManager;
pub use strategy::{
    Bid, BiddingStrategy, BiddingStrategyConfig, ReputationStrategy, ReputationStrategyConfig,
};
