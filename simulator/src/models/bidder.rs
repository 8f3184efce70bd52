//! Bidder (network operator) model
//!
//! A bidder holds its cost knowledge, reputation rating, capacity
//! bookkeeping, and per-run history. State is mutated only through
//! [`Bidder::submit_bid`], [`Bidder::service_request`] and
//! [`Bidder::finish_servicing_request`].
//!
//! # Invariants
//!
//! After every call:
//! - `0 <= available_capacity <= total_capacity`
//! - `available_capacity + sum(dedicated_capacity) == total_capacity`
//! - `reputation` stays in [0, 1]

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::ConfigError;
use crate::rng::RngManager;
use crate::strategy::{
    Bid, BiddingStrategy, BiddingStrategyConfig, ReputationStrategy, ReputationStrategyConfig,
};

use super::service::ServiceType;

/// Unique bidder identifier within a marketplace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BidderId(pub u32);

impl fmt::Display for BidderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bidder_{}", self.0)
    }
}

/// Errors that can occur during bidder operations.
#[derive(Debug, Error, PartialEq)]
pub enum BidderError {
    #[error("no capacity was dedicated to request {request_id}")]
    UnknownRequest { request_id: u64 },
}

/// Everything a bidder needs at construction time. All fields are
/// required; validation happens in [`Bidder::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderConfig {
    /// Total bit-rate the operator can dedicate across live requests.
    pub total_capacity: f64,

    /// Preset costs per service type, each in [0, 1]. Costs for service
    /// types not listed here are generated lazily, once, on first demand.
    #[serde(default)]
    pub costs: BTreeMap<ServiceType, f64>,

    /// Bidding behavior.
    pub bidding: BiddingStrategyConfig,

    /// Initial reputation rating (lower is better), in [0, 1].
    pub initial_reputation: f64,

    /// Reputation-rating update policy.
    pub reputation_update: ReputationStrategyConfig,
}

/// A network operator competing in the marketplace.
#[derive(Debug, Clone)]
pub struct Bidder {
    id: BidderId,
    costs: BTreeMap<ServiceType, f64>,
    bidding: BiddingStrategy,
    reputation: f64,
    reputation_update: ReputationStrategy,
    total_capacity: f64,
    available_capacity: f64,
    dedicated_capacity: BTreeMap<u64, f64>,
    reputation_history: Vec<f64>,
    winnings_history: Vec<u64>,
    success_window: VecDeque<bool>,
}

impl Bidder {
    /// Validate the configuration and construct the bidder.
    ///
    /// Fails if the capacity is not positive, the initial rating or any
    /// preset cost falls outside [0, 1], or either strategy rejects its
    /// parameters.
    pub fn new(id: BidderId, config: BidderConfig) -> Result<Self, ConfigError> {
        if !(config.total_capacity > 0.0) {
            return Err(ConfigError::InvalidCapacity(config.total_capacity));
        }
        if !(0.0..=1.0).contains(&config.initial_reputation) {
            return Err(ConfigError::InvalidReputation(config.initial_reputation));
        }
        for (&service_type, &cost) in &config.costs {
            if !(0.0..=1.0).contains(&cost) {
                return Err(ConfigError::InvalidCost { service_type, cost });
            }
        }
        let bidding = config.bidding.bind()?;
        let reputation_update = config.reputation_update.bind()?;
        Ok(Self {
            id,
            costs: config.costs,
            bidding,
            reputation: config.initial_reputation,
            reputation_update,
            total_capacity: config.total_capacity,
            available_capacity: config.total_capacity,
            dedicated_capacity: BTreeMap::new(),
            reputation_history: Vec::new(),
            winnings_history: Vec::new(),
            success_window: VecDeque::new(),
        })
    }

    pub fn id(&self) -> BidderId {
        self.id
    }

    /// Current reputation rating (lower is better).
    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub fn total_capacity(&self) -> f64 {
        self.total_capacity
    }

    pub fn available_capacity(&self) -> f64 {
        self.available_capacity
    }

    /// Capacity currently dedicated per live request id.
    pub fn dedicated_capacity(&self) -> &BTreeMap<u64, f64> {
        &self.dedicated_capacity
    }

    /// Known costs per service type (lazily populated).
    pub fn costs(&self) -> &BTreeMap<ServiceType, f64> {
        &self.costs
    }

    /// Rating recorded at each bid submission, oldest first.
    pub fn reputation_history(&self) -> &[f64] {
        &self.reputation_history
    }

    /// Cumulative auction wins, one entry per auction.
    pub fn winnings_history(&self) -> &[u64] {
        &self.winnings_history
    }

    /// Submit a bid for one auction.
    ///
    /// Ensures a cost exists for the service type (generated uniformly in
    /// [0, 1) once and memoized), appends the current rating to the
    /// reputation history, and delegates to the bound bidding strategy.
    pub fn submit_bid(
        &mut self,
        service_type: ServiceType,
        price_weight: f64,
        enemy_reputation: f64,
        rng: &mut RngManager,
    ) -> Bid {
        let cost = *self
            .costs
            .entry(service_type)
            .or_insert_with(|| rng.next_f64());
        self.reputation_history.push(self.reputation);
        self.bidding
            .bid(price_weight, cost, self.reputation, enemy_reputation)
    }

    /// Record the outcome of an auction in the cumulative winnings
    /// counter: increment on a win, carry the count forward on a loss.
    pub fn record_auction(&mut self, won: bool) {
        let last = self.winnings_history.last().copied().unwrap_or(0);
        self.winnings_history.push(last + u64::from(won));
    }

    /// Take on a won request.
    ///
    /// Records a success outcome when the remaining capacity covers the
    /// requirement (anything less degrades the service), dedicates as
    /// much capacity as is actually available, and applies the
    /// reputation-update policy.
    pub fn service_request(
        &mut self,
        request_id: u64,
        service_type: ServiceType,
        required_bitrate: f64,
    ) {
        let success = self.available_capacity >= required_bitrate;
        self.success_window.push_back(success);
        let dedicated = required_bitrate.min(self.available_capacity);
        self.dedicated_capacity.insert(request_id, dedicated);
        self.available_capacity -= dedicated;
        debug!(
            bidder = %self.id,
            request_id,
            service_type = %service_type,
            dedicated,
            available = self.available_capacity,
            "capacity dedicated"
        );
        self.reputation = self
            .reputation_update
            .update(self.reputation, &mut self.success_window);
        debug!(bidder = %self.id, reputation = self.reputation, "reputation updated");
    }

    /// Release the capacity dedicated to a finished request back into the
    /// available pool.
    pub fn finish_servicing_request(&mut self, request_id: u64) -> Result<(), BidderError> {
        let released = self
            .dedicated_capacity
            .remove(&request_id)
            .ok_or(BidderError::UnknownRequest { request_id })?;
        self.available_capacity += released;
        debug!(
            bidder = %self.id,
            request_id,
            released,
            available = self.available_capacity,
            "capacity released"
        );
        Ok(())
    }
}
