//! Per-run output records
//!
//! The core's output contract: ordered per-request series, consumed by
//! external analysis tooling (statistics and plotting live outside this
//! crate). Where the records land (CSV, JSON, a database) is the
//! collaborator's concern; only the shape is fixed here.

use serde::Serialize;

use super::bidder::BidderId;
use super::service::ServiceType;

/// Complete output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub bidders: Vec<BidderSeries>,
    pub prices: Vec<PriceSeries>,
}

/// One bidder's per-request series. Request indices start at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidderSeries {
    pub bidder: BidderId,
    /// (request index, reputation rating going into that auction)
    pub reputation: Vec<(u64, f64)>,
    /// (request index, cumulative auction wins after that auction)
    pub winnings: Vec<(u64, u64)>,
}

/// Winning prices observed for one (service type, price weight) pair.
/// Occurrence indices start at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub service_type: ServiceType,
    pub price_weight: f64,
    /// (occurrence index, winning bid price)
    pub prices: Vec<(u64, f64)>,
}
