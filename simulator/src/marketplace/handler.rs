//! Marketplace event handler
//!
//! # Auction
//!
//! For each buyer arrival: both bidders submit exactly one sealed bid,
//! each seeing the other's pre-auction rating; offers are ranked by the
//! compound score `w * bid + (1 - w) * reputation`; the strictly lower
//! score wins and exact ties are broken by one uniform draw over the two
//! bidders. The winner dedicates capacity for the request and a
//! termination event is scheduled one service duration later.
//!
//! # Determinism
//!
//! Arrival generation draws from the run's RNG in a fixed order (price
//! weight, then service type, then inter-arrival delay) and the auction
//! draws only for lazily generated costs and tie-breaks. Reordering these
//! draws changes every replication, so the order is part of the contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{Event, EventHandler, EventKind, SimulationContext, SimulationError};
use crate::errors::ConfigError;
use crate::models::{
    Bidder, BidderConfig, BidderSeries, PriceSeries, ServiceType, SimulationReport,
};

fn default_price_weight_points() -> usize {
    100
}

/// Marketplace-wide scenario parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Mean service-request arrival rate λ (requests per unit time).
    pub interarrival_rate: f64,

    /// Fixed time a won request occupies the winner's capacity.
    pub service_duration: f64,

    /// Modeled service types and their bit-rate requirements.
    pub bitrates: BTreeMap<ServiceType, f64>,

    /// Number of evenly spaced price-weight samples over (0, 1].
    /// Default 100: 0.01, 0.02, ..., 1.00.
    #[serde(default = "default_price_weight_points")]
    pub price_weight_points: usize,
}

impl MarketplaceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.interarrival_rate > 0.0) {
            return Err(ConfigError::InvalidInterarrivalRate(self.interarrival_rate));
        }
        if !(self.service_duration > 0.0) {
            return Err(ConfigError::InvalidServiceDuration(self.service_duration));
        }
        if self.bitrates.is_empty() {
            return Err(ConfigError::EmptyServiceCatalog);
        }
        for (&service_type, &bitrate) in &self.bitrates {
            if !(bitrate > 0.0) {
                return Err(ConfigError::InvalidBitrate {
                    service_type,
                    bitrate,
                });
            }
        }
        if self.price_weight_points == 0 {
            return Err(ConfigError::EmptyPriceWeightSpace);
        }
        Ok(())
    }
}

/// The digital-marketplace event handler: exactly two bidders competing
/// for stochastically arriving service requests.
#[derive(Debug)]
pub struct Marketplace {
    config: MarketplaceConfig,
    /// Catalog keys in a fixed order, for uniform service-type draws.
    service_types: Vec<ServiceType>,
    bidders: Vec<Bidder>,
    request_count: u64,
    /// Winning prices per (service type, price-weight index).
    prices: BTreeMap<(ServiceType, usize), Vec<f64>>,
    report: Option<SimulationReport>,
}

impl Marketplace {
    /// Validate the scenario and construct the handler. Bidders receive
    /// ids 0 and 1 in configuration order.
    pub fn new(
        config: MarketplaceConfig,
        bidder_configs: Vec<BidderConfig>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if bidder_configs.len() != 2 {
            return Err(ConfigError::BidderCount(bidder_configs.len()));
        }
        let bidders = bidder_configs
            .into_iter()
            .enumerate()
            .map(|(i, cfg)| Bidder::new(crate::models::BidderId(i as u32), cfg))
            .collect::<Result<Vec<_>, _>>()?;
        let service_types = config.bitrates.keys().copied().collect();
        Ok(Self {
            config,
            service_types,
            bidders,
            request_count: 0,
            prices: BTreeMap::new(),
            report: None,
        })
    }

    pub fn bidders(&self) -> &[Bidder] {
        &self.bidders
    }

    /// Number of auctions run so far.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// The frozen output records; present once the run has stopped.
    pub fn report(&self) -> Option<&SimulationReport> {
        self.report.as_ref()
    }

    /// Consume the frozen output records.
    pub fn take_report(&mut self) -> Option<SimulationReport> {
        self.report.take()
    }

    /// Price weight for a sample-space index: `points` evenly spaced
    /// values over (0, 1].
    fn price_weight(&self, index: usize) -> f64 {
        (index + 1) as f64 / self.config.price_weight_points as f64
    }

    /// Draw the next buyer and schedule their arrival after an
    /// exponential inter-arrival delay from `base_time`.
    fn schedule_arrival(
        &mut self,
        ctx: &mut SimulationContext,
        base_time: f64,
    ) -> Result<(), SimulationError> {
        let rng = ctx.rng();
        let price_weight_index = rng.index(self.config.price_weight_points);
        let service_type = self.service_types[rng.index(self.service_types.len())];
        let delay = rng.exponential(self.config.interarrival_rate);
        ctx.schedule(Event::new(
            EventKind::ServiceRequest {
                service_type,
                price_weight_index,
            },
            base_time + delay,
        ))
    }

    fn run_auction(
        &mut self,
        ctx: &mut SimulationContext,
        time: f64,
        service_type: ServiceType,
        price_weight_index: usize,
    ) -> Result<(), SimulationError> {
        self.request_count += 1;
        let request_id = self.request_count;
        let price_weight = self.price_weight(price_weight_index);

        // Both bids see the other side's pre-auction rating.
        let ratings = [self.bidders[0].reputation(), self.bidders[1].reputation()];
        let first = self.bidders[0].submit_bid(service_type, price_weight, ratings[1], ctx.rng());
        let second = self.bidders[1].submit_bid(service_type, price_weight, ratings[0], ctx.rng());
        let bids = [first, second];

        let scores = [
            bids[0].compound(price_weight, ratings[0]),
            bids[1].compound(price_weight, ratings[1]),
        ];
        let winner = if scores[0] < scores[1] {
            0
        } else if scores[1] < scores[0] {
            1
        } else {
            ctx.rng().index(2)
        };
        debug!(
            request_id,
            service_type = %service_type,
            price_weight,
            winner,
            "auction resolved"
        );

        if let Some(price) = bids[winner].finite() {
            self.prices
                .entry((service_type, price_weight_index))
                .or_default()
                .push(price);
        }
        for (i, bidder) in self.bidders.iter_mut().enumerate() {
            bidder.record_auction(i == winner);
        }

        let bitrate = self.config.bitrates[&service_type];
        self.bidders[winner].service_request(request_id, service_type, bitrate);

        ctx.schedule(Event::new(
            EventKind::ServiceTermination {
                bidder: self.bidders[winner].id(),
                request_id,
            },
            time + self.config.service_duration,
        ))
    }

    fn build_report(&self) -> SimulationReport {
        let bidders = self
            .bidders
            .iter()
            .map(|bidder| BidderSeries {
                bidder: bidder.id(),
                reputation: (1u64..)
                    .zip(bidder.reputation_history().iter().copied())
                    .collect(),
                winnings: (1u64..)
                    .zip(bidder.winnings_history().iter().copied())
                    .collect(),
            })
            .collect();
        let prices = self
            .prices
            .iter()
            .map(|(&(service_type, index), series)| PriceSeries {
                service_type,
                price_weight: self.price_weight(index),
                prices: (1u64..).zip(series.iter().copied()).collect(),
            })
            .collect();
        SimulationReport { bidders, prices }
    }
}

impl EventHandler for Marketplace {
    fn on_start(&mut self, ctx: &mut SimulationContext) -> Result<(), SimulationError> {
        let now = ctx.clock();
        self.schedule_arrival(ctx, now)
    }

    fn on_event(
        &mut self,
        ctx: &mut SimulationContext,
        event: &Event,
    ) -> Result<(), SimulationError> {
        match event.kind() {
            EventKind::ServiceRequest {
                service_type,
                price_weight_index,
            } => {
                self.run_auction(ctx, event.time(), service_type, price_weight_index)?;
                self.schedule_arrival(ctx, event.time())
            }
            EventKind::ServiceTermination { bidder, request_id } => {
                let bidder_state = self
                    .bidders
                    .iter_mut()
                    .find(|candidate| candidate.id() == bidder)
                    .ok_or(SimulationError::UnknownRequest { request_id })?;
                bidder_state.finish_servicing_request(request_id)?;
                Ok(())
            }
            // The engine terminates on Stop before dispatching it here.
            EventKind::Stop => Ok(()),
        }
    }

    fn on_stop(&mut self, _ctx: &mut SimulationContext) -> Result<(), SimulationError> {
        self.report = Some(self.build_report());
        info!(requests = self.request_count, "marketplace run complete");
        Ok(())
    }
}
