//! Domain types: service catalog, bidders, output records

pub mod bidder;
pub mod report;
pub mod service;

pub use bidder::{Bidder, BidderConfig, BidderError, BidderId};
pub use report::{BidderSeries, PriceSeries, SimulationReport};
pub use service::ServiceType;
