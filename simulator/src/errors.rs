//! Configuration-time error taxonomy
//!
//! Every variant here is raised synchronously at strategy-binding or
//! construction time, before any event is scheduled; a run never starts
//! with an invalid configuration. Unknown strategy `method` names never
//! reach this type at all: the strategy configs are closed serde-tagged
//! enums, so an unrecognized method fails at deserialization.

use thiserror::Error;

use crate::models::ServiceType;

/// Errors produced while validating scenario configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("reputation window size must be at least 1")]
    InvalidWindowSize,

    #[error("commitment must lie strictly between 0 and 1, got {0}")]
    InvalidCommitment(f64),

    #[error("initial reputation must lie within [0, 1], got {0}")]
    InvalidReputation(f64),

    #[error("total capacity must be positive, got {0}")]
    InvalidCapacity(f64),

    #[error("cost for {service_type} must lie within [0, 1], got {cost}")]
    InvalidCost { service_type: ServiceType, cost: f64 },

    #[error("mean interarrival rate must be positive, got {0}")]
    InvalidInterarrivalRate(f64),

    #[error("service duration must be positive, got {0}")]
    InvalidServiceDuration(f64),

    #[error("the service catalog must contain at least one service type")]
    EmptyServiceCatalog,

    #[error("bit-rate for {service_type} must be positive, got {bitrate}")]
    InvalidBitrate {
        service_type: ServiceType,
        bitrate: f64,
    },

    #[error("the price-weight sample space needs at least one point")]
    EmptyPriceWeightSpace,

    #[error("a marketplace auction needs exactly two bidders, got {0}")]
    BidderCount(usize),
}
