//! Modeled service types
//!
//! Buyers request one of a small catalog of services; each service type
//! carries a bit-rate requirement the winning operator must dedicate for
//! the duration of the request. The catalog actually modeled in a run
//! (and the bit-rates used) comes from [`MarketplaceConfig`], which
//! defaults to these figures.
//!
//! [`MarketplaceConfig`]: crate::MarketplaceConfig

use std::fmt;

use serde::{Deserialize, Serialize};

/// Service type requested by a buyer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    WebBrowsing,
    Email,
}

impl ServiceType {
    /// Default bit-rate requirement for this service type.
    pub fn default_bitrate(self) -> f64 {
        match self {
            ServiceType::WebBrowsing => 512.0,
            ServiceType::Email => 256.0,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::WebBrowsing => write!(f, "web_browsing"),
            ServiceType::Email => write!(f, "email"),
        }
    }
}
