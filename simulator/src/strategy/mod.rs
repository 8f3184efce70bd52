//! Bidding and reputation-update strategies
//!
//! Strategies are declared in scenario configuration as tagged variants
//! (`method` + its parameters) and bound once, at construction time, into
//! validated strategy values. Binding checks every declared parameter;
//! nothing is validated again per call.

mod bidding;
mod reputation;

pub use bidding::{Bid, BiddingStrategy, BiddingStrategyConfig};
pub use reputation::{ReputationStrategy, ReputationStrategyConfig};
