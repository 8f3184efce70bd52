//! Digital-marketplace auction orchestration
//!
//! The [`Marketplace`] is the concrete event handler: it generates buyer
//! arrivals, runs the sealed-bid auction for each service request,
//! schedules service terminations, and aggregates the per-run output
//! records.

mod handler;

pub use handler::{Marketplace, MarketplaceConfig};
