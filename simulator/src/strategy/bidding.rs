//! Myopic equilibrium bidding
//!
//! Computes the one-shot Nash-equilibrium bid for a two-bidder asymmetric
//! first-price auction in which the buyer ranks offers by the compound
//! score `w * bid + (1 - w) * reputation`. The closed form has no direct
//! inverse, so the bid-to-valuation map is sampled at fixed granularity
//! and the query answered by nearest implied cost.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Number of samples taken from the inverse bid function.
const CURVE_GRANULARITY: usize = 1000;

/// A submitted bid.
///
/// `Unbounded` is the "price is irrelevant, demand unbounded payment"
/// case that arises when the buyer's price weight is exactly zero. It is
/// a distinct variant rather than an infinity-valued float so downstream
/// comparisons cannot silently treat it as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bid {
    Finite(f64),
    Unbounded,
}

impl Bid {
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(bid) => Some(bid),
            Self::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The auction's ranking score: `w * bid + (1 - w) * reputation`,
    /// lower wins. An unbounded bid scores infinitely high whenever price
    /// carries any weight; at `w = 0` the price term vanishes and only
    /// the reputation term remains.
    pub fn compound(self, price_weight: f64, reputation: f64) -> f64 {
        match self {
            Self::Finite(bid) => price_weight * bid + (1.0 - price_weight) * reputation,
            Self::Unbounded if price_weight == 0.0 => reputation,
            Self::Unbounded => f64::INFINITY,
        }
    }
}

/// Declarative bidding configuration, tagged by `method` like the
/// reputation configs. Myopic equilibrium bidding is the only policy the
/// marketplace models; the closed enum keeps "unknown method" a
/// deserialization-time error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BiddingStrategyConfig {
    Myopic,
}

impl BiddingStrategyConfig {
    pub fn bind(&self) -> Result<BiddingStrategy, ConfigError> {
        match self {
            Self::Myopic => Ok(BiddingStrategy::Myopic),
        }
    }
}

/// A bound bidding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiddingStrategy {
    Myopic,
}

impl BiddingStrategy {
    /// Compute the bid for one auction.
    pub fn bid(&self, price_weight: f64, cost: f64, reputation: f64, enemy_reputation: f64) -> Bid {
        match self {
            Self::Myopic => myopic_bid(price_weight, cost, reputation, enemy_reputation),
        }
    }
}

fn myopic_bid(price_weight: f64, cost: f64, reputation: f64, enemy_reputation: f64) -> Bid {
    if price_weight == 0.0 {
        return Bid::Unbounded;
    }
    if price_weight == 1.0 || reputation == enemy_reputation {
        // Symmetric case collapses to the second-price-like closed form.
        return Bid::Finite((1.0 + cost) / 2.0);
    }
    let (bids, implied_costs) =
        sample_bid_curve(price_weight, reputation, enemy_reputation, CURVE_GRANULARITY);
    let valuation = (1.0 - price_weight) * reputation + cost * price_weight;
    let mut nearest = 0;
    let mut nearest_dist = f64::INFINITY;
    for (i, candidate) in implied_costs.iter().enumerate() {
        let dist = (candidate - valuation).abs();
        if dist < nearest_dist {
            nearest_dist = dist;
            nearest = i;
        }
    }
    Bid::Finite((bids[nearest] - (1.0 - price_weight) * reputation) / price_weight)
}

/// Sample the equilibrium bid curve for valuation intervals derived from
/// both bidders' ratings. Returns parallel vectors of bids and the
/// valuations (implied costs) they correspond to.
fn sample_bid_curve(
    w: f64,
    reputation: f64,
    enemy_reputation: f64,
    granularity: usize,
) -> (Vec<f64>, Vec<f64>) {
    // Rounding absorbs float noise in the interval bounds; the branch
    // below compares them for dominance.
    let v1 = [
        round6((1.0 - w) * reputation),
        round6((1.0 - w) * reputation + w),
    ];
    let v2 = [
        round6((1.0 - w) * enemy_reputation),
        round6((1.0 - w) * enemy_reputation + w),
    ];
    if v2[1] >= v1[1] {
        if v1[1] <= 2.0 * v2[0] - v2[1] {
            // Trivial equilibrium: the bid curve is flat at the enemy's
            // valuation floor.
            (vec![v2[0]; granularity], linspace(v1[0], v1[1], granularity))
        } else {
            let b = bid_bounds(v1, v2);
            let c1 = integration_constant(v1, v2, b);
            let bids = linspace(b[0], b[1], granularity);
            let costs = bids.iter().map(|&x| inverse_bid(x, v1, v2, c1)).collect();
            (bids, costs)
        }
    } else if v2[1] <= 2.0 * v1[0] - v1[1] {
        let bids = linspace(v1[0], v1[1], granularity);
        (bids.clone(), bids)
    } else {
        let b = bid_bounds(v1, v2);
        let c1 = integration_constant(v1, v2, b);
        let bids = linspace(b[0], v1[1], granularity);
        let costs = bids
            .iter()
            .map(|&x| if x <= b[1] { inverse_bid(x, v1, v2, c1) } else { x })
            .collect();
        (bids, costs)
    }
}

/// Lower and upper bid bounds of the asymmetric equilibrium.
fn bid_bounds(v1: [f64; 2], v2: [f64; 2]) -> [f64; 2] {
    [
        (4.0 * v1[0] * v2[0] - (v1[1] + v2[1]).powi(2))
            / (4.0 * (v1[0] - v1[1] + v2[0] - v2[1])),
        (v1[1] + v2[1]) / 2.0,
    ]
}

/// Constant of integration for the inverse bid function.
fn integration_constant(v1: [f64; 2], v2: [f64; 2], b: [f64; 2]) -> f64 {
    ((v2[1] - v1[1]).powi(2) + 4.0 * (b[0] - v2[1]) * (v1[0] - v1[1]))
        / (-2.0 * (b[0] - b[1]) * (v1[0] - v1[1]))
        * ((v2[1] - v1[1]) / (2.0 * (b[0] - b[1]))).exp()
}

/// Inverse bid-to-valuation map.
///
/// Near the upper interval boundary the exponential overflows or the
/// pivot hits zero; any non-finite sample clamps to the boundary
/// valuation `v1[1]` instead of propagating the numeric fault.
fn inverse_bid(x: f64, v1: [f64; 2], v2: [f64; 2], c1: f64) -> f64 {
    let pivot = v2[1] + v1[1] - 2.0 * x;
    let value = v1[1]
        + (v2[1] - v1[1]).powi(2)
            / (c1 * pivot * ((v2[1] - v1[1]) / pivot).exp() + 4.0 * (v2[1] - x));
    if value.is_finite() {
        value
    } else {
        v1[1]
    }
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Evenly spaced samples over [start, stop], inclusive of both ends.
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (stop - start) / (count - 1) as f64;
    (0..count).map(|i| start + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let samples = linspace(0.25, 0.75, 5);
        assert_eq!(samples.len(), 5);
        assert!((samples[0] - 0.25).abs() < 1e-12);
        assert!((samples[4] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn inverse_bid_clamps_non_finite_samples() {
        let v1 = [0.25, 0.75];
        let v2 = [0.375, 0.875];
        // Pivot of zero drives the closed form through a division by
        // zero; the sample must clamp to the boundary valuation.
        let x = (v2[1] + v1[1]) / 2.0;
        assert_eq!(inverse_bid(x, v1, v2, 1.0), v1[1]);
    }

    #[test]
    fn curve_is_flat_in_the_trivial_equilibrium() {
        // Enemy interval dominates and sits far enough above ours.
        let w = 0.1;
        let (bids, costs) = sample_bid_curve(w, 0.0, 0.9, 16);
        assert!(bids.iter().all(|&b| (b - bids[0]).abs() < 1e-12));
        assert_eq!(costs.len(), 16);
    }
}
