//! End-to-end marketplace tests
//!
//! Single-auction winner checks, whole-run determinism, report shape, and
//! the capacity invariant after a realistic run.

use std::collections::BTreeMap;

use marketplace_simulator_core::{
    BidderConfig, BiddingStrategyConfig, Event, EventKind, Marketplace, MarketplaceConfig,
    ReputationStrategyConfig, ServiceType, SimulationEngine, SimulationError,
};

fn bidder_config(initial_reputation: f64) -> BidderConfig {
    BidderConfig {
        total_capacity: 10_000.0,
        costs: BTreeMap::from([(ServiceType::WebBrowsing, 0.5)]),
        bidding: BiddingStrategyConfig::Myopic,
        initial_reputation,
        reputation_update: ReputationStrategyConfig::WindowedFailureRate { window_size: 5 },
    }
}

fn marketplace_config(interarrival_rate: f64) -> MarketplaceConfig {
    MarketplaceConfig {
        interarrival_rate,
        service_duration: 150.0,
        bitrates: BTreeMap::from([(ServiceType::WebBrowsing, 512.0)]),
        price_weight_points: 100,
    }
}

/// Run exactly one externally injected auction: the arrival rate is so low
/// that the marketplace's own arrivals land far beyond the horizon.
fn run_single_auction(price_weight_index: usize, reputations: [f64; 2]) -> Marketplace {
    let mut marketplace = Marketplace::new(
        marketplace_config(1e-9),
        vec![bidder_config(reputations[0]), bidder_config(reputations[1])],
    )
    .unwrap();

    let mut engine = SimulationEngine::new(42);
    engine
        .schedule(Event::new(
            EventKind::ServiceRequest {
                service_type: ServiceType::WebBrowsing,
                price_weight_index,
            },
            1.0,
        ))
        .unwrap();
    engine.stop(2.0).unwrap();
    engine.start(&mut marketplace).unwrap();
    marketplace
}

#[test]
fn test_better_rated_bidder_wins_at_mixed_weights() {
    // Equal costs, ratings 0.25 vs 0.75. With price weights 0.25, 0.5 and
    // 0.75 the compound score of the better-rated bidder stays strictly
    // lower, so it takes every auction.
    for index in [24, 49, 74] {
        let marketplace = run_single_auction(index, [0.25, 0.75]);
        assert_eq!(marketplace.request_count(), 1);
        assert_eq!(marketplace.bidders()[0].winnings_history(), &[1]);
        assert_eq!(marketplace.bidders()[1].winnings_history(), &[0]);
    }
}

#[test]
fn test_winner_dedicates_capacity_until_termination() {
    let marketplace = run_single_auction(49, [0.25, 0.75]);
    let winner = &marketplace.bidders()[0];
    // Termination sits 150 time units out, beyond the 2.0 horizon, so the
    // capacity is still dedicated when the run stops.
    assert_eq!(winner.available_capacity(), 10_000.0 - 512.0);
    assert_eq!(winner.dedicated_capacity()[&1], 512.0);
    assert_eq!(marketplace.bidders()[1].available_capacity(), 10_000.0);
}

#[test]
fn test_identical_seeds_reproduce_the_whole_run() {
    let run = |seed: u64| {
        let mut marketplace = Marketplace::new(
            marketplace_config(1.0),
            vec![bidder_config(0.0), bidder_config(0.0)],
        )
        .unwrap();
        let mut engine = SimulationEngine::new(seed);
        engine.stop(500.0).unwrap();
        engine.start(&mut marketplace).unwrap();
        marketplace.take_report().unwrap()
    };

    let first = run(42);
    let second = run(42);
    assert!(!first.bidders[0].reputation.is_empty());
    assert_eq!(first, second);

    let other_seed = run(43);
    assert_ne!(first, other_seed);
}

#[test]
fn test_report_series_cover_every_request() {
    let mut marketplace = Marketplace::new(
        marketplace_config(1.0),
        vec![bidder_config(0.0), bidder_config(0.0)],
    )
    .unwrap();
    let mut engine = SimulationEngine::new(7);
    engine.stop(300.0).unwrap();
    engine.start(&mut marketplace).unwrap();

    let requests = marketplace.request_count();
    assert!(requests > 0);
    let report = marketplace.report().unwrap();

    assert_eq!(report.bidders.len(), 2);
    for series in &report.bidders {
        assert_eq!(series.reputation.len() as u64, requests);
        assert_eq!(series.winnings.len() as u64, requests);
        // Request indices run 1..=N.
        assert_eq!(series.reputation.first().map(|&(i, _)| i), Some(1));
        assert_eq!(series.reputation.last().map(|&(i, _)| i), Some(requests));
    }

    // Every auction is won by exactly one of the two bidders.
    let total_wins: u64 = report
        .bidders
        .iter()
        .map(|series| series.winnings.last().map(|&(_, w)| w).unwrap_or(0))
        .sum();
    assert_eq!(total_wins, requests);

    // Each recorded price belongs to an auction.
    let priced: usize = report.prices.iter().map(|series| series.prices.len()).sum();
    assert!(priced as u64 <= requests);
}

#[test]
fn test_capacity_invariant_holds_after_a_full_run() {
    let mut marketplace = Marketplace::new(
        marketplace_config(1.0),
        vec![bidder_config(0.0), bidder_config(0.0)],
    )
    .unwrap();
    let mut engine = SimulationEngine::new(99);
    engine.stop(1000.0).unwrap();
    engine.start(&mut marketplace).unwrap();

    for bidder in marketplace.bidders() {
        let dedicated: f64 = bidder.dedicated_capacity().values().sum();
        assert!((bidder.available_capacity() + dedicated - bidder.total_capacity()).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&bidder.reputation()));
    }
}

#[test]
fn test_unmatched_termination_is_an_error() {
    let mut marketplace = Marketplace::new(
        marketplace_config(1e-9),
        vec![bidder_config(0.0), bidder_config(0.0)],
    )
    .unwrap();
    let mut engine = SimulationEngine::new(1);
    engine
        .schedule(Event::new(
            EventKind::ServiceTermination {
                bidder: marketplace.bidders()[0].id(),
                request_id: 999,
            },
            1.0,
        ))
        .unwrap();
    engine.stop(5.0).unwrap();

    assert_eq!(
        engine.start(&mut marketplace).unwrap_err(),
        SimulationError::UnknownRequest { request_id: 999 }
    );
}

#[test]
fn test_rejects_wrong_bidder_count() {
    let err = Marketplace::new(marketplace_config(1.0), vec![bidder_config(0.0)]).unwrap_err();
    assert_eq!(
        err,
        marketplace_simulator_core::ConfigError::BidderCount(1)
    );
}

#[test]
fn test_rejects_degenerate_marketplace_parameters() {
    use marketplace_simulator_core::ConfigError;

    let bidders = || vec![bidder_config(0.0), bidder_config(0.0)];

    let mut config = marketplace_config(0.0);
    assert_eq!(
        Marketplace::new(config.clone(), bidders()).unwrap_err(),
        ConfigError::InvalidInterarrivalRate(0.0)
    );

    config = marketplace_config(1.0);
    config.bitrates.clear();
    assert_eq!(
        Marketplace::new(config.clone(), bidders()).unwrap_err(),
        ConfigError::EmptyServiceCatalog
    );

    config = marketplace_config(1.0);
    config.price_weight_points = 0;
    assert_eq!(
        Marketplace::new(config, bidders()).unwrap_err(),
        ConfigError::EmptyPriceWeightSpace
    );
}
