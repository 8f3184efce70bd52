//! Single-run marketplace simulation driver
//!
//! Builds a scenario (the built-in default or one loaded from a JSON
//! file), runs one simulation to the requested horizon, and writes the
//! per-run output records under `<save_dir>/<id>/`: one reputation and
//! one winnings CSV per bidder, one price CSV per (service type, price
//! weight) pair, and the complete report as JSON.
//!
//! Batch orchestration across replications, statistics, and plotting
//! live outside this binary; replications are independent processes with
//! independent seeds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketplace_simulator_core::{
    BidderConfig, BiddingStrategyConfig, Marketplace, MarketplaceConfig,
    ReputationStrategyConfig, ServiceType, SimulationEngine, SimulationReport,
};

#[derive(Debug, Parser)]
#[command(name = "marketplace-sim", about = "Digital marketplace simulation, single run")]
struct Args {
    /// Simulation horizon in simulated seconds.
    horizon: f64,

    /// Simulation run id; names the output subdirectory.
    #[arg(long, default_value_t = 0)]
    id: u64,

    /// Seed for the run's random generator (default: current timestamp).
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory.
    #[arg(long, default_value = "out")]
    save_dir: PathBuf,

    /// Scenario JSON file overriding the built-in default scenario.
    #[arg(long)]
    scenario: Option<PathBuf>,
}

/// A complete simulation scenario: the marketplace parameters plus the
/// two competing bidders.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Scenario {
    marketplace: MarketplaceConfig,
    bidders: Vec<BidderConfig>,
}

/// Two identical operators, web browsing only, known cost 0.5, sliding
/// reputation window of 5.
fn default_scenario() -> Scenario {
    let bidder = BidderConfig {
        total_capacity: 10_000.0,
        costs: BTreeMap::from([(ServiceType::WebBrowsing, 0.5)]),
        bidding: BiddingStrategyConfig::Myopic,
        initial_reputation: 0.0,
        reputation_update: ReputationStrategyConfig::WindowedFailureRate { window_size: 5 },
    };
    Scenario {
        marketplace: MarketplaceConfig {
            interarrival_rate: 1.0,
            service_duration: 150.0,
            bitrates: BTreeMap::from([(
                ServiceType::WebBrowsing,
                ServiceType::WebBrowsing.default_bitrate(),
            )]),
            price_weight_points: 100,
        },
        bidders: vec![bidder.clone(), bidder],
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(1)
    });
    info!(seed, horizon = args.horizon, id = args.id, "simulation starting");

    let scenario = match &args.scenario {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading scenario file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing scenario file {}", path.display()))?
        }
        None => default_scenario(),
    };

    let mut marketplace = Marketplace::new(scenario.marketplace, scenario.bidders)?;
    let mut engine = SimulationEngine::new(seed);
    engine.stop(args.horizon)?;
    engine.start(&mut marketplace)?;

    let report = marketplace
        .take_report()
        .context("simulation finished without producing a report")?;
    let run_dir = args.save_dir.join(args.id.to_string());
    write_outputs(&run_dir, &report)?;
    info!(dir = %run_dir.display(), "results written");
    Ok(())
}

fn write_outputs(dir: &Path, report: &SimulationReport) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for series in &report.bidders {
        let mut reputation = String::from("sr_number,reputation\n");
        for (index, rating) in &series.reputation {
            reputation.push_str(&format!("{},{}\n", index, rating));
        }
        fs::write(dir.join(format!("reputation_{}.csv", series.bidder)), reputation)?;

        let mut winnings = String::from("sr_number,winnings\n");
        for (index, wins) in &series.winnings {
            winnings.push_str(&format!("{},{}\n", index, wins));
        }
        fs::write(dir.join(format!("winnings_{}.csv", series.bidder)), winnings)?;
    }

    let prices_dir = dir.join("prices");
    fs::create_dir_all(&prices_dir)?;
    for series in &report.prices {
        let mut prices = String::from("sr_number,price\n");
        for (index, price) in &series.prices {
            prices.push_str(&format!("{},{}\n", index, price));
        }
        fs::write(
            prices_dir.join(format!(
                "price_{}_{}.csv",
                series.service_type, series.price_weight
            )),
            prices,
        )?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(dir.join("report.json"), json)?;
    Ok(())
}
