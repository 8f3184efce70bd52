//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. CRITICAL: every stochastic draw in a simulation run
//! (inter-arrival delays, buyer characteristics, lazily generated service
//! costs, auction tie-breaks) MUST go through this module, and the draw
//! order is part of the reproducibility contract.

mod xorshift;

pub use xorshift::RngManager;
