//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Debugging (reproduce exact simulation)
//! - Testing (verify behavior)
//! - Research (replicated runs differ only in their seeds)

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use marketplace_simulator_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let cost = rng.next_f64(); // [0.0, 1.0)
/// let delay = rng.exponential(1.0); // mean 1.0
/// let pick = rng.index(2); // 0 or 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is remapped to 1 (xorshift requirement).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Get current RNG state (for diagnostics and replay)
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) using the top 53 bits
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Generate random f64 uniformly in range [low, high)
    ///
    /// # Panics
    /// Panics if `low >= high`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        assert!(low < high, "low must be less than high");
        low + (high - low) * self.next_f64()
    }

    /// Sample an exponentially distributed delay with the given rate
    ///
    /// Inverse-CDF sampling: `-ln(u) / rate`, with `u` floored away from
    /// zero so the logarithm stays finite. The mean of the returned delays
    /// is `1 / rate`.
    ///
    /// # Panics
    /// Panics if `rate` is not positive.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        assert!(rate > 0.0, "rate must be positive");
        let u = self.next_f64().max(1e-10);
        -u.ln() / rate
    }

    /// Pick a uniform random index in `[0, len)`
    ///
    /// Used for discrete choices (service type, price weight) and for
    /// unbiased auction tie-breaks.
    ///
    /// # Panics
    /// Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "len must be positive");
        (self.next() % len as u64) as usize
    }
}
