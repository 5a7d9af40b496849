use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{clamp_percent, LocationMetric};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    pub star: f64,
    pub cloud: f64,
    pub light: f64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            star: 6.0,
            cloud: 8.0,
            light: 6.0,
        }
    }
}

pub const MAX_JITTER: f64 = 100.0;

impl JitterConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, window) in [("star", self.star), ("cloud", self.cloud), ("light", self.light)] {
            if !window.is_finite() || !(0.0..=MAX_JITTER).contains(&window) {
                return Err(format!(
                    "invalid {} jitter window: {} (expected 0..={})",
                    name, window, MAX_JITTER
                ));
            }
        }
        Ok(())
    }
}

/// Nudges `value` by a uniform delta in `[-max_jitter, max_jitter)`, then
/// rounds and clamps into 0..=100. Windows wider than 100 are capped.
pub fn jitter<R: Rng + ?Sized>(value: u8, max_jitter: f64, rng: &mut R) -> u8 {
    if !(max_jitter > 0.0) {
        return value.min(100);
    }
    let max_jitter = max_jitter.min(MAX_JITTER);
    let delta = rng.gen_range(-max_jitter..max_jitter);
    clamp_percent(value as f64 + delta)
}

pub struct SimulatedFeed {
    config: JitterConfig,
    rng: StdRng,
}

impl SimulatedFeed {
    pub fn new(config: JitterConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(config: JitterConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &JitterConfig {
        &self.config
    }

    pub fn tick(&mut self, locations: &[LocationMetric], now: DateTime<Utc>) -> Vec<LocationMetric> {
        locations
            .iter()
            .map(|location| {
                let mut next = location.clone();
                next.star_score = jitter(location.star_score, self.config.star, &mut self.rng);
                next.cloud_cover = jitter(location.cloud_cover, self.config.cloud, &mut self.rng);
                next.light_pollution =
                    jitter(location.light_pollution, self.config.light, &mut self.rng);
                next.last_updated = location.last_updated.max(now);
                next
            })
            .collect()
    }
}
