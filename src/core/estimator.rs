// estimator.rs - Distance estimators for spaced-word match counts

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Distance reported when two word lists share nothing (or the correction
/// saturates).
pub const MAX_DISTANCE: f64 = 10.0;

/// Substitution proportion reported alongside [`MAX_DISTANCE`]
const MAX_MISMATCH_RATE: f64 = 1.0;

/// The value pair computed for every matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub distance: f64,
    /// Secondary value, see the estimator's description
    pub auxiliary: f64,
}

impl Estimate {
    pub const IDENTICAL: Estimate = Estimate {
        distance: 0.0,
        auxiliary: 0.0,
    };

    pub const UNRELATED: Estimate = Estimate {
        distance: MAX_DISTANCE,
        auxiliary: MAX_MISMATCH_RATE,
    };
}

/// Converts a spaced-word match count into a distance.
///
/// Implementations must never return NaN or infinity, and must not increase
/// the distance when `matches` grows.
pub trait DistanceEstimator: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// `len_a` and `len_b` are the word list lengths, `weight` the number of
    /// bases per word.
    fn estimate(&self, matches: usize, len_a: usize, len_b: usize, weight: usize) -> Estimate;
}

/// Per-position substitution proportion implied by `matches` out of the
/// shorter list length. `None` when no words are shared.
///
/// A spaced-word match requires all `weight` sampled positions to agree, so
/// the per-position identity is the `weight`-th root of the match fraction.
pub fn mismatch_rate(matches: usize, len_a: usize, len_b: usize, weight: usize) -> Option<f64> {
    let shorter = len_a.min(len_b);
    if matches == 0 || shorter == 0 || weight == 0 {
        return None;
    }
    if matches >= shorter {
        return Some(0.0);
    }

    let fraction = matches as f64 / shorter as f64;
    let identity = fraction.powf(1.0 / weight as f64);
    Some((1.0 - identity).clamp(0.0, 1.0))
}

/// Jukes-Cantor correction of a substitution proportion. `None` once the
/// proportion reaches the 3/4 saturation point.
pub fn jukes_cantor(mismatch: f64) -> Option<f64> {
    if mismatch <= 0.0 {
        return Some(0.0);
    }

    let argument = 1.0 - 4.0 * mismatch / 3.0;
    if argument <= 0.0 {
        return None;
    }

    let distance = -0.75 * argument.ln();
    if distance.is_finite() {
        Some(distance.min(MAX_DISTANCE))
    } else {
        None
    }
}

/// Jukes-Cantor corrected distance; auxiliary value is the uncorrected
/// substitution proportion.
#[derive(Debug, Clone, Copy, Default)]
pub struct JukesCantor;

impl DistanceEstimator for JukesCantor {
    fn name(&self) -> &'static str {
        "jukes-cantor"
    }

    fn description(&self) -> &'static str {
        "Jukes-Cantor corrected substitutions per site (auxiliary: uncorrected mismatch rate)"
    }

    fn estimate(&self, matches: usize, len_a: usize, len_b: usize, weight: usize) -> Estimate {
        let Some(mismatch) = mismatch_rate(matches, len_a, len_b, weight) else {
            return Estimate::UNRELATED;
        };

        match jukes_cantor(mismatch) {
            Some(distance) => Estimate {
                distance,
                auxiliary: mismatch,
            },
            None => Estimate {
                distance: MAX_DISTANCE,
                auxiliary: mismatch,
            },
        }
    }
}

/// Uncorrected substitution proportion; auxiliary value is the Jukes-Cantor
/// distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PDistance;

impl DistanceEstimator for PDistance {
    fn name(&self) -> &'static str {
        "p-distance"
    }

    fn description(&self) -> &'static str {
        "Uncorrected mismatch rate per site (auxiliary: Jukes-Cantor distance)"
    }

    fn estimate(&self, matches: usize, len_a: usize, len_b: usize, weight: usize) -> Estimate {
        let Some(mismatch) = mismatch_rate(matches, len_a, len_b, weight) else {
            return Estimate::UNRELATED;
        };

        Estimate {
            distance: mismatch,
            auxiliary: jukes_cantor(mismatch).unwrap_or(MAX_DISTANCE),
        }
    }
}

/// Name-keyed collection of the available estimators
pub struct EstimatorRegistry {
    estimators: HashMap<String, Arc<dyn DistanceEstimator>>,
}

impl EstimatorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            estimators: HashMap::new(),
        };

        registry.register_estimator(Arc::new(JukesCantor));
        registry.register_estimator(Arc::new(PDistance));

        registry
    }

    /// Register an estimator under its own name
    pub fn register_estimator(&mut self, estimator: Arc<dyn DistanceEstimator>) {
        self.estimators.insert(estimator.name().to_string(), estimator);
    }

    pub fn get_estimator(&self, name: &str) -> Option<Arc<dyn DistanceEstimator>> {
        self.estimators.get(name).cloned()
    }

    pub fn has_estimator(&self, name: &str) -> bool {
        self.estimators.contains_key(name)
    }

    /// (name, description) pairs sorted by name
    pub fn list_estimators(&self) -> Vec<(&str, &str)> {
        let mut list: Vec<_> = self
            .estimators
            .values()
            .map(|e| (e.name(), e.description()))
            .collect();
        list.sort_unstable();
        list
    }

    pub fn get_estimator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.estimators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
