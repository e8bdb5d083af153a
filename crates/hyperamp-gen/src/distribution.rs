use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::{DistributionProfile, RngHandle};
use rand_distr::{Distribution as _, Normal};
use serde::{Deserialize, Serialize};

/// Lower bound below which a Gaussian draw is reflected around the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Floor {
    /// Reflect draws `<= bound`.
    AtOrBelow(f64),
    /// Reflect draws `< bound`.
    Below(f64),
}

impl Floor {
    fn violated_by(&self, sample: f64) -> bool {
        match *self {
            Floor::AtOrBelow(bound) => sample <= bound,
            Floor::Below(bound) => sample < bound,
        }
    }
}

/// Hypertype edge counts must be positive.
pub const HYPERTYPE_FLOOR: Floor = Floor::AtOrBelow(0.0);
/// Hyperedge sizes are reflected below 0.95.
pub const EDGE_SIZE_FLOOR: Floor = Floor::Below(0.95);
/// Vertex occurrence budgets are reflected below one occurrence.
pub const OCCURRENCE_FLOOR: Floor = Floor::Below(1.0);

/// Reflection clamp: a sample violating `floor` is replaced by
/// `2 * mean - sample`; anything else passes through unchanged.
///
/// This is a single reflection, not a resampling loop.
pub fn reflect(sample: f64, mean: f64, floor: Floor) -> f64 {
    if floor.violated_by(sample) {
        2.0 * mean - sample
    } else {
        sample
    }
}

/// Configured `(mean, std_dev)` of one generated quantity.
///
/// Uncalibrated distributions draw with the mean as the Gaussian standard
/// deviation as well; `calibrated` switches to the measured `std_dev`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Central value.
    pub mean: f64,
    /// Measured dispersion, used only once calibrated.
    pub std_dev: f64,
    /// Whether `std_dev` came from a profiling report.
    #[serde(default)]
    pub calibrated: bool,
}

impl DistributionSpec {
    /// Uncalibrated spec with the given defaults.
    pub const fn uncalibrated(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            calibrated: false,
        }
    }

    /// Spec taking both values from a measured profile.
    pub fn calibrated(profile: DistributionProfile) -> Self {
        Self {
            mean: profile.mean,
            std_dev: profile.std_dev,
            calibrated: true,
        }
    }

    /// Standard deviation handed to the Gaussian sampler.
    pub fn sigma(&self) -> f64 {
        if self.calibrated {
            self.std_dev
        } else {
            self.mean
        }
    }
}

/// Gaussian sampler with reflection at a floor.
#[derive(Debug, Clone)]
pub struct ReflectedNormal {
    mean: f64,
    floor: Floor,
    normal: Normal<f64>,
}

impl ReflectedNormal {
    /// Builds the sampler; `name` labels configuration errors.
    pub fn new(name: &str, spec: &DistributionSpec, floor: Floor) -> Result<Self, HyperampError> {
        let sigma = spec.sigma();
        let normal = Normal::new(spec.mean, sigma).map_err(|err| {
            HyperampError::Config(
                ErrorInfo::new("bad-distribution", err.to_string())
                    .with_context("distribution", name)
                    .with_context("mean", spec.mean.to_string())
                    .with_context("sigma", sigma.to_string()),
            )
        })?;
        Ok(Self {
            mean: spec.mean,
            floor,
            normal,
        })
    }

    /// Draws one reflected sample.
    pub fn sample(&self, rng: &mut RngHandle) -> f64 {
        reflect(self.normal.sample(rng), self.mean, self.floor)
    }

    /// Draws a sample truncated toward zero; negative results saturate at 0.
    pub fn sample_count(&self, rng: &mut RngHandle) -> u64 {
        self.sample(rng) as u64
    }
}
