//! Pipeline configuration.
//!
//! Every knob that influences sampling lives here so a run is fully
//! described by one config plus its input files. Ratio vectors are validated
//! at load time and never silently normalized.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const RATIO_TOLERANCE: f64 = 1e-9;

/// Train/dev/test split ratios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub dev: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            dev: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    /// Fatal if the ratios do not sum to 1.
    pub fn validate(&self) -> Result<()> {
        let sum = self.train + self.dev + self.test;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(Error::config(format!(
                "split ratios sum to {sum}, expected 1.0"
            )));
        }
        if self.train <= 0.0 || self.dev < 0.0 || self.test < 0.0 {
            return Err(Error::config("split ratios must be non-negative"));
        }
        Ok(())
    }
}

/// Per-sentence case-randomization probabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CaseProbabilities {
    pub upper: f64,
    pub lower: f64,
    pub unchanged: f64,
}

impl Default for CaseProbabilities {
    fn default() -> Self {
        Self {
            upper: 0.15,
            lower: 0.15,
            unchanged: 0.70,
        }
    }
}

impl CaseProbabilities {
    pub fn validate(&self) -> Result<()> {
        let sum = self.upper + self.lower + self.unchanged;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(Error::config(format!(
                "case probabilities sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Name-frequency band thresholds and the common/rare sampling split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NameBandConfig {
    /// Names with frequency >= this count are "common".
    pub high_threshold: u32,
    /// Names with `low_threshold < frequency < high_threshold` are "rare";
    /// anything at or below is dropped as near-unique noise.
    pub low_threshold: u32,
    /// Fraction of each sample drawn from the common band.
    pub common_fraction: f64,
}

impl Default for NameBandConfig {
    fn default() -> Self {
        Self {
            high_threshold: 1000,
            low_threshold: 50,
            common_fraction: 0.75,
        }
    }
}

impl NameBandConfig {
    pub fn validate(&self) -> Result<()> {
        if self.low_threshold >= self.high_threshold {
            return Err(Error::config(
                "name band low_threshold must be below high_threshold",
            ));
        }
        if !(0.0..=1.0).contains(&self.common_fraction) {
            return Err(Error::config("common_fraction must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Calendar-date generation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// Years >= cutoff are favored during sampling.
    pub cutoff_year: i32,
    /// Weight for recent dates relative to `older_weight`.
    pub recent_weight: f64,
    pub older_weight: f64,
    /// Number of calendar dates to sample (each rendered in two formats).
    pub sample_size: usize,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            start_year: 1970,
            end_year: 2023,
            cutoff_year: 2000,
            recent_weight: 1.0,
            older_weight: 0.25,
            sample_size: 300,
        }
    }
}

impl DateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(Error::config("date start_year is after end_year"));
        }
        if self.recent_weight <= 0.0 || self.older_weight <= 0.0 {
            return Err(Error::config("date sampling weights must be positive"));
        }
        Ok(())
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for the single run-wide random generator.
    pub seed: u64,
    pub split: SplitRatios,
    pub case: CaseProbabilities,
    /// Categorical distribution over example group sizes 1..=4.
    pub group_sizes: [f64; 4],
    pub names: NameBandConfig,
    /// Target draw count for each of the seven person patterns.
    pub person_pattern_counts: [usize; 7],
    pub dates: DateConfig,
    /// Bootstrap iterations and per-iteration resample size.
    pub bootstrap_iterations: usize,
    pub bootstrap_sample_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 1209,
            split: SplitRatios::default(),
            case: CaseProbabilities::default(),
            group_sizes: [0.50, 0.30, 0.15, 0.05],
            names: NameBandConfig::default(),
            person_pattern_counts: [60, 40, 80, 10, 10, 20, 30],
            dates: DateConfig::default(),
            bootstrap_iterations: 100,
            bootstrap_sample_size: 250,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::input_missing(p));
                }
                let raw = std::fs::read_to_string(p)?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every ratio/probability invariant up front.
    pub fn validate(&self) -> Result<()> {
        self.split.validate()?;
        self.case.validate()?;
        self.names.validate()?;
        self.dates.validate()?;
        let sum: f64 = self.group_sizes.iter().sum();
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(Error::config(format!(
                "group size distribution sums to {sum}, expected 1.0"
            )));
        }
        if self.bootstrap_iterations == 0 || self.bootstrap_sample_size == 0 {
            return Err(Error::config("bootstrap parameters must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn bad_split_ratios_rejected() {
        let ratios = SplitRatios {
            train: 0.8,
            dev: 0.1,
            test: 0.2,
        };
        assert!(ratios.validate().is_err());
    }

    #[test]
    fn bad_group_sizes_rejected() {
        let config = PipelineConfig {
            group_sizes: [0.5, 0.3, 0.15, 0.15],
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_is_fatal() {
        let err = PipelineConfig::load(Some(Path::new("/nonexistent/config.json"))).unwrap_err();
        assert!(matches!(err, Error::InputMissing(_)));
    }
}
