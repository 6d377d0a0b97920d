//! Demo configuration.
//!
//! Defaults reproduce the fixed constants of both demonstrations; the
//! binaries override individual fields from the command line.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::correlation::CorrelationMethod;
use crate::error::{Error, Result};
use crate::signal::SineWaveConfig;

/// Settings for the correlation check.
#[derive(Debug, Clone)]
pub struct CorrelationDemoConfig {
    /// Series generator parameters.
    pub signal: SineWaveConfig,
    /// Method used for the time-lagged sweep.
    pub sweep_method: CorrelationMethod,
    /// Print the PACF of `y` up to this lag when set.
    pub pacf_lags: Option<usize>,
    /// Seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    /// Plot destination.
    pub output: PathBuf,
    /// Plot size in pixels.
    pub size: (u32, u32),
}

impl Default for CorrelationDemoConfig {
    fn default() -> Self {
        Self {
            signal: SineWaveConfig::default(),
            sweep_method: CorrelationMethod::Kendall,
            pacf_lags: None,
            seed: None,
            output: PathBuf::from("correlation_check.png"),
            size: (1200, 800),
        }
    }
}

impl CorrelationDemoConfig {
    /// Validates the series parameters and plot size.
    pub fn validate(&self) -> Result<()> {
        self.signal.validate()?;
        if self.pacf_lags == Some(0) {
            return Err(Error::InvalidConfig("pacf lags must be positive".into()));
        }
        validate_size(self.size)
    }

    /// Random generator honouring [`Self::seed`].
    pub fn rng(&self) -> StdRng {
        make_rng(self.seed)
    }
}

/// Settings for the manufacturing distribution grid.
#[derive(Debug, Clone)]
pub struct DistributionDemoConfig {
    /// Values drawn per distribution.
    pub sample_size: usize,
    /// Histogram bins per panel.
    pub bins: usize,
    /// Seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    /// Plot destination.
    pub output: PathBuf,
    /// Plot size in pixels.
    pub size: (u32, u32),
}

impl Default for DistributionDemoConfig {
    fn default() -> Self {
        Self {
            sample_size: 10_000,
            bins: 50,
            seed: None,
            output: PathBuf::from("manufacturing_distributions.png"),
            size: (2000, 1400),
        }
    }
}

impl DistributionDemoConfig {
    /// Validates sample size, bin count and plot size.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "sample size must be at least 2, got {}",
                self.sample_size
            )));
        }
        if self.bins == 0 {
            return Err(Error::InvalidConfig("bins must be positive".into()));
        }
        validate_size(self.size)
    }

    /// Random generator honouring [`Self::seed`].
    pub fn rng(&self) -> StdRng {
        make_rng(self.seed)
    }
}

/// Seeded generator when `seed` is set, otherwise one seeded from OS entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn validate_size((width, height): (u32, u32)) -> Result<()> {
    if width < 100 || height < 100 {
        return Err(Error::InvalidConfig(format!(
            "plot size {width}x{height} is too small (minimum 100x100)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn defaults_match_demo_constants() {
        let c = CorrelationDemoConfig::default();
        assert_eq!(c.signal.n_points, 100);
        assert_eq!(c.signal.min_x, 0.0);
        assert_eq!(c.signal.max_x, 20.0);
        assert_eq!(c.signal.lag, 10.0);
        assert_eq!(c.signal.input_noise, 0.2);
        assert_eq!(c.signal.output_noise, 0.4);
        assert_eq!(c.sweep_method, CorrelationMethod::Kendall);
        assert!(c.validate().is_ok());

        let d = DistributionDemoConfig::default();
        assert_eq!(d.sample_size, 10_000);
        assert_eq!(d.bins, 50);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: Vec<u64> = make_rng(Some(9)).sample_iter(rand::distributions::Standard).take(4).collect();
        let b: Vec<u64> = make_rng(Some(9)).sample_iter(rand::distributions::Standard).take(4).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_settings_rejected() {
        let c = CorrelationDemoConfig {
            pacf_lags: Some(0),
            ..CorrelationDemoConfig::default()
        };
        assert!(c.validate().is_err());

        let d = DistributionDemoConfig {
            bins: 0,
            ..DistributionDemoConfig::default()
        };
        assert!(d.validate().is_err());

        let d = DistributionDemoConfig {
            size: (50, 1400),
            ..DistributionDemoConfig::default()
        };
        assert!(d.validate().is_err());
    }
}
