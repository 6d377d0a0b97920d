//! Synthetic lagged sine-wave series.
//!
//! # Model
//!
//! ```text
//! x_i = linspace(min_x, max_x, n_points)
//! y_i = sin(x_i + lag + U_i · input_noise) + V_i · output_noise
//! ```
//!
//! with `U_i, V_i ~ Uniform[0, 1)` drawn independently per point. The
//! phase lag makes the zero-shift correlation of `x` and `y` weak while a
//! shifted copy of `y` lines up with `x`.

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::SeriesFrame;

/// Parameters of the noisy lagged sine wave.
#[derive(Debug, Clone, PartialEq)]
pub struct SineWaveConfig {
    /// Number of samples.
    pub n_points: usize,
    /// First `x` value.
    pub min_x: f64,
    /// Last `x` value (inclusive).
    pub max_x: f64,
    /// Phase offset added inside the sine.
    pub lag: f64,
    /// Scale of the uniform jitter added to the phase.
    pub input_noise: f64,
    /// Scale of the uniform jitter added to the output.
    pub output_noise: f64,
}

impl Default for SineWaveConfig {
    fn default() -> Self {
        Self {
            n_points: 100,
            min_x: 0.0,
            max_x: 20.0,
            lag: 10.0,
            input_noise: 0.2,
            output_noise: 0.4,
        }
    }
}

impl SineWaveConfig {
    /// Checks that the configuration describes a usable series.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for zero points, non-finite bounds or lag,
    /// `max_x < min_x`, or negative noise scales.
    pub fn validate(&self) -> Result<()> {
        if self.n_points == 0 {
            return Err(Error::InvalidConfig("n_points must be positive".into()));
        }
        if !self.min_x.is_finite() || !self.max_x.is_finite() || !self.lag.is_finite() {
            return Err(Error::InvalidConfig("min_x, max_x and lag must be finite".into()));
        }
        if self.max_x < self.min_x {
            return Err(Error::InvalidConfig(format!(
                "max_x ({}) is below min_x ({})",
                self.max_x, self.min_x
            )));
        }
        if [self.input_noise, self.output_noise].iter().any(|v| v.is_nan() || *v < 0.0) {
            return Err(Error::InvalidConfig("noise scales must be non-negative".into()));
        }
        Ok(())
    }
}

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
///
/// A single point yields `[start]`; zero points yield an empty vector.
///
/// # Examples
///
/// ```
/// use u_statlab::signal::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Generates the two-column (`x`, `y`) series described by `config`.
///
/// # Errors
///
/// Propagates [`SineWaveConfig::validate`] failures.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_statlab::signal::{noisy_lagged_sine, SineWaveConfig};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let frame = noisy_lagged_sine(&SineWaveConfig::default(), &mut rng).unwrap();
/// assert_eq!(frame.len(), 100);
/// ```
pub fn noisy_lagged_sine<R: Rng + ?Sized>(config: &SineWaveConfig, rng: &mut R) -> Result<SeriesFrame> {
    config.validate()?;

    let x = linspace(config.min_x, config.max_x, config.n_points);
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| {
            let phase = xi + rng.gen::<f64>() * config.input_noise + config.lag;
            phase.sin() + rng.gen::<f64>() * config.output_noise
        })
        .collect();

    debug!(n_points = config.n_points, lag = config.lag, "generated lagged sine series");

    SeriesFrame::new(vec![("x".to_string(), x), ("y".to_string(), y)])
}
