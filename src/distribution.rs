//! Synthetic distributions for manufacturing statistics.
//!
//! A fixed catalog of nine generators, each with a display name, a
//! description of its parameters, and a note on where the shape shows up
//! on a shop floor. Samples are binned into density-normalised histograms
//! for display.
//!
//! # Examples
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use u_statlab::distribution::{histogram_bins, manufacturing_catalog};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let catalog = manufacturing_catalog(1_000, &mut rng).unwrap();
//! assert_eq!(catalog.len(), 9);
//!
//! let bins = histogram_bins(&catalog[8].data, 50).unwrap();
//! let area: f64 = bins.density().iter().map(|h| h * bins.bin_width).sum();
//! assert!((area - 1.0).abs() < 1e-9);
//! ```

use rand::Rng;
use rand_distr::{Distribution, Exp, LogNormal, Normal, Poisson, SkewNormal, Uniform, Weibull};
use tracing::debug;
use u_numflow::stats;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Equal-width histogram over the sample range.
#[derive(Debug, Clone)]
pub struct HistogramBins {
    /// Number of bins.
    pub n_bins: usize,
    /// Bin width.
    pub bin_width: f64,
    /// Bin edges (length = n_bins + 1).
    pub edges: Vec<f64>,
    /// Bin counts.
    pub counts: Vec<usize>,
}

impl HistogramBins {
    /// Number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Bin heights normalised so that Σ height·width = 1.
    pub fn density(&self) -> Vec<f64> {
        let scale = self.total() as f64 * self.bin_width;
        self.counts.iter().map(|&c| c as f64 / scale).collect()
    }
}

/// Bins `data` into `n_bins` equal-width bins spanning `[min, max]`.
///
/// Every bin is half-open except the last, which also holds the maximum.
///
/// # Returns
///
/// `None` if `n_bins` is zero, fewer than 2 data points, non-finite values,
/// or zero range.
///
/// # Examples
///
/// ```
/// use u_statlab::distribution::histogram_bins;
///
/// let data = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];
/// let result = histogram_bins(&data, 4).unwrap();
/// assert_eq!(result.edges.len(), 5);
/// assert_eq!(result.counts, vec![2, 2, 2, 3]);
/// ```
pub fn histogram_bins(data: &[f64], n_bins: usize) -> Option<HistogramBins> {
    let n = data.len();
    if n_bins == 0 || n < 2 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let min_val = data.iter().cloned().reduce(f64::min)?;
    let max_val = data.iter().cloned().reduce(f64::max)?;
    let range = max_val - min_val;

    if range < 1e-300 {
        return None; // all same value
    }

    let bin_width = range / n_bins as f64;

    let mut edges = Vec::with_capacity(n_bins + 1);
    for i in 0..n_bins {
        edges.push(min_val + i as f64 * bin_width);
    }
    edges.push(max_val);

    let mut counts = vec![0_usize; n_bins];
    for &x in data {
        let bin = ((x - min_val) / bin_width).floor() as usize;
        let bin = bin.min(n_bins - 1); // last point goes in last bin
        counts[bin] += 1;
    }

    Some(HistogramBins {
        n_bins,
        bin_width,
        edges,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Descriptive summary
// ---------------------------------------------------------------------------

/// Moments and order statistics of one sample.
#[derive(Debug, Clone, Copy)]
pub struct DistributionSummary {
    /// Sample size.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Sample skewness.
    pub skewness: f64,
    /// Median.
    pub median: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// Summarises a sample.
///
/// # Returns
///
/// `None` if fewer than 3 values, non-finite values, or zero variance.
pub fn summarize(data: &[f64]) -> Option<DistributionSummary> {
    if data.len() < 3 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let std_dev = stats::std_dev(data)?;
    if std_dev <= 0.0 {
        return None;
    }
    Some(DistributionSummary {
        n: data.len(),
        mean: stats::mean(data)?,
        std_dev,
        skewness: stats::skewness(data)?,
        median: stats::median(data)?,
        min: data.iter().cloned().reduce(f64::min)?,
        max: data.iter().cloned().reduce(f64::max)?,
    })
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Generator behind a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionKind {
    /// Skew-normal with location 0, scale 1 and the given shape.
    SkewNormal { shape: f64 },
    /// Two equal halves drawn from N(-centre, spread) and N(+centre, spread).
    Bimodal { centre: f64, spread: f64 },
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Exponential with the given scale (mean).
    Exponential { scale: f64 },
    /// Weibull with the given shape and unit scale.
    Weibull { shape: f64 },
    /// Poisson counts with rate `lambda`.
    Poisson { lambda: f64 },
    /// exp(N(mu, sigma)).
    LogNormal { mu: f64, sigma: f64 },
    /// N(mean, std_dev).
    Normal { mean: f64, std_dev: f64 },
}

impl DistributionKind {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SkewNormal { .. } => "skew-normal",
            Self::Bimodal { .. } => "bimodal",
            Self::Uniform { .. } => "uniform",
            Self::Exponential { .. } => "exponential",
            Self::Weibull { .. } => "weibull",
            Self::Poisson { .. } => "poisson",
            Self::LogNormal { .. } => "log-normal",
            Self::Normal { .. } => "normal",
        }
    }

    /// Draws `size` values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when the generator rejects its parameters.
    pub fn sample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Vec<f64>> {
        let label = self.label();
        let invalid = |message: String| Error::InvalidParameter {
            distribution: label,
            message,
        };

        let values = match *self {
            Self::SkewNormal { shape } => {
                let dist = SkewNormal::new(0.0, 1.0, shape).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
            Self::Bimodal { centre, spread } => {
                let low = Normal::new(-centre, spread).map_err(|e| invalid(e.to_string()))?;
                let high = Normal::new(centre, spread).map_err(|e| invalid(e.to_string()))?;
                let half = size / 2;
                let mut values = draw(&low, half, rng);
                values.extend(draw(&high, size - half, rng));
                values
            }
            Self::Uniform { low, high } => {
                if low.is_nan() || high.is_nan() || low >= high {
                    return Err(invalid(format!("low ({low}) must be below high ({high})")));
                }
                draw(&Uniform::new(low, high), size, rng)
            }
            Self::Exponential { scale } => {
                if scale.is_nan() || scale <= 0.0 {
                    return Err(invalid(format!("scale must be positive, got {scale}")));
                }
                let dist = Exp::new(1.0 / scale).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
            Self::Weibull { shape } => {
                let dist = Weibull::new(1.0, shape).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
            Self::Poisson { lambda } => {
                let dist = Poisson::new(lambda).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
            Self::LogNormal { mu, sigma } => {
                let dist = LogNormal::new(mu, sigma).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
            Self::Normal { mean, std_dev } => {
                let dist = Normal::new(mean, std_dev).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, size, rng)
            }
        };

        Ok(values)
    }
}

fn draw<D, R>(dist: &D, size: usize, rng: &mut R) -> Vec<f64>
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    (0..size).map(|_| dist.sample(rng)).collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Static description of one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Display name.
    pub name: &'static str,
    /// Generator parameters, as shown in the plot title.
    pub params: &'static str,
    /// Where this shape appears in manufacturing data.
    pub meaning: &'static str,
    /// Generator.
    pub kind: DistributionKind,
}

/// The nine catalog entries in display order (row-major on a 3×3 grid).
pub const MANUFACTURING_CATALOG: [CatalogEntry; 9] = [
    CatalogEntry {
        name: "Skewed (Right)",
        params: "Skew Normal (a=10): Right-skewed",
        meaning: "Long tail on the right. Common in tool wear or delay-heavy processes.",
        kind: DistributionKind::SkewNormal { shape: 10.0 },
    },
    CatalogEntry {
        name: "Skewed (Left)",
        params: "Skew Normal (a=-10): Left-skewed",
        meaning: "Long tail on the left. Seen in early-start conditions or processes that improve over time.",
        kind: DistributionKind::SkewNormal { shape: -10.0 },
    },
    CatalogEntry {
        name: "Bimodal",
        params: "Normal (μ=-2,2; σ=0.5)",
        meaning: "Two peaks indicate multiple sources, machines, or shifts influencing the data.",
        kind: DistributionKind::Bimodal {
            centre: 2.0,
            spread: 0.5,
        },
    },
    CatalogEntry {
        name: "Uniform",
        params: "Uniform (low=0, high=1)",
        meaning: "All outcomes equally likely. Seen in randomized stress testing or sampling.",
        kind: DistributionKind::Uniform { low: 0.0, high: 1.0 },
    },
    CatalogEntry {
        name: "Exponential",
        params: "Exponential (λ=1)",
        meaning: "Models time between rare events (e.g., breakdowns or failures).",
        kind: DistributionKind::Exponential { scale: 1.0 },
    },
    CatalogEntry {
        name: "Weibull",
        params: "Weibull (shape=1.5)",
        meaning: "Common in reliability/failure modeling. Shape dictates failure behavior.",
        kind: DistributionKind::Weibull { shape: 1.5 },
    },
    CatalogEntry {
        name: "Poisson",
        params: "Poisson (λ=3)",
        meaning: "Discrete count data. Good for defects per batch or failures per hour.",
        kind: DistributionKind::Poisson { lambda: 3.0 },
    },
    CatalogEntry {
        name: "Log-Normal",
        params: "Log-Normal (μ=0, σ=0.5)",
        meaning: "Skewed right. Used when data can't be negative and grows multiplicatively.",
        kind: DistributionKind::LogNormal { mu: 0.0, sigma: 0.5 },
    },
    CatalogEntry {
        name: "Normal",
        params: "Normal (μ=0, σ=1)",
        meaning: "The classic bell curve. Often assumed but not always accurate in practice.",
        kind: DistributionKind::Normal {
            mean: 0.0,
            std_dev: 1.0,
        },
    },
];

/// A generated sample with its display metadata.
#[derive(Debug, Clone)]
pub struct DistributionDescriptor {
    /// Display name.
    pub name: &'static str,
    /// Generator parameters.
    pub params: &'static str,
    /// Domain interpretation.
    pub meaning: &'static str,
    /// Generated values.
    pub data: Vec<f64>,
}

impl DistributionDescriptor {
    /// Three-line plot title: name, parameters, meaning.
    pub fn title_lines(&self) -> [&'static str; 3] {
        [self.name, self.params, self.meaning]
    }
}

/// Samples every entry of `entries` with `sample_size` values each.
///
/// # Errors
///
/// [`Error::InvalidParameter`] from the first generator that rejects its
/// parameters.
pub fn sample_catalog<R: Rng + ?Sized>(
    entries: &[CatalogEntry],
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<DistributionDescriptor>> {
    entries
        .iter()
        .map(|entry| {
            let data = entry.kind.sample(sample_size, rng)?;
            debug!(name = entry.name, kind = entry.kind.label(), n = data.len(), "sampled distribution");
            Ok(DistributionDescriptor {
                name: entry.name,
                params: entry.params,
                meaning: entry.meaning,
                data,
            })
        })
        .collect()
}

/// Samples the nine-entry [`MANUFACTURING_CATALOG`].
pub fn manufacturing_catalog<R: Rng + ?Sized>(
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<DistributionDescriptor>> {
    sample_catalog(&MANUFACTURING_CATALOG, sample_size, rng)
}
