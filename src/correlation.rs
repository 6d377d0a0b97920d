//! Correlation analysis.
//!
//! Pearson, Spearman, and Kendall correlation coefficients with p-values,
//! method dispatch, correlation matrices for every method, pairwise-complete
//! filtering, autocorrelation, and correlation against a binary variable.
//!
//! # Examples
//!
//! ```
//! use u_statlab::correlation::{correlate, kendall_tau_b, pearson, spearman, CorrelationMethod};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//!
//! let p = pearson(&x, &y).unwrap();
//! assert!(p.r > 0.7);
//! assert!(p.p_value < 0.2);
//!
//! let s = spearman(&x, &y).unwrap();
//! assert!(s.r > 0.7);
//!
//! let k = kendall_tau_b(&x, &y).unwrap();
//! assert!(k.r > 0.5);
//!
//! let method: CorrelationMethod = "kendall".parse().unwrap();
//! assert_eq!(correlate(&x, &y, method).unwrap().r, k.r);
//! ```

use std::fmt;
use std::str::FromStr;

use u_numflow::matrix::Matrix;
use u_numflow::special;
use u_numflow::stats;

use crate::error::Error;

/// Result of a correlation computation.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationResult {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// Two-tailed p-value for testing H₀: ρ = 0.
    pub p_value: f64,
    /// Sample size.
    pub n: usize,
}

/// Correlation coefficient family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationMethod {
    /// Linear association. Assumes approximate joint normality.
    Pearson,
    /// Monotonic association on mid-ranks.
    Spearman,
    /// Concordance of pairs (tau-b). Robust to outliers, suited to small samples.
    Kendall,
}

impl CorrelationMethod {
    /// All methods, in the order they are reported.
    pub const ALL: [CorrelationMethod; 3] = [Self::Pearson, Self::Spearman, Self::Kendall];

    /// Lowercase method name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// Computes the correlation of `x` and `y` with the given method.
///
/// Inputs must already be complete; see [`pairwise_complete`] for
/// series that carry `NaN` gaps.
pub fn correlate(x: &[f64], y: &[f64], method: CorrelationMethod) -> Option<CorrelationResult> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
        CorrelationMethod::Kendall => kendall_tau_b(x, y),
    }
}

/// Keeps only the positions where both `x[i]` and `y[i]` are finite.
///
/// Pairs beyond the shorter slice are ignored.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::pairwise_complete;
///
/// let (x, y) = pairwise_complete(&[1.0, 2.0, f64::NAN, 4.0], &[f64::NAN, 3.0, 5.0, 7.0]);
/// assert_eq!(x, vec![2.0, 4.0]);
/// assert_eq!(y, vec![3.0, 7.0]);
/// ```
pub fn pairwise_complete(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip()
}

// ---------------------------------------------------------------------------
// Pearson / Spearman
// ---------------------------------------------------------------------------

/// Common length of two complete, equally long samples of at least 3.
fn complete_len(x: &[f64], y: &[f64]) -> Option<usize> {
    let n = x.len();
    let finite = x.iter().chain(y).all(|v| v.is_finite());
    (n >= 3 && n == y.len() && finite).then_some(n)
}

/// Sample Pearson coefficient, clamped to [-1, 1]. `None` on zero variance.
fn pearson_r(x: &[f64], y: &[f64]) -> Option<f64> {
    let spread = stats::std_dev(x)? * stats::std_dev(y)?;
    if spread < 1e-300 {
        return None;
    }
    Some((stats::covariance(x, y)? / spread).clamp(-1.0, 1.0))
}

/// Pearson product-moment correlation with a t-test p-value.
///
/// r = cov(x,y) / (σ_x · σ_y); t = r·√(n-2) / √(1-r²) on n-2 degrees of
/// freedom.
///
/// # Returns
///
/// `None` if either slice has fewer than 3 elements, the slices differ in
/// length, contain non-finite values, or either variable is constant.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::pearson;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// let result = pearson(&x, &y).unwrap();
/// assert!((result.r - 1.0).abs() < 1e-10);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = complete_len(x, y)?;
    let r = pearson_r(x, y)?;
    Some(CorrelationResult {
        r,
        p_value: correlation_p_value(r, n),
        n,
    })
}

/// Spearman rank correlation: Pearson on mid-ranks, so ties share the
/// average of the ranks they span.
///
/// # Returns
///
/// Same conditions as [`pearson`], applied to the ranks.
///
/// # References
///
/// Spearman (1904). "The proof and measurement of association between two
/// things". The American Journal of Psychology, 15(1), 72–101.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = complete_len(x, y)?;
    let r = pearson_r(&rank_data(x), &rank_data(y))?;
    Some(CorrelationResult {
        r,
        p_value: correlation_p_value(r, n),
        n,
    })
}

// ---------------------------------------------------------------------------
// Kendall tau-b
// ---------------------------------------------------------------------------

/// Kendall's tau-b with tie correction.
///
/// τ_b = (C - D) / √[(n₀ - n₁)(n₀ - n₂)]
///
/// where C and D count concordant and discordant pairs, n₀ = n(n-1)/2, and
/// n₁, n₂ count the pairs tied in `x` and in `y`. A pair tied in both
/// counts towards n₁ and n₂. Pairs are enumerated directly, which is O(n²).
///
/// The p-value uses the normal approximation of S = C - D with the
/// tie-corrected variance.
///
/// # Returns
///
/// `None` under the same input conditions as [`pearson`], or when every
/// pair is tied in `x` or in `y`.
///
/// # References
///
/// Kendall (1938). "A new measure of rank correlation".
/// Biometrika, 30(1/2), 81–93.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::kendall_tau_b;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let result = kendall_tau_b(&x, &y).unwrap();
/// assert!((result.r - 1.0).abs() < 1e-10);
/// ```
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = complete_len(x, y)?;

    // (concordant - discordant, tied in x, tied in y)
    let (mut s, mut tied_x, mut tied_y) = (0_i64, 0_i64, 0_i64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                tied_x += 1;
            }
            if dy == 0.0 {
                tied_y += 1;
            }
            if dx != 0.0 && dy != 0.0 {
                s += if (dx > 0.0) == (dy > 0.0) { 1 } else { -1 };
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as i64;
    let denom = ((pairs - tied_x) as f64 * (pairs - tied_y) as f64).sqrt();
    if denom <= 0.0 {
        return None;
    }
    let tau = (s as f64 / denom).clamp(-1.0, 1.0);

    let nf = n as f64;
    let var_s = (nf * (nf - 1.0) * (2.0 * nf + 5.0) - tie_variance_term(x) - tie_variance_term(y)) / 18.0;
    let p_value = if var_s > 0.0 {
        let z = s as f64 / var_s.sqrt();
        2.0 * (1.0 - special::standard_normal_cdf(z.abs()))
    } else {
        1.0
    };

    Some(CorrelationResult { r: tau, p_value, n })
}

// ---------------------------------------------------------------------------
// Correlation Matrix
// ---------------------------------------------------------------------------

/// Computes a pairwise correlation matrix under `method`.
///
/// Each off-diagonal entry is computed over the pairwise-complete
/// observations of its two variables. Entries that cannot be computed
/// (too few complete pairs, zero variance) are `NaN`.
///
/// # Arguments
///
/// * `variables`: slice of variable data. Each inner slice is one variable's
///   observations. All must have the same length.
///
/// # Returns
///
/// A symmetric p×p `Matrix` where entry (i,j) is the coefficient between
/// variables i and j. Diagonal is 1.0. Returns `None` if there are no
/// variables or variable lengths differ.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::{correlation_matrix, CorrelationMethod};
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// let z = [5.0, 4.0, 3.0, 2.0, 1.0];
/// let mat = correlation_matrix(&[&x, &y, &z], CorrelationMethod::Pearson).unwrap();
/// assert!((mat.get(0, 1) - 1.0).abs() < 1e-10);   // x,y perfectly correlated
/// assert!((mat.get(0, 2) + 1.0).abs() < 1e-10);   // x,z perfectly anti-correlated
/// ```
pub fn correlation_matrix(variables: &[&[f64]], method: CorrelationMethod) -> Option<Matrix> {
    let p = variables.len();
    if p == 0 {
        return None;
    }
    let n = variables[0].len();
    if variables.iter().any(|v| v.len() != n) {
        return None;
    }

    let mut data = vec![0.0; p * p];

    for i in 0..p {
        data[i * p + i] = 1.0; // diagonal
        for j in (i + 1)..p {
            let (a, b) = pairwise_complete(variables[i], variables[j]);
            let r = correlate(&a, &b, method).map_or(f64::NAN, |c| c.r);
            data[i * p + j] = r;
            data[j * p + i] = r;
        }
    }

    Matrix::new(p, p, data).ok()
}

// ---------------------------------------------------------------------------
// Binary variables
// ---------------------------------------------------------------------------

/// Encodes a two-class label sequence as 0/1 values.
///
/// Labels equal to `negative` map to 0.0 and labels equal to `positive`
/// map to 1.0.
///
/// # Returns
///
/// `None` if any label matches neither class.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::encode_binary;
///
/// let labels = ["pass", "fail", "pass"];
/// assert_eq!(encode_binary(&labels, &"pass", &"fail"), Some(vec![0.0, 1.0, 0.0]));
/// assert_eq!(encode_binary(&labels, &"ok", &"fail"), None);
/// ```
pub fn encode_binary<T: PartialEq>(labels: &[T], negative: &T, positive: &T) -> Option<Vec<f64>> {
    labels
        .iter()
        .map(|label| {
            if label == negative {
                Some(0.0)
            } else if label == positive {
                Some(1.0)
            } else {
                None
            }
        })
        .collect()
}

/// Computes the point-biserial correlation between a 0/1 variable and a
/// continuous one.
///
/// This is Pearson's r with one variable restricted to {0, 1}.
///
/// # Returns
///
/// `None` if `binary` contains a value other than 0.0 or 1.0, only one of
/// the two classes is present, or [`pearson`] itself is undefined.
pub fn point_biserial(binary: &[f64], continuous: &[f64]) -> Option<CorrelationResult> {
    if binary.iter().any(|&b| b != 0.0 && b != 1.0) {
        return None;
    }
    let has_zero = binary.iter().any(|&b| b == 0.0);
    let has_one = binary.iter().any(|&b| b == 1.0);
    if !has_zero || !has_one {
        return None;
    }
    pearson(binary, continuous)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Two-tailed p-value of `r` under H₀: ρ = 0 via the t statistic on n-2
/// degrees of freedom.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let one_minus_r2 = 1.0 - r * r;
    if one_minus_r2 <= 1e-15 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / one_minus_r2).sqrt();
    2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))
}

/// Half-open `(start, end)` ranges of equal values in an already sorted
/// slice.
fn tie_runs(sorted: &[f64]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for end in 1..=sorted.len() {
        if end == sorted.len() || sorted[end] != sorted[start] {
            runs.push((start, end));
            start = end;
        }
    }
    runs
}

/// 1-based mid-ranks: tied values share the average of their ranks.
fn rank_data(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));
    let sorted: Vec<f64> = order.iter().map(|&i| data[i]).collect();

    let mut ranks = vec![0.0; data.len()];
    for (start, end) in tie_runs(&sorted) {
        let mid = (start + end + 1) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = mid;
        }
    }
    ranks
}

/// Σ t(t-1)(2t+5) over groups of `t` tied values.
fn tie_variance_term(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    tie_runs(&sorted)
        .into_iter()
        .map(|(start, end)| {
            let t = (end - start) as f64;
            t * (t - 1.0) * (2.0 * t + 5.0)
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Autocorrelation (ACF) and Partial Autocorrelation (PACF)
// ---------------------------------------------------------------------------

/// Sample autocorrelation for lags 0 through `max_lag`.
#[derive(Debug, Clone)]
pub struct AcfResult {
    /// `acf[k]` is the lag-k autocorrelation; `acf[0]` is 1.0.
    pub acf: Vec<f64>,
    /// 95% white-noise band, 1.96 / √n.
    pub confidence_threshold: f64,
}

/// Sample partial autocorrelation for lags 1 through `max_lag`.
#[derive(Debug, Clone)]
pub struct PacfResult {
    /// `pacf[k - 1]` is the lag-k partial autocorrelation.
    pub pacf: Vec<f64>,
    /// 95% white-noise band, 1.96 / √n.
    pub confidence_threshold: f64,
}

/// Sample autocorrelation function.
///
/// Autocovariances use the biased denominator `n` at every lag, which keeps
/// the autocovariance sequence positive semidefinite. `max_lag` is clamped
/// to `n - 1`.
///
/// # Returns
///
/// `None` if fewer than 2 values, `max_lag == 0`, non-finite values, or a
/// constant series.
///
/// # References
///
/// - Box & Jenkins (1976). *Time Series Analysis: Forecasting and Control*.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::acf;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 2.0];
/// let r = acf(&data, 5).unwrap();
/// assert!((r.acf[0] - 1.0).abs() < 1e-10);
/// assert_eq!(r.acf.len(), 6);
/// ```
pub fn acf(data: &[f64], max_lag: usize) -> Option<AcfResult> {
    let n = data.len();
    if n < 2 || max_lag == 0 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let mean = stats::mean(data)?;
    let centred: Vec<f64> = data.iter().map(|v| v - mean).collect();

    let autocov = |lag: usize| -> f64 {
        centred.iter().zip(&centred[lag..]).map(|(a, b)| a * b).sum::<f64>() / nf
    };

    let c0 = autocov(0);
    if c0 <= 0.0 {
        return None;
    }

    Some(AcfResult {
        acf: (0..=max_lag.min(n - 1)).map(|lag| autocov(lag) / c0).collect(),
        confidence_threshold: 1.96 / nf.sqrt(),
    })
}

/// Sample partial autocorrelation function via the Durbin-Levinson
/// recursion over [`acf`].
///
/// The lag-h value is the correlation of xₜ and xₜ₊ₕ once the linear effect
/// of the intermediate lags is removed.
///
/// # Returns
///
/// `None` if fewer than 3 values, `max_lag == 0`, or [`acf`] is undefined.
///
/// # References
///
/// - Durbin (1960). "The fitting of time-series models". Revue de l'Institut
///   International de Statistique, 28(3), 233–244.
///
/// # Examples
///
/// ```
/// use u_statlab::correlation::pacf;
///
/// let data = [1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 4.0, 6.0, 5.0, 7.0];
/// let r = pacf(&data, 4).unwrap();
/// assert_eq!(r.pacf.len(), 4);
/// ```
pub fn pacf(data: &[f64], max_lag: usize) -> Option<PacfResult> {
    if data.len() < 3 || max_lag == 0 {
        return None;
    }
    let AcfResult {
        acf: rho,
        confidence_threshold,
    } = acf(data, max_lag)?;

    // phi[j] holds φ_{h,j+1} for the current order h
    let mut phi: Vec<f64> = Vec::with_capacity(rho.len());
    let mut partial = Vec::with_capacity(rho.len() - 1);

    for h in 1..rho.len() {
        let num = rho[h] - phi.iter().zip(rho[1..h].iter().rev()).map(|(p, r)| p * r).sum::<f64>();
        let den = 1.0 - phi.iter().zip(&rho[1..h]).map(|(p, r)| p * r).sum::<f64>();
        let phi_hh = if den.abs() > 1e-14 { num / den } else { 0.0 };

        let mut next: Vec<f64> = phi
            .iter()
            .zip(phi.iter().rev())
            .map(|(p, q)| p - phi_hh * q)
            .collect();
        next.push(phi_hh);
        phi = next;
        partial.push(phi_hh);
    }

    Some(PacfResult {
        pacf: partial,
        confidence_threshold,
    })
}
