//! Time-lagged cross-correlation.
//!
//! Correlates one column against shifted copies of another to locate the
//! lag of strongest association.
//!
//! # Algorithm
//!
//! For each shift `k`, the `y` column is shifted by `k` rows (see
//! [`shift`]) and correlated with the unshifted `x` column over the
//! pairwise-complete rows. The boundary rows introduced by the shift are
//! dropped, so large shifts leave little overlap; such coefficients may be
//! undefined and are reported as `None`.
//!
//! # Examples
//!
//! ```
//! use u_statlab::correlation::CorrelationMethod;
//! use u_statlab::frame::SeriesFrame;
//! use u_statlab::lagged::{cross_correlation, strongest_shift};
//!
//! let x: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();
//! let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
//! let frame = SeriesFrame::new(vec![("x".into(), x), ("y".into(), y)]).unwrap();
//!
//! let sweep = cross_correlation(&frame, CorrelationMethod::Kendall).unwrap();
//! assert_eq!(sweep.len(), 20); // shifts -10..10
//! assert!(strongest_shift(&sweep).is_some());
//! ```

use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::correlation::{correlate, pairwise_complete, CorrelationMethod};
use crate::error::Result;
use crate::frame::{shift, SeriesFrame};

/// Correlation of `x` against `y` shifted by `shift` rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftCorrelation {
    /// Row offset applied to the `y` column.
    pub shift: i64,
    /// Coefficient in [-1, 1], or `None` when undefined for this overlap.
    pub r: Option<f64>,
}

impl fmt::Display for ShiftCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.r {
            Some(r) => write!(f, "({}, {r:.6})", self.shift),
            None => write!(f, "({}, NaN)", self.shift),
        }
    }
}

/// Correlates column `x_col` with column `y_col` shifted by each offset in
/// `shifts`.
///
/// Returns exactly one record per input shift, in input order. Undefined
/// coefficients (fewer than 3 overlapping rows, zero variance) are `None`.
///
/// # Errors
///
/// [`crate::Error::ColumnNotFound`] if either column is missing.
pub fn time_lagged_correlation<I>(
    frame: &SeriesFrame,
    shifts: I,
    x_col: &str,
    y_col: &str,
    method: CorrelationMethod,
) -> Result<Vec<ShiftCorrelation>>
where
    I: IntoIterator<Item = i64>,
{
    let x = frame.column(x_col)?;
    let y = frame.column(y_col)?;

    let records: Vec<ShiftCorrelation> = shifts
        .into_iter()
        .map(|k| {
            let shifted = shift(y, k);
            let (a, b) = pairwise_complete(x, &shifted);
            let r = correlate(&a, &b, method).map(|c| c.r);
            if r.is_none() {
                debug!(shift = k, overlap = a.len(), %method, "undefined lagged correlation");
            }
            ShiftCorrelation { shift: k, r }
        })
        .collect();

    Ok(records)
}

/// Symmetric shift window for a series of length `n`.
///
/// Spans `-h..h` with `h = floor(n / 2 * 0.5)`, one quarter of the series
/// on each side, so the window holds `2h` offsets.
///
/// # Examples
///
/// ```
/// use u_statlab::lagged::cross_correlation_window;
///
/// assert_eq!(cross_correlation_window(100), -25..25);
/// assert_eq!(cross_correlation_window(7), -1..1);
/// ```
pub fn cross_correlation_window(n: usize) -> Range<i64> {
    let half = (n as f64 / 2.0 * 0.5).floor() as i64;
    -half..half
}

/// [`time_lagged_correlation`] of columns `"x"` and `"y"` over
/// [`cross_correlation_window`] of the frame length.
pub fn cross_correlation(frame: &SeriesFrame, method: CorrelationMethod) -> Result<Vec<ShiftCorrelation>> {
    let window = cross_correlation_window(frame.len());
    debug!(start = window.start, end = window.end, %method, "cross-correlation sweep");
    time_lagged_correlation(frame, window, "x", "y", method)
}

/// Record with the largest defined coefficient.
///
/// Ties resolve to the earliest record. Undefined records are skipped;
/// returns `None` when no record is defined.
pub fn strongest_shift(records: &[ShiftCorrelation]) -> Option<ShiftCorrelation> {
    records
        .iter()
        .filter(|rec| rec.r.is_some())
        .fold(None, |best: Option<ShiftCorrelation>, rec| match best {
            Some(b) if b.r >= rec.r => Some(b),
            _ => Some(*rec),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn frame(x: Vec<f64>, y: Vec<f64>) -> SeriesFrame {
        SeriesFrame::new(vec![("x".to_string(), x), ("y".to_string(), y)]).expect("valid frame")
    }

    fn wave(n: usize) -> SeriesFrame {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.2).collect();
        let y: Vec<f64> = x.iter().map(|v| (v + 1.0).sin() + 0.05 * v).collect();
        frame(x, y)
    }

    #[test]
    fn one_record_per_shift_in_input_order() {
        let f = wave(30);
        let shifts = vec![3, -2, 0, 7, -5];
        let records =
            time_lagged_correlation(&f, shifts.clone(), "x", "y", CorrelationMethod::Pearson).expect("columns exist");
        let got: Vec<i64> = records.iter().map(|r| r.shift).collect();
        assert_eq!(got, shifts);
    }

    #[test]
    fn zero_shift_matches_direct_correlation() {
        let f = wave(40);
        let x = f.column("x").expect("x");
        let y = f.column("y").expect("y");
        for method in CorrelationMethod::ALL {
            let records = time_lagged_correlation(&f, [0], "x", "y", method).expect("columns exist");
            let direct = correlate(x, y, method).expect("defined").r;
            assert_eq!(records[0].r, Some(direct), "{method}");
        }
    }

    #[test]
    fn negative_shift_realigns_delayed_column() {
        // y is x delayed by 2 rows, so shifting y by -2 realigns it perfectly.
        let x: Vec<f64> = vec![0.0, 3.0, 1.0, 4.0, 1.5, 5.0, 2.0, 6.0, 2.5, 7.0];
        let mut y = vec![9.0, 9.5];
        y.extend_from_slice(&x[..8]);
        let f = frame(x, y);
        let records = time_lagged_correlation(&f, [-2], "x", "y", CorrelationMethod::Pearson).expect("columns exist");
        let r = records[0].r.expect("defined");
        assert!((r - 1.0).abs() < 1e-10, "r = {r}");
    }

    #[test]
    fn extreme_shift_is_undefined_not_an_error() {
        let f = wave(10);
        let records =
            time_lagged_correlation(&f, [-9, 8, 50], "x", "y", CorrelationMethod::Kendall).expect("columns exist");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.r.is_none()));
    }

    #[test]
    fn integer_limit_shifts_are_undefined() {
        let f = wave(10);
        let records = time_lagged_correlation(&f, [i64::MIN, i64::MAX], "x", "y", CorrelationMethod::Pearson)
            .expect("columns exist");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].shift, i64::MIN);
        assert_eq!(records[1].shift, i64::MAX);
        assert!(records.iter().all(|r| r.r.is_none()));
    }

    #[test]
    fn unknown_column_is_an_error() {
        let f = wave(10);
        let err = time_lagged_correlation(&f, [0], "x", "z", CorrelationMethod::Pearson).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "z"));
    }

    #[test]
    fn window_length_is_twice_quarter_length() {
        for n in [0_usize, 1, 3, 4, 7, 8, 99, 100, 101, 1000] {
            let window = cross_correlation_window(n);
            let half = (n as f64 / 2.0 * 0.5).floor() as i64;
            assert_eq!(window.clone().count() as i64, 2 * half, "n = {n}");
            assert_eq!(window.start, -window.end);
        }
    }

    #[test]
    fn cross_correlation_covers_window() {
        let f = wave(48);
        let records = cross_correlation(&f, CorrelationMethod::Spearman).expect("x and y exist");
        let shifts: Vec<i64> = records.iter().map(|r| r.shift).collect();
        assert_eq!(shifts, (-12..12).collect::<Vec<_>>());
        for rec in &records {
            if let Some(r) = rec.r {
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }

    #[test]
    fn cross_correlation_requires_x_and_y() {
        let f = SeriesFrame::new(vec![("t".to_string(), vec![1.0, 2.0, 3.0, 4.0])]).expect("valid");
        assert!(cross_correlation(&f, CorrelationMethod::Pearson).is_err());
    }

    #[test]
    fn strongest_shift_prefers_first_of_equal_maxima() {
        let records = [
            ShiftCorrelation { shift: -1, r: Some(0.2) },
            ShiftCorrelation { shift: 0, r: Some(0.7) },
            ShiftCorrelation { shift: 1, r: None },
            ShiftCorrelation { shift: 2, r: Some(0.7) },
            ShiftCorrelation { shift: 3, r: Some(-0.9) },
        ];
        let best = strongest_shift(&records).expect("defined records");
        assert_eq!(best.shift, 0);
        assert_eq!(best.r, Some(0.7));
    }

    #[test]
    fn strongest_shift_skips_leading_undefined() {
        let records = [
            ShiftCorrelation { shift: -2, r: None },
            ShiftCorrelation { shift: -1, r: Some(-0.4) },
            ShiftCorrelation { shift: 0, r: Some(-0.1) },
        ];
        assert_eq!(strongest_shift(&records).map(|r| r.shift), Some(0));
    }

    #[test]
    fn strongest_shift_none_when_all_undefined() {
        let records = [ShiftCorrelation { shift: 0, r: None }];
        assert!(strongest_shift(&records).is_none());
        assert!(strongest_shift(&[]).is_none());
    }

    #[test]
    fn record_display() {
        assert_eq!(ShiftCorrelation { shift: -3, r: Some(0.5) }.to_string(), "(-3, 0.500000)");
        assert_eq!(ShiftCorrelation { shift: 4, r: None }.to_string(), "(4, NaN)");
    }
}
