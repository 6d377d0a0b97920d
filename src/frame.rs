//! Named, equal-length numeric columns.
//!
//! A [`SeriesFrame`] holds a small tabular dataset in time order. Row order
//! is significant: [`shift`] moves values along it, and lagged correlation
//! depends on it.
//!
//! # Examples
//!
//! ```
//! use u_statlab::correlation::CorrelationMethod;
//! use u_statlab::frame::SeriesFrame;
//!
//! let frame = SeriesFrame::new(vec![
//!     ("x".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
//!     ("y".to_string(), vec![2.0, 4.0, 6.0, 8.0]),
//! ])
//! .unwrap();
//!
//! let table = frame.corr(CorrelationMethod::Pearson).unwrap();
//! assert!((table.get("x", "y").unwrap() - 1.0).abs() < 1e-10);
//! ```

use std::fmt;

use crate::correlation::{correlation_matrix, CorrelationMethod};
use crate::error::{Error, Result};

/// Ordered set of named `f64` columns sharing one row count.
#[derive(Debug, Clone)]
pub struct SeriesFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SeriesFrame {
    /// Builds a frame from `(name, values)` pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyFrame`] when no columns are given,
    /// [`Error::DuplicateColumn`] for a repeated name, and
    /// [`Error::LengthMismatch`] when a column's length differs from the first.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let expected = columns.first().map(|(_, v)| v.len()).ok_or(Error::EmptyFrame)?;

        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if names.contains(&name) {
                return Err(Error::DuplicateColumn(name));
            }
            if values.len() != expected {
                return Err(Error::LengthMismatch {
                    name,
                    expected,
                    actual: values.len(),
                });
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            columns: data,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// `true` when the frame has zero rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in frame order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] if no column has that name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Full pairwise correlation table under `method`.
    ///
    /// Returns `None` only for a frame the matrix routine cannot shape;
    /// undefined individual entries are `NaN`.
    pub fn corr(&self, method: CorrelationMethod) -> Option<CorrelationTable> {
        let refs: Vec<&[f64]> = self.columns.iter().map(Vec::as_slice).collect();
        let matrix = correlation_matrix(&refs, method)?;
        let p = self.names.len();
        let values = (0..p)
            .flat_map(|i| (0..p).map(move |j| (i, j)))
            .map(|(i, j)| matrix.get(i, j))
            .collect();
        Some(CorrelationTable {
            method,
            names: self.names.clone(),
            values,
        })
    }
}

/// Shifts `values` by `offset` positions along the row axis.
///
/// `out[i] = values[i - offset]`; positions with no source row become `NaN`.
/// A positive offset delays the series, a negative one advances it, and an
/// offset at least as large as the length yields all `NaN`.
///
/// # Examples
///
/// ```
/// use u_statlab::frame::shift;
///
/// let shifted = shift(&[1.0, 2.0, 3.0], 1);
/// assert!(shifted[0].is_nan());
/// assert_eq!(&shifted[1..], &[1.0, 2.0]);
///
/// let advanced = shift(&[1.0, 2.0, 3.0], -1);
/// assert_eq!(&advanced[..2], &[2.0, 3.0]);
/// assert!(advanced[2].is_nan());
/// ```
pub fn shift(values: &[f64], offset: i64) -> Vec<f64> {
    let n = values.len() as i64;
    (0..n)
        .map(|i| match i.checked_sub(offset) {
            Some(src) if (0..n).contains(&src) => values[src as usize],
            _ => f64::NAN,
        })
        .collect()
}

/// Pairwise correlation table with labelled rows and columns.
#[derive(Debug, Clone)]
pub struct CorrelationTable {
    method: CorrelationMethod,
    names: Vec<String>,
    /// Row-major p×p coefficients.
    values: Vec<f64>,
}

impl CorrelationTable {
    /// Method the table was computed with.
    pub fn method(&self) -> CorrelationMethod {
        self.method
    }

    /// Row and column labels.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coefficient at `(row, col)` by position.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.names.len() + col]
    }

    /// Coefficient between two named columns, `None` for unknown names.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == row)?;
        let j = self.names.iter().position(|n| n == col)?;
        Some(self.at(i, j))
    }
}

impl fmt::Display for CorrelationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.names.iter().map(String::len).max().unwrap_or(0);
        let cell_width = self.names.iter().map(String::len).max().unwrap_or(0).max(9);

        write!(f, "{:label_width$}", "")?;
        for name in &self.names {
            write!(f, "  {name:>cell_width$}")?;
        }
        for (i, name) in self.names.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{name:<label_width$}")?;
            for j in 0..self.names.len() {
                write!(f, "  {:>cell_width$.6}", self.at(i, j))?;
            }
        }
        Ok(())
    }
}
