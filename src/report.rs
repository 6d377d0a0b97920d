//! Console reports printed by the demo binaries.
//!
//! Each report is computed once and rendered through [`fmt::Display`] as a
//! sequence of labelled plain-text blocks.

use std::fmt;

use tracing::warn;

use crate::correlation::{pacf, CorrelationMethod, PacfResult};
use crate::distribution::{summarize, DistributionDescriptor, DistributionSummary};
use crate::error::{Error, Result};
use crate::frame::{CorrelationTable, SeriesFrame};
use crate::lagged::{cross_correlation, strongest_shift, ShiftCorrelation};

// ---------------------------------------------------------------------------
// Correlation report
// ---------------------------------------------------------------------------

/// Heading printed above the zero-lag table of each method.
fn table_heading(method: CorrelationMethod) -> &'static str {
    match method {
        CorrelationMethod::Pearson => "Pearson Correlations:",
        CorrelationMethod::Spearman => "Spearman rank correlation:",
        CorrelationMethod::Kendall => "Kendall Tau Correlation:",
    }
}

/// Zero-lag tables, the shift sweep, and an optional PACF of `y`.
#[derive(Debug, Clone)]
pub struct CorrelationReport {
    /// One table per method, in [`CorrelationMethod::ALL`] order.
    pub tables: Vec<CorrelationTable>,
    /// Method used for the sweep.
    pub sweep_method: CorrelationMethod,
    /// Cross-correlation records over the symmetric shift window.
    pub sweep: Vec<ShiftCorrelation>,
    /// Record with the largest defined coefficient.
    pub strongest: Option<ShiftCorrelation>,
    /// Partial autocorrelation of `y`, when requested.
    pub pacf: Option<PacfResult>,
}

impl CorrelationReport {
    /// Builds the report for a frame holding `x` and `y` columns.
    ///
    /// # Errors
    ///
    /// [`Error::ColumnNotFound`] when `x` or `y` is missing and
    /// [`Error::Undefined`] when a zero-lag table cannot be formed.
    pub fn compute(frame: &SeriesFrame, sweep_method: CorrelationMethod, pacf_lags: Option<usize>) -> Result<Self> {
        let tables = CorrelationMethod::ALL
            .iter()
            .map(|&method| frame.corr(method).ok_or(Error::Undefined("correlation table")))
            .collect::<Result<Vec<_>>>()?;

        let sweep = cross_correlation(frame, sweep_method)?;
        let strongest = strongest_shift(&sweep);
        if strongest.is_none() {
            warn!(method = %sweep_method, "no shift produced a defined correlation");
        }

        let pacf = match pacf_lags {
            Some(lags) => {
                let result = pacf(frame.column("y")?, lags);
                if result.is_none() {
                    warn!(lags, "partial autocorrelation of y is undefined");
                }
                result
            }
            None => None,
        };

        Ok(Self {
            tables,
            sweep_method,
            sweep,
            strongest,
            pacf,
        })
    }
}

impl fmt::Display for CorrelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{}", table_heading(table.method()))?;
            writeln!(f, "{table}")?;
            writeln!(f)?;
        }

        writeln!(f, "Time-lagged correlation:")?;
        let records: Vec<String> = self.sweep.iter().map(ToString::to_string).collect();
        writeln!(f, "[{}]", records.join(", "))?;
        writeln!(f)?;

        match self.strongest {
            Some(record) => writeln!(f, "Strongest {} correlation (shift, r): {record}", self.sweep_method)?,
            None => writeln!(f, "Strongest {} correlation (shift, r): none defined", self.sweep_method)?,
        }

        if let Some(pacf) = &self.pacf {
            writeln!(f)?;
            writeln!(f, "Partial autocorrelation of y:")?;
            for (k, value) in pacf.pacf.iter().enumerate() {
                let marker = if value.abs() > pacf.confidence_threshold { " *" } else { "" };
                writeln!(f, "  lag {:>3}: {value:>9.6}{marker}", k + 1)?;
            }
            writeln!(f, "  (* exceeds ±{:.6})", pacf.confidence_threshold)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Distribution report
// ---------------------------------------------------------------------------

/// Descriptive summary of every generated sample.
#[derive(Debug, Clone)]
pub struct DistributionReport {
    /// `(name, summary)` per descriptor; `None` when the sample cannot be
    /// summarised.
    pub rows: Vec<(&'static str, Option<DistributionSummary>)>,
}

impl DistributionReport {
    /// Summarises each descriptor in order.
    pub fn compute(descriptors: &[DistributionDescriptor]) -> Self {
        let rows = descriptors
            .iter()
            .map(|d| {
                let summary = summarize(&d.data);
                if summary.is_none() {
                    warn!(name = d.name, "sample cannot be summarised");
                }
                (d.name, summary)
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self.rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0).max(12);

        writeln!(f, "Distribution summary:")?;
        write!(f, "{:<name_width$}  {:>6}", "name", "n")?;
        for header in ["mean", "std dev", "skewness", "median", "min", "max"] {
            write!(f, "  {header:>9}")?;
        }
        for (name, summary) in &self.rows {
            writeln!(f)?;
            write!(f, "{name:<name_width$}")?;
            match summary {
                Some(s) => {
                    write!(f, "  {:>6}", s.n)?;
                    for value in [s.mean, s.std_dev, s.skewness, s.median, s.min, s.max] {
                        write!(f, "  {value:>9.4}")?;
                    }
                }
                None => write!(f, "  {:>6}", "n/a")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::manufacturing_catalog;
    use crate::signal::{noisy_lagged_sine, SineWaveConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo_frame(seed: u64) -> SeriesFrame {
        let mut rng = StdRng::seed_from_u64(seed);
        noisy_lagged_sine(&SineWaveConfig::default(), &mut rng).expect("valid config")
    }

    #[test]
    fn correlation_report_blocks_in_order() {
        let report = CorrelationReport::compute(&demo_frame(3), CorrelationMethod::Kendall, None)
            .expect("should compute");
        let text = report.to_string();

        let headings = [
            "Pearson Correlations:",
            "Spearman rank correlation:",
            "Kendall Tau Correlation:",
            "Time-lagged correlation:",
            "Strongest kendall correlation (shift, r):",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| text.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.lines().any(|line| line == "Time-lagged correlation:"));
        assert!(!text.contains("Partial autocorrelation"));
    }

    #[test]
    fn correlation_report_sweep_covers_window() {
        let report = CorrelationReport::compute(&demo_frame(5), CorrelationMethod::Kendall, None)
            .expect("should compute");
        assert_eq!(report.tables.len(), 3);
        assert_eq!(report.sweep.len(), 50);
        assert_eq!(report.sweep[0].shift, -25);
        assert_eq!(report.sweep[49].shift, 24);
        let strongest = report.strongest.expect("defined shift");
        assert!((-25..25).contains(&strongest.shift));
    }

    #[test]
    fn correlation_report_with_pacf() {
        let report = CorrelationReport::compute(&demo_frame(8), CorrelationMethod::Pearson, Some(5))
            .expect("should compute");
        let pacf = report.pacf.as_ref().expect("pacf computed");
        assert_eq!(pacf.pacf.len(), 5);
        let text = report.to_string();
        assert!(text.contains("Partial autocorrelation of y:"));
        assert!(text.contains("lag   5:"));
    }

    #[test]
    fn correlation_report_requires_xy_columns() {
        let frame = SeriesFrame::new(vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("b".to_string(), vec![2.0, 1.0, 4.0, 3.0]),
        ])
        .expect("valid frame");
        let result = CorrelationReport::compute(&frame, CorrelationMethod::Kendall, None);
        assert!(matches!(result, Err(Error::ColumnNotFound(_))));
    }

    #[test]
    fn distribution_report_lists_every_entry() {
        let mut rng = StdRng::seed_from_u64(21);
        let descriptors = manufacturing_catalog(500, &mut rng).expect("valid catalog");
        let report = DistributionReport::compute(&descriptors);
        assert_eq!(report.rows.len(), 9);
        assert!(report.rows.iter().all(|(_, s)| s.is_some()));

        let text = report.to_string();
        assert!(text.starts_with("Distribution summary:"));
        for d in &descriptors {
            assert!(text.contains(d.name), "missing {}", d.name);
        }
    }

    #[test]
    fn distribution_report_marks_unsummarisable_samples() {
        let descriptors = vec![DistributionDescriptor {
            name: "Flat",
            params: "constant",
            meaning: "no spread",
            data: vec![1.0; 10],
        }];
        let report = DistributionReport::compute(&descriptors);
        assert!(report.rows[0].1.is_none());
        assert!(report.to_string().contains("n/a"));
    }
}
