//! # u-statlab
//!
//! Correlation checks on lagged time series and sampling of the
//! distributions that show up in manufacturing data.
//!
//! ## Modules
//!
//! - [`correlation`]: Pearson, Spearman and Kendall tau-b coefficients, pairwise-complete matrices, point-biserial, ACF/PACF
//! - [`frame`]: named equal-length columns, row shifting, labelled correlation tables
//! - [`lagged`]: time-lagged correlation sweeps and strongest-shift selection
//! - [`signal`]: noisy lagged sine-wave generator
//! - [`distribution`]: density histograms, sample summaries, the manufacturing distribution catalog
//! - [`report`]: console text for both demos
//! - [`plot`]: line plot and histogram grid rendering
//! - [`config`]: demo settings and RNG construction
//!
//! ## Binaries
//!
//! - `correlation_check`: zero-lag tables, the lag sweep and an `x`/`y` plot
//! - `manufacturing_distributions`: nine sampled distributions in a 3×3 grid
//!
//! Statistics return `Option` when undefined for the input; fallible
//! operations return [`Result`].

pub mod config;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod frame;
pub mod lagged;
pub mod plot;
pub mod report;
pub mod signal;

pub use error::{Error, Result};

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the `tracing` subscriber used by the binaries.
///
/// `RUST_LOG` overrides the default `info` filter. Output goes to stderr so
/// it never interleaves with the reports on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
