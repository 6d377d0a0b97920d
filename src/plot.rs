//! Chart rendering with `plotters`.
//!
//! Two figures: a line plot of one column against another, and a 3×3 grid
//! of density histograms. Layout (axis ranges, bar geometry, titles) is
//! computed up front by plain functions; drawing is generic over the
//! backend, chosen from the output file extension.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::distribution::{histogram_bins, DistributionDescriptor};
use crate::error::{Error, Result};
use crate::frame::SeriesFrame;

/// Rows in the histogram grid.
pub const GRID_ROWS: usize = 3;
/// Columns in the histogram grid.
pub const GRID_COLS: usize = 3;

const TITLE_HEIGHT: u32 = 62;
const TITLE_LINE_HEIGHT: i32 = 18;

/// Output encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Bitmap output through `BitMapBackend`.
    Png,
    /// Vector output through `SVGBackend`.
    Svg,
}

impl ImageFormat {
    /// `.svg` (any case) selects SVG; everything else is a bitmap.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// One bar of a density histogram in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Lower bin edge.
    pub left: f64,
    /// Upper bin edge.
    pub right: f64,
    /// Density height.
    pub height: f64,
}

/// Everything needed to draw one grid cell.
#[derive(Debug, Clone)]
pub struct HistogramPanel {
    /// Name, parameters, meaning.
    pub title: [String; 3],
    /// One bar per bin, left to right.
    pub bars: Vec<Bar>,
    /// Horizontal axis span, padded past the outer edges.
    pub x_range: Range<f64>,
    /// Vertical axis top, just above the tallest bar.
    pub y_max: f64,
}

/// Lays out the density histogram of one descriptor.
///
/// # Errors
///
/// [`Error::EmptyHistogram`] when the sample cannot be binned.
pub fn histogram_panel(descriptor: &DistributionDescriptor, n_bins: usize) -> Result<HistogramPanel> {
    let bins = histogram_bins(&descriptor.data, n_bins)
        .ok_or_else(|| Error::EmptyHistogram(descriptor.name.to_string()))?;
    let density = bins.density();

    let bars: Vec<Bar> = bins
        .edges
        .windows(2)
        .zip(&density)
        .map(|(edge, &height)| Bar {
            left: edge[0],
            right: edge[1],
            height,
        })
        .collect();

    let tallest = density.iter().cloned().fold(0.0, f64::max);
    let first = bins.edges[0];
    let last = bins.edges[bins.n_bins];
    let pad = (last - first) * 0.02;

    Ok(HistogramPanel {
        title: descriptor.title_lines().map(str::to_string),
        bars,
        x_range: (first - pad)..(last + pad),
        y_max: tallest * 1.05,
    })
}

/// Padded `[min, max]` of the finite values, `-1..1` when there are none.
pub fn axis_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return -1.0..1.0;
    }
    if (hi - lo).abs() < 1e-12 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Renders `y_col` against `x_col` as a line plot.
///
/// # Errors
///
/// Missing columns, I/O failures creating the output directory, and
/// backend drawing failures.
pub fn render_series_plot(
    frame: &SeriesFrame,
    x_col: &str,
    y_col: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let x = frame.column(x_col)?;
    let y = frame.column(y_col)?;
    ensure_parent(path)?;

    let format = ImageFormat::from_path(path);
    debug!(path = %path.display(), ?format, "rendering series plot");
    match format {
        ImageFormat::Svg => draw_series_plot(SVGBackend::new(path, size).into_drawing_area(), x, y, x_col, y_col)?,
        ImageFormat::Png => draw_series_plot(BitMapBackend::new(path, size).into_drawing_area(), x, y, x_col, y_col)?,
    }

    info!(path = %path.display(), "saved series plot");
    Ok(())
}

/// Renders up to nine descriptors as a 3×3 grid, filled row by row.
///
/// # Errors
///
/// [`Error::InvalidConfig`] for more than nine descriptors,
/// [`Error::EmptyHistogram`] for a sample that cannot be binned, I/O
/// failures, and backend drawing failures.
pub fn render_distribution_grid(
    descriptors: &[DistributionDescriptor],
    n_bins: usize,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    if descriptors.len() > GRID_ROWS * GRID_COLS {
        return Err(Error::InvalidConfig(format!(
            "{} distributions do not fit a {GRID_ROWS}x{GRID_COLS} grid",
            descriptors.len()
        )));
    }
    let panels = descriptors
        .iter()
        .map(|d| histogram_panel(d, n_bins))
        .collect::<Result<Vec<_>>>()?;
    ensure_parent(path)?;

    let format = ImageFormat::from_path(path);
    debug!(path = %path.display(), ?format, panels = panels.len(), "rendering distribution grid");
    match format {
        ImageFormat::Svg => draw_distribution_grid(SVGBackend::new(path, size).into_drawing_area(), &panels)?,
        ImageFormat::Png => draw_distribution_grid(BitMapBackend::new(path, size).into_drawing_area(), &panels)?,
    }

    info!(path = %path.display(), "saved distribution grid");
    Ok(())
}

fn draw_series_plot<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    x: &[f64],
    y: &[f64],
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{y_label} vs {x_label}"), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_range(x), axis_range(y))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(render_error)?;

    let points: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    chart
        .draw_series(LineSeries::new(points, &BLUE))
        .map_err(render_error)?
        .label(y_label)
        .legend(|(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 20, ly)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

fn draw_distribution_grid<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, panels: &[HistogramPanel]) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let cells = root.split_evenly((GRID_ROWS, GRID_COLS));
    let title_style = ("sans-serif", 13).into_font().color(&BLACK);
    let fill = RGBColor(31, 119, 180);

    for (cell, panel) in cells.iter().zip(panels) {
        let (header, body) = cell.split_vertically(TITLE_HEIGHT);
        for (i, line) in panel.title.iter().enumerate() {
            header
                .draw_text(line, &title_style, (8, 4 + i as i32 * TITLE_LINE_HEIGHT))
                .map_err(render_error)?;
        }

        let mut chart = ChartBuilder::on(&body)
            .margin(8)
            .x_label_area_size(25)
            .y_label_area_size(45)
            .build_cartesian_2d(panel.x_range.clone(), 0.0..panel.y_max)
            .map_err(render_error)?;

        chart.configure_mesh().draw().map_err(render_error)?;

        chart
            .draw_series(
                panel
                    .bars
                    .iter()
                    .map(|bar| Rectangle::new([(bar.left, 0.0), (bar.right, bar.height)], fill.mix(0.7).filled())),
            )
            .map_err(render_error)?;
        chart
            .draw_series(
                panel
                    .bars
                    .iter()
                    .map(|bar| Rectangle::new([(bar.left, 0.0), (bar.right, bar.height)], BLACK.stroke_width(1))),
            )
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

fn render_error<E: fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(data: Vec<f64>) -> DistributionDescriptor {
        DistributionDescriptor {
            name: "Test",
            params: "Test (a=1)",
            meaning: "Only used in tests.",
            data,
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_path(&PathBuf::from("out/plot.svg")), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("plot.SVG")), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("plot.png")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("plot")), ImageFormat::Png);
    }

    #[test]
    fn axis_range_pads_and_skips_nan() {
        let r = axis_range(&[f64::NAN, 0.0, 10.0]);
        assert!((r.start + 0.5).abs() < 1e-12);
        assert!((r.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn axis_range_degenerate_inputs() {
        assert_eq!(axis_range(&[]), -1.0..1.0);
        assert_eq!(axis_range(&[f64::NAN]), -1.0..1.0);
        assert_eq!(axis_range(&[3.0, 3.0]), 2.0..4.0);
    }

    #[test]
    fn panel_bars_tile_the_range() {
        let data: Vec<f64> = (0..200).map(|i| (i % 40) as f64 * 0.25).collect();
        let panel = histogram_panel(&descriptor(data), 20).expect("should lay out");
        assert_eq!(panel.bars.len(), 20);
        for w in panel.bars.windows(2) {
            assert_eq!(w[0].right, w[1].left);
        }
        let area: f64 = panel.bars.iter().map(|b| (b.right - b.left) * b.height).sum();
        assert!((area - 1.0).abs() < 1e-9, "area = {area}");
        let tallest = panel.bars.iter().map(|b| b.height).fold(0.0, f64::max);
        assert!(panel.y_max > tallest);
        assert!(panel.x_range.start < panel.bars[0].left);
        assert!(panel.x_range.end > panel.bars[19].right);
    }

    #[test]
    fn panel_title_lines() {
        let panel = histogram_panel(&descriptor(vec![1.0, 2.0, 3.0]), 5).expect("should lay out");
        assert_eq!(panel.title, ["Test".to_string(), "Test (a=1)".to_string(), "Only used in tests.".to_string()]);
    }

    #[test]
    fn panel_rejects_constant_sample() {
        let err = histogram_panel(&descriptor(vec![2.0; 10]), 5).unwrap_err();
        assert!(matches!(err, Error::EmptyHistogram(name) if name == "Test"));
    }

    #[test]
    fn grid_rejects_too_many_panels() {
        let many: Vec<DistributionDescriptor> = (0..10).map(|_| descriptor(vec![1.0, 2.0, 3.0])).collect();
        let err = render_distribution_grid(&many, 10, Path::new("unused.svg"), (800, 600)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
