//! Duration vs throughput scatter plot
//!
//! Rendering is split in two so the interesting part is testable without
//! looking at image bytes:
//!
//! 1. [`ScatterSpec::build`] turns records, baseline and classifications
//!    into the exact points, ranges, reference lines and annotation that
//!    will be drawn.
//! 2. [`render_svg`] hands that spec to the `plotters` SVG backend.
//!
//! [`render_plot`] does both and writes the image atomically.

use crate::baseline::Baseline;
use crate::classify::{Classification, ClassificationMap};
use crate::error::{AnalysisError, Result};
use crate::persist;
use crate::record::RecordSet;
use crate::report::{self, compact, MetricLabels};
use plotters::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Fraction of the data extent added on each side of an axis
const AXIS_PADDING: f64 = 0.1;

/// Annotation anchor as a fraction of the padded x / y extent
const ANNOTATION_ANCHOR: (f64, f64) = (0.6, 0.8);

/// Plot appearance options
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterOptions {
    pub width: u32,
    pub height: u32,
    /// Chart title; defaults to "<throughput> vs <duration> Relationship"
    pub title: Option<String>,
    pub labels: MetricLabels,
    /// Overlay the aggregate summary block inside the plot
    pub annotate: bool,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: None,
            labels: MetricLabels::default(),
            annotate: false,
        }
    }
}

/// One run's point: x = duration, y = throughput
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub run_id: String,
    pub x: f64,
    pub y: f64,
    /// Color group index; one group per distinct run id
    pub series: usize,
    pub classification: Classification,
}

/// Baseline mean drawn across the plot
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub caption: String,
}

/// Multi-line text placed in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}

/// Everything the backend draws
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Horizontal line at the mean throughput
    pub mean_throughput: ReferenceLine,
    /// Vertical line at the mean duration
    pub mean_duration: ReferenceLine,
    /// Color and legend points per run id (more than one run id present)
    pub grouped: bool,
    pub annotation: Option<Annotation>,
}

impl ScatterSpec {
    pub fn build(
        records: &RecordSet,
        baseline: &Baseline,
        classifications: &ClassificationMap,
        options: &ScatterOptions,
    ) -> Self {
        let labels = &options.labels;

        let mut series_of: HashMap<&str, usize> = HashMap::new();
        let points: Vec<ScatterPoint> = records
            .iter()
            .map(|r| {
                let next = series_of.len();
                let series = *series_of.entry(r.run_id.as_str()).or_insert(next);
                ScatterPoint {
                    run_id: r.run_id.clone(),
                    x: r.duration,
                    y: r.throughput,
                    series,
                    classification: classifications.get(&r.run_id),
                }
            })
            .collect();
        let grouped = series_of.len() > 1;

        let x_range = padded_range(baseline.min_duration, baseline.max_duration);
        let y_range = padded_range(baseline.min_throughput, baseline.max_throughput);

        let annotation = options.annotate.then(|| Annotation {
            x: x_range.0 + ANNOTATION_ANCHOR.0 * (x_range.1 - x_range.0),
            y: y_range.0 + ANNOTATION_ANCHOR.1 * (y_range.1 - y_range.0),
            lines: report::render_aggregate(baseline, classifications, labels)
                .lines()
                .map(str::to_string)
                .collect(),
        });

        Self {
            width: options.width,
            height: options.height,
            title: options.title.clone().unwrap_or_else(|| {
                format!("{} vs {} Relationship", labels.throughput, labels.duration)
            }),
            x_label: labels.duration.clone(),
            y_label: labels.throughput.clone(),
            points,
            x_range,
            y_range,
            mean_throughput: ReferenceLine {
                value: baseline.mean_throughput,
                caption: format!(
                    "Mean {} ({})",
                    labels.throughput,
                    compact(baseline.mean_throughput)
                ),
            },
            mean_duration: ReferenceLine {
                value: baseline.mean_duration,
                caption: format!("Mean {} ({})", labels.duration, compact(baseline.mean_duration)),
            },
            grouped,
            annotation,
        }
    }

    /// Number of color groups
    pub fn series_count(&self) -> usize {
        self.points.iter().map(|p| p.series + 1).max().unwrap_or(0)
    }
}

/// Axis range covering `[min, max]` plus padding on both sides
///
/// A zero-width extent (single run, or identical values) is widened by a
/// fraction of the value itself so the point is not drawn on the frame.
/// Bounds and width stay finite even for values near `f64::MAX`.
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let extent = max - min;
    let pad = if extent > 0.0 {
        extent * AXIS_PADDING
    } else if min != 0.0 {
        min.abs() * AXIS_PADDING
    } else {
        1.0
    };
    let pad = pad.min((f64::MAX - extent) / 4.0);
    ((min - pad).max(f64::MIN), (max + pad).min(f64::MAX))
}

fn check_range(axis: &str, (start, end): (f64, f64)) -> Result<()> {
    if start.is_finite() && end.is_finite() && (end - start).is_finite() && start < end {
        Ok(())
    } else {
        Err(AnalysisError::PlotDrawing(format!(
            "{} axis range [{}, {}] cannot be drawn",
            axis, start, end
        )))
    }
}

fn drawing<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::PlotDrawing(e.to_string())
}

/// Render a spec to an SVG document
pub fn render_svg(spec: &ScatterSpec) -> Result<String> {
    check_range("x", spec.x_range)?;
    check_range("y", spec.y_range)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(spec.x_range.0..spec.x_range.1, spec.y_range.0..spec.y_range.1)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .draw()
            .map_err(drawing)?;

        for series in 0..spec.series_count() {
            let color = Palette99::pick(series).to_rgba();
            let members: Vec<&ScatterPoint> =
                spec.points.iter().filter(|p| p.series == series).collect();
            let name = members
                .first()
                .map(|p| p.run_id.clone())
                .unwrap_or_default();

            let drawn = chart
                .draw_series(members.iter().map(|p| {
                    EmptyElement::at((p.x, p.y))
                        + Circle::new((0, 0), 5, color.filled())
                        + Text::new(
                            p.run_id.clone(),
                            (8, -14),
                            ("sans-serif", 12).into_font(),
                        )
                }))
                .map_err(drawing)?;
            if spec.grouped {
                drawn
                    .label(name)
                    .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
            }
        }

        let (x0, x1) = spec.x_range;
        let (y0, y1) = spec.y_range;
        let h = &spec.mean_throughput;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x0, h.value), (x1, h.value)],
                RED.stroke_width(2),
            )))
            .map_err(drawing)?
            .label(h.caption.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        let v = &spec.mean_duration;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(v.value, y0), (v.value, y1)],
                BLUE.stroke_width(2),
            )))
            .map_err(drawing)?
            .label(v.caption.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        if let Some(a) = &spec.annotation {
            let font = ("sans-serif", 14).into_font();
            chart
                .draw_series(a.lines.iter().enumerate().map(|(i, line)| {
                    EmptyElement::at((a.x, a.y))
                        + Text::new(line.clone(), (0, i as i32 * 18), font.clone())
                }))
                .map_err(drawing)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
    }
    Ok(svg)
}

/// Build, render, and write the scatter plot to `output_target`
///
/// # Errors
///
/// [`AnalysisError::RenderTarget`] when the target's parent directory does
/// not exist or the file cannot be written. No partial file is left behind
/// in either case.
pub fn render_plot(
    records: &RecordSet,
    baseline: &Baseline,
    classifications: &ClassificationMap,
    options: &ScatterOptions,
    output_target: &Path,
) -> Result<()> {
    let parent = persist::parent_dir(output_target);
    if !parent.is_dir() {
        return Err(AnalysisError::RenderTarget {
            path: output_target.to_path_buf(),
            reason: format!("parent directory {} does not exist", parent.display()),
        });
    }

    let spec = ScatterSpec::build(records, baseline, classifications, options);
    let svg = render_svg(&spec)?;

    persist::write_atomic(output_target, svg.as_bytes()).map_err(|e| {
        AnalysisError::RenderTarget {
            path: output_target.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    debug!(
        path = %output_target.display(),
        points = spec.points.len(),
        annotated = spec.annotation.is_some(),
        "wrote scatter plot"
    );
    Ok(())
}
