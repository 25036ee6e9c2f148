//! Presentation selection: decide how a canonical series should be drawn.
//!
//! Selection is a pure function of the declared chart-type token, the
//! `chart_subtype` hint, and which content channels the canonical series
//! carries, in that precedence order. It also owns the mode-specific derived
//! data (pie percentages, forecast split, per-name line grouping) so the
//! renderer adapter stays a thin translation layer.

use crate::classify::classify;
use crate::models::{CanonicalSeries, PointTag, RawChartRecord};
use crate::normalize::normalize;

/// Rendering strategy for a canonical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Bar,
    Pie,
    SingleLine,
    /// Single series split into historical and forecast segments, with an
    /// optional confidence band.
    ForecastLine,
    /// Several named series, optionally sub-segmented per name.
    MultiLine,
    /// Trend + seasonal decomposition companion lines.
    Components,
    /// No stronger signal; rendered as a single line.
    Default,
}

/// One pie slice with its zero-guarded percentage of total.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// `value / sum * 100`, or `0.0` when the total is zero.
    pub percent: f64,
}

/// Whether a named sub-series is a whole line or one segment of a split pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSegment {
    Whole,
    Historical,
    Forecast,
}

/// Per-sub-series drawing plan for multi-line charts.
///
/// `base` is the series name with any historical/forecast suffix stripped;
/// segments of the same base share a color index so a product's history and
/// forecast read as one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlan {
    /// Index into `CanonicalSeries::series`.
    pub series_index: usize,
    pub base: String,
    pub segment: LineSegment,
    pub color_index: usize,
}

/// Mode-specific derived data computed at selection time.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived {
    None,
    Pie { slices: Vec<PieSlice> },
    MultiLine { lines: Vec<LinePlan> },
    Forecast { split: usize, has_band: bool },
    /// Per-point seasonal companion values, index-aligned with `points`.
    Components { seasonal: Vec<Option<f64>> },
}

/// A renderable (mode, derived-data) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub mode: PresentationMode,
    pub derived: Derived,
}

/// Selection outcome: either a drawable plan or the explicit empty state.
///
/// `NoData` is a displayable result, not an error: the caller renders a
/// deterministic "no data points" affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    NoData,
    Chart(ChartPlan),
}

/// Full pipeline result for one record.
#[derive(Debug, Clone)]
pub enum Prepared {
    /// Upstream error sentinel, short-circuited before normalization. Carries
    /// the record's own type/error fields verbatim for the error display path.
    UpstreamError {
        kind: Option<String>,
        message: Option<String>,
    },
    NoData,
    Chart {
        series: CanonicalSeries,
        plan: ChartPlan,
    },
}

/// Strip a historical/forecast suffix from a series name.
fn split_name(name: &str) -> (String, LineSegment) {
    let lower = name.to_ascii_lowercase();
    for (suffix, segment) in [
        ("_forecast", LineSegment::Forecast),
        (" (forecast)", LineSegment::Forecast),
        ("_historical", LineSegment::Historical),
        (" (historical)", LineSegment::Historical),
    ] {
        if lower.ends_with(suffix) {
            let base = name[..name.len() - suffix.len()].trim_end().to_string();
            return (base, segment);
        }
    }
    (name.to_string(), LineSegment::Whole)
}

fn pie_slices(series: &CanonicalSeries) -> Vec<PieSlice> {
    let total: f64 = series.points.iter().filter_map(|p| p.y).sum();
    series
        .points
        .iter()
        .map(|p| {
            let value = p.y.unwrap_or(0.0);
            // Zero-guarded: an all-zero pie yields 0% slices, not NaN.
            let percent = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            PieSlice {
                label: p.x.clone(),
                value,
                percent,
            }
        })
        .collect()
}

fn multi_line_plans(record: &RawChartRecord, series: &CanonicalSeries) -> Vec<LinePlan> {
    // Color by base name: declared products first, then first appearance.
    let mut bases: Vec<String> = record.products.clone().unwrap_or_default();
    let mut lines = Vec::with_capacity(series.series.len());
    for (i, sub) in series.series.iter().enumerate() {
        let (base, segment) = split_name(&sub.name);
        let color_index = match bases.iter().position(|b| *b == base) {
            Some(idx) => idx,
            None => {
                bases.push(base.clone());
                bases.len() - 1
            }
        };
        lines.push(LinePlan {
            series_index: i,
            base,
            segment,
            color_index,
        });
    }
    lines
}

fn forecast_derived(series: &CanonicalSeries) -> Derived {
    let split = series
        .points
        .iter()
        .position(|p| p.tag == Some(PointTag::Forecast))
        .unwrap_or(series.points.len());
    let has_band = series
        .points
        .iter()
        .any(|p| p.lower_bound.is_some() && p.upper_bound.is_some());
    Derived::Forecast { split, has_band }
}

/// Per-point `seasonal` companion values for decomposition charts, aligned to
/// the canonical points by index.
fn components_derived(record: &RawChartRecord, series: &CanonicalSeries) -> Derived {
    let companion = record
        .data
        .get("seasonal")
        .and_then(serde_json::Value::as_array);
    let seasonal = (0..series.points.len())
        .map(|i| {
            companion
                .and_then(|a| a.get(i))
                .and_then(serde_json::Value::as_f64)
        })
        .collect();
    Derived::Components { seasonal }
}

/// Choose the presentation for a record's canonical series.
///
/// Decision order (first match wins):
/// 1. explicit `multi_series` sub-type with populated series
/// 2. declared `pie` over label/value points
/// 3. declared `bar`
/// 4. declared `multi_line`, or the series channel being populated
/// 5. declared `line_forecast`
/// 6. declared `components` (per-point `seasonal` companion)
/// 7. fallback `Default` (single line)
///
/// A mode whose required content channel is empty reports [`Selection::NoData`]
/// instead of proceeding.
pub fn select_mode(record: &RawChartRecord, series: &CanonicalSeries) -> Selection {
    let token = record.type_token().unwrap_or("");

    // 1. The multi_series sub-type overrides whatever `type` declares.
    if record.chart_subtype.as_deref() == Some("multi_series") && !series.series.is_empty() {
        return Selection::Chart(ChartPlan {
            mode: PresentationMode::MultiLine,
            derived: Derived::MultiLine {
                lines: multi_line_plans(record, series),
            },
        });
    }

    let (mode, derived) = match token {
        // 2. Pie applies to label/value points; a pie token over a lines
        //    payload falls through to the multi-line rule below.
        "pie" if !series.points.is_empty() => (
            PresentationMode::Pie,
            Derived::Pie {
                slices: pie_slices(series),
            },
        ),
        // 3.
        "bar" => (PresentationMode::Bar, Derived::None),
        // 4. A populated series channel forces multi-line even under other
        //    tokens; only pie/bar above outrank it.
        _ if token == "multi_line" || !series.series.is_empty() => (
            PresentationMode::MultiLine,
            Derived::MultiLine {
                lines: multi_line_plans(record, series),
            },
        ),
        // 5.
        "line_forecast" => (PresentationMode::ForecastLine, forecast_derived(series)),
        // 6.
        "components" => (
            PresentationMode::Components,
            components_derived(record, series),
        ),
        // 7.
        _ => (PresentationMode::Default, Derived::None),
    };

    // Guard: a mode without its required content channel is the empty state.
    let ok = match mode {
        PresentationMode::MultiLine => !series.series.is_empty(),
        _ => !series.points.is_empty(),
    };
    if !ok {
        return Selection::NoData;
    }

    Selection::Chart(ChartPlan { mode, derived })
}

/// Run the whole pipeline for one record: error short-circuit, classify,
/// normalize, select.
pub fn prepare(record: &RawChartRecord) -> Prepared {
    if record.is_error() {
        return Prepared::UpstreamError {
            kind: record.type_token().map(str::to_string),
            message: record.error.clone(),
        };
    }
    let pie_hint = record.type_token() == Some("pie");
    let tag = classify(&record.data, pie_hint);
    let series = normalize(record, tag);
    // Unrecognized shapes surface as the empty-state display, never a fault;
    // the selector's guards handle that uniformly.
    match select_mode(record, &series) {
        Selection::NoData => Prepared::NoData,
        Selection::Chart(plan) => Prepared::Chart { series, plan },
    }
}
