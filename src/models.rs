use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chart record as received from the external analytics engine.
///
/// The upstream backend is loosely specified: the same logical concept arrives
/// under different field spellings depending on which analytics sub-routine
/// produced it. Every field is therefore optional and defaulted; the `data`
/// payload stays an opaque [`Value`] until classified by [`crate::classify`].
///
/// Records are read-only inputs; the pipeline never mutates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChartRecord {
    pub title: Option<String>,
    /// Declared chart-type token (e.g. "pie", "bar", "line_forecast").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Alternate token some generation paths use instead of `type`.
    pub chart_type: Option<String>,
    /// Sub-type hint, e.g. "multi_series".
    pub chart_subtype: Option<String>,
    /// Shape-ambiguous payload; see `classify` for the recognized dialects.
    pub data: Value,
    /// `"error"` marks an upstream failure record that must not be normalized.
    pub status: Option<String>,
    pub error: Option<String>,
    pub narrative_insights: Option<NarrativeInsights>,
    /// Legacy free-text insight, superseded by `narrative_insights`.
    pub insights: Option<String>,
    pub brief_description: Option<String>,
    /// Series names for multi-line charts, in display order.
    pub products: Option<Vec<String>>,
}

impl RawChartRecord {
    /// Display title, defaulting when the upstream omitted one.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Chart")
    }

    /// The effective chart-type token: `type` wins over `chart_type`.
    pub fn type_token(&self) -> Option<&str> {
        self.kind.as_deref().or(self.chart_type.as_deref())
    }

    /// True when the record is an upstream error sentinel.
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Structured business-intelligence text attached to a chart.
///
/// The four newer fields supersede the legacy `business_description`; exports
/// emit either the newer set or the legacy one, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeInsights {
    pub conversational_analysis: Option<String>,
    pub personalized_insight: Option<String>,
    pub actionable_advice: Option<String>,
    pub business_impact: Option<String>,
    /// Older insight shape, used only when all newer fields are absent.
    pub business_description: Option<String>,
}

impl NarrativeInsights {
    /// Any of the newer-generation fields present?
    pub fn has_current_fields(&self) -> bool {
        self.conversational_analysis.is_some()
            || self.personalized_insight.is_some()
            || self.actionable_advice.is_some()
            || self.business_impact.is_some()
    }
}

/// The outer analytics-result document: dataset metadata plus the chart batch.
///
/// The domain/anomaly/predictive sections are opaque pass-through for report
/// inclusion; this crate never reinterprets them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDocument {
    pub dataset_name: Option<String>,
    pub generated_at: Option<String>,
    pub charts: Vec<RawChartRecord>,
    pub domain_detection: Value,
    pub anomaly_summary: Value,
    pub predictive_metrics: Value,
}

impl AnalysisDocument {
    pub fn dataset_name(&self) -> &str {
        self.dataset_name.as_deref().unwrap_or("dataset")
    }
}

/// Historical/forecast marker on a canonical point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointTag {
    Historical,
    Forecast,
}

/// One plotted observation after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: String,
    pub y: Option<f64>,
    pub tag: Option<PointTag>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

impl SeriesPoint {
    pub fn new(x: impl Into<String>, y: Option<f64>) -> Self {
        Self {
            x: x.into(),
            y,
            tag: None,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

/// One named sub-series of a multi-series chart, sharing the parent x domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

/// The single normalized representation every downstream consumer reads.
///
/// `points` and `series` are mutually exclusive content channels: multi-series
/// charts populate `series` and leave `points` empty. Point order is preserved
/// from the source and significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeries {
    pub points: Vec<SeriesPoint>,
    pub series: Vec<NamedSeries>,
    pub x_label: String,
    pub y_label: String,
    /// Set when paired source arrays had unequal lengths and the conversion
    /// truncated to the shorter side (documented lossy policy).
    pub truncated: bool,
}

impl CanonicalSeries {
    /// Empty series with the given axis labels, the explicit "no data" value.
    pub fn empty(x_label: &str, y_label: &str) -> Self {
        Self {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.series.is_empty()
    }

    /// All numeric values across both content channels, bounds included.
    /// Renderers derive the y range from this.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        let mut take = |v: f64| {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                seen = true;
            }
        };
        for p in &self.points {
            if let Some(y) = p.y {
                take(y);
            }
            if let Some(lo) = p.lower_bound {
                take(lo);
            }
            if let Some(hi) = p.upper_bound {
                take(hi);
            }
        }
        for s in &self.series {
            for (_, y) in &s.points {
                take(*y);
            }
        }
        seen.then_some((min, max))
    }
}
