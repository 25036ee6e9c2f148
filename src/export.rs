//! Textual export serializers: delimited table, sparkline, printable report.
//!
//! All three are deterministic pure functions over already-normalized data;
//! the caller decides where the resulting string goes (file, printer, PDF
//! collaborator).

use crate::models::{CanonicalSeries, RawChartRecord};
use crate::stats;
use num_format::{Locale, ToFormattedString};

/// Maximum sparkline bar width in characters.
const SPARK_WIDTH: usize = 30;
/// Sparkline label column width; longer labels are truncated.
const LABEL_WIDTH: usize = 15;
/// Section separator width in the tabular export.
const RULE_WIDTH: usize = 60;

/// One chart ready for export: the raw record (title, insights) plus its
/// canonical series.
#[derive(Debug, Clone, Copy)]
pub struct ExportItem<'a> {
    pub record: &'a RawChartRecord,
    pub series: &'a CanonicalSeries,
}

/// Format a value for human-readable blocks, `NA` for missing.
fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

/// Locale-aware whole-number formatting for report stat cells.
fn fmt_grouped(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            if x.abs() >= 1000.0 {
                (x.round() as i64).to_formatted_string(&Locale::en)
            } else {
                fmt_value(Some(x))
            }
        }
        _ => "NA".to_string(),
    }
}

fn truncate_label(label: &str) -> String {
    label.chars().take(LABEL_WIDTH).collect()
}

/// Render a fixed-width textual bar chart of the given points.
///
/// Bars are normalized with `(value - min) / (max - min)` onto 1..=30
/// characters; a degenerate range (`max == min`, e.g. a single point) emits a
/// single-character bar rather than dividing by zero. Missing values print an
/// `NA` marker. Output is byte-identical for identical input.
pub fn sparkline(points: &[crate::models::SeriesPoint], title: &str) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    if points.is_empty() {
        out.push_str("(no data points)\n");
        return out;
    }

    let values: Vec<f64> = points.iter().filter_map(|p| p.y).collect();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    for p in points {
        let label = truncate_label(&p.x);
        match p.y {
            Some(v) => {
                let len = if !span.is_finite() || span.abs() < f64::EPSILON {
                    1
                } else {
                    1 + ((v - min) / span * (SPARK_WIDTH - 1) as f64).round() as usize
                };
                out.push_str(&format!(
                    "{:>width$} | {} {}\n",
                    label,
                    "█".repeat(len.min(SPARK_WIDTH)),
                    fmt_value(Some(v)),
                    width = LABEL_WIDTH
                ));
            }
            None => {
                out.push_str(&format!("{:>width$} | NA\n", label, width = LABEL_WIDTH));
            }
        }
    }
    out
}

/// Escape a value for the comma-delimited block: commas inside labels are
/// substituted with semicolons. Simple and lossy, but keeps the format free
/// of quoting rules.
fn csv_escape(field: &str) -> String {
    field.replace(',', ";")
}

/// Insight sections for one record in emission priority order.
///
/// The newer narrative fields win outright; the legacy description (or the
/// even older free-text `insights`) appears only when all newer fields are
/// absent. The two generations are never mixed.
pub fn insight_sections(record: &RawChartRecord) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if let Some(n) = &record.narrative_insights {
        if n.has_current_fields() {
            for (heading, text) in [
                ("Analysis", &n.conversational_analysis),
                ("Personalized Insight", &n.personalized_insight),
                ("Actionable Advice", &n.actionable_advice),
                ("Business Impact", &n.business_impact),
            ] {
                if let Some(t) = text {
                    out.push((heading, t.clone()));
                }
            }
            return out;
        }
        if let Some(t) = &n.business_description {
            out.push(("Description", t.clone()));
            return out;
        }
    }
    if let Some(t) = &record.insights {
        out.push(("Insights", t.clone()));
    }
    out
}

/// Build the delimited tabular export for a batch of charts.
///
/// One section per chart: a `=` rule, a header block, the sparkline, a
/// row-per-point CSV block headed by the chart's axis labels, then any insight
/// free text. Suitable for saving with a `.csv` extension.
pub fn build_table(items: &[ExportItem<'_>]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&"=".repeat(RULE_WIDTH));
        out.push('\n');
        out.push_str(&format!("Title: {}\n", item.record.title()));
        if let Some(t) = item.record.type_token() {
            out.push_str(&format!("Type: {}\n", t));
        }
        if let Some(d) = &item.record.brief_description {
            out.push_str(&format!("Description: {}\n", d));
        }
        if item.series.truncated {
            out.push_str("Note: source arrays had unequal lengths; truncated\n");
        }
        out.push('\n');
        out.push_str(&sparkline(&item.series.points, item.record.title()));
        out.push('\n');

        out.push_str(&format!(
            "{},{}\n",
            csv_escape(&item.series.x_label),
            csv_escape(&item.series.y_label)
        ));
        for p in &item.series.points {
            out.push_str(&format!("{},{}\n", csv_escape(&p.x), fmt_value(p.y)));
        }
        for sub in &item.series.series {
            out.push_str(&format!("\nSeries: {}\n", csv_escape(&sub.name)));
            for (x, y) in &sub.points {
                out.push_str(&format!("{},{}\n", csv_escape(x), fmt_value(Some(*y))));
            }
        }

        for (heading, text) in insight_sections(item.record) {
            out.push_str(&format!("\n{}: {}\n", heading, text));
        }
        out.push('\n');
    }
    out
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build a static, self-contained printable HTML report.
///
/// Charts appear in input order. Absent optional insight fields simply omit
/// their section with no placeholder text. The document carries its own inline
/// stylesheet so it can be handed directly to a print/save-as-PDF collaborator.
pub fn build_report(items: &[ExportItem<'_>], doc: &crate::models::AnalysisDocument) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{} — Analytics Report</title>\n",
        html_escape(doc.dataset_name())
    ));
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; color: #222; }\n\
         h1 { border-bottom: 2px solid #4472c4; padding-bottom: 0.3em; }\n\
         .chart { page-break-inside: avoid; margin-bottom: 2.5em; }\n\
         .meta { color: #666; font-size: 0.9em; }\n\
         table { border-collapse: collapse; margin: 0.8em 0; }\n\
         th, td { border: 1px solid #bbb; padding: 0.3em 0.8em; text-align: left; }\n\
         th { background: #eef2fa; }\n\
         .insight h4 { margin-bottom: 0.2em; }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!(
        "<h1>{}</h1>\n",
        html_escape(doc.dataset_name())
    ));
    if let Some(ts) = &doc.generated_at {
        html.push_str(&format!(
            "<p class=\"meta\">Generated: {}</p>\n",
            html_escape(ts)
        ));
    }

    for item in items {
        html.push_str("<div class=\"chart\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(item.record.title())));
        if let Some(t) = item.record.type_token() {
            html.push_str(&format!(
                "<p class=\"meta\">Chart type: {}</p>\n",
                html_escape(t)
            ));
        }
        if let Some(d) = &item.record.brief_description {
            html.push_str(&format!("<p>{}</p>\n", html_escape(d)));
        }

        let summary = stats::summarize(item.series);
        if summary.count > 0 {
            html.push_str(
                "<table><tr><th>Points</th><th>Missing</th><th>Min</th>\
                 <th>Max</th><th>Mean</th><th>Median</th></tr>\n",
            );
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                summary.count,
                summary.missing,
                fmt_grouped(summary.min),
                fmt_grouped(summary.max),
                fmt_grouped(summary.mean),
                fmt_grouped(summary.median),
            ));
            html.push_str("</table>\n");
        }

        if !item.series.points.is_empty() {
            html.push_str(&format!(
                "<table><tr><th>{}</th><th>{}</th></tr>\n",
                html_escape(&item.series.x_label),
                html_escape(&item.series.y_label)
            ));
            for p in &item.series.points {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&p.x),
                    fmt_grouped(p.y)
                ));
            }
            html.push_str("</table>\n");
        }

        for (heading, text) in insight_sections(item.record) {
            html.push_str(&format!(
                "<div class=\"insight\"><h4>{}</h4><p>{}</p></div>\n",
                heading,
                html_escape(&text)
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesPoint;

    #[test]
    fn comma_substitution_in_labels() {
        assert_eq!(csv_escape("a, b"), "a; b");
    }

    #[test]
    fn value_formatting_trims_zeros() {
        assert_eq!(fmt_value(Some(10.0)), "10");
        assert_eq!(fmt_value(Some(2.5)), "2.5");
        assert_eq!(fmt_value(None), "NA");
    }

    #[test]
    fn sparkline_missing_value_prints_na() {
        let points = vec![
            SeriesPoint::new("A", Some(1.0)),
            SeriesPoint::new("B", None),
        ];
        let text = sparkline(&points, "t");
        assert!(text.lines().any(|l| l.ends_with("| NA")));
    }
}
