//! Conversion of a classified raw payload into the canonical series.
//!
//! One function per shape would invite drift; instead [`normalize`] is a
//! single exhaustive match over [`ShapeTag`] so the compiler guarantees every
//! recognized shape has a conversion rule. The function never fails: any
//! internal inconsistency degrades to the explicit empty series.

use crate::classify::ShapeTag;
use crate::models::{CanonicalSeries, NamedSeries, PointTag, RawChartRecord, SeriesPoint};
use serde_json::Value;

/// Render a JSON value as a categorical/date axis label.
fn label_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            // Whole numbers print without a trailing ".0" (years, months...).
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Extract a numeric value, tolerating the upstream's habit of serializing
/// numbers as strings. Nulls and non-numerics propagate as `None`.
fn num_of(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn arr<'a>(data: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    data.get(key).and_then(Value::as_array)
}

/// Default axis labels per shape; `data.x_label`/`data.y_label` override.
fn default_labels(tag: ShapeTag) -> (&'static str, &'static str) {
    match tag {
        ShapeTag::DateSalesPair | ShapeTag::HistoricalForecastPair | ShapeTag::XLinesMultiSeries => {
            ("Date", "Value")
        }
        _ => ("Category", "Value"),
    }
}

/// Zip two paired arrays into points, truncating to the shorter side when the
/// lengths disagree. The truncation is a documented lossy policy, reported
/// through the returned flag rather than an error.
fn zip_pair(xs: &[Value], ys: &[Value], tag: Option<PointTag>) -> (Vec<SeriesPoint>, bool) {
    let n = xs.len().min(ys.len());
    let truncated = xs.len() != ys.len();
    if truncated {
        log::warn!(
            "paired arrays of unequal length ({} vs {}), truncating to {}",
            xs.len(),
            ys.len(),
            n
        );
    }
    let points = xs
        .iter()
        .zip(ys.iter())
        .take(n)
        .map(|(x, y)| SeriesPoint {
            x: label_of(x),
            y: num_of(y),
            tag,
            lower_bound: None,
            upper_bound: None,
        })
        .collect();
    (points, truncated)
}

/// Pass-through for arrays whose elements already look like `{x, y}` objects.
/// A single malformed element rejects the whole array; conversions are never
/// partial.
fn points_from_xy_objects(items: &[Value]) -> Option<Vec<SeriesPoint>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let obj = item.as_object()?;
        if !obj.contains_key("x") || !obj.contains_key("y") {
            return None;
        }
        out.push(SeriesPoint::new(label_of(&obj["x"]), num_of(&obj["y"])));
    }
    Some(out)
}

/// Convert a raw record and its shape tag into the canonical series.
///
/// Never panics and never returns an error: unrecognized or inconsistent
/// payloads yield an empty series so callers can render a deterministic
/// "no data" affordance.
pub fn normalize(record: &RawChartRecord, tag: ShapeTag) -> CanonicalSeries {
    let data = &record.data;
    let (dx, dy) = default_labels(tag);
    let x_label = data
        .get("x_label")
        .and_then(Value::as_str)
        .unwrap_or(dx)
        .to_string();
    let y_label = data
        .get("y_label")
        .and_then(Value::as_str)
        .unwrap_or(dy)
        .to_string();

    let mut out = CanonicalSeries::empty(&x_label, &y_label);

    match tag {
        ShapeTag::DateSalesPair => {
            if let (Some(xs), Some(ys)) = (arr(data, "date"), arr(data, "sales")) {
                (out.points, out.truncated) = zip_pair(xs, ys, None);
            }
        }
        ShapeTag::CategorySalesPair => {
            if let (Some(xs), Some(ys)) = (arr(data, "category"), arr(data, "sales")) {
                (out.points, out.truncated) = zip_pair(xs, ys, None);
            }
        }
        ShapeTag::XYPair => {
            if let (Some(xs), Some(ys)) = (arr(data, "x"), arr(data, "y")) {
                (out.points, out.truncated) = zip_pair(xs, ys, None);
            }
        }
        ShapeTag::LabelsValuesPair => {
            if let (Some(xs), Some(ys)) = (arr(data, "labels"), arr(data, "values")) {
                (out.points, out.truncated) = zip_pair(xs, ys, None);
            }
        }
        ShapeTag::XLinesMultiSeries => {
            if let (Some(xs), Some(lines)) = (
                arr(data, "x"),
                data.get("lines").and_then(Value::as_object),
            ) {
                // One named sub-series per key, in source order. Missing values
                // zero-fill so multi-line charts stay visually continuous.
                for (name, values) in lines {
                    let vals = values.as_array().map(Vec::as_slice).unwrap_or(&[]);
                    let points = xs
                        .iter()
                        .enumerate()
                        .map(|(i, x)| {
                            let y = vals.get(i).and_then(num_of).unwrap_or(0.0);
                            (label_of(x), y)
                        })
                        .collect();
                    out.series.push(NamedSeries {
                        name: name.clone(),
                        points,
                    });
                }
            }
        }
        ShapeTag::HistoricalForecastPair => {
            let hist = data.get("historical");
            let fore = data.get("forecast");
            if let (Some(hx), Some(hy)) = (
                hist.and_then(|h| arr(h, "x")),
                hist.and_then(|h| arr(h, "y")),
            ) {
                let (points, truncated) = zip_pair(hx, hy, Some(PointTag::Historical));
                out.points = points;
                out.truncated = truncated;
            }
            if let (Some(fx), Some(fy)) = (
                fore.and_then(|f| arr(f, "x")),
                fore.and_then(|f| arr(f, "y")),
            ) {
                let (mut points, truncated) = zip_pair(fx, fy, Some(PointTag::Forecast));
                out.truncated |= truncated;
                let lo = fore.and_then(|f| arr(f, "lower_bound"));
                let hi = fore.and_then(|f| arr(f, "upper_bound"));
                for (i, p) in points.iter_mut().enumerate() {
                    p.lower_bound = lo.and_then(|a| a.get(i)).and_then(num_of);
                    p.upper_bound = hi.and_then(|a| a.get(i)).and_then(num_of);
                }
                out.points.append(&mut points);
            }
        }
        ShapeTag::BareArray => {
            if let Some(items) = data.as_array()
                && let Some(points) = points_from_xy_objects(items)
            {
                out.points = points;
            }
        }
        ShapeTag::NestedArray => {
            if let Some(items) = arr(data, "data")
                && let Some(points) = points_from_xy_objects(items)
            {
                out.points = points;
            }
        }
        // A nested non-array object has no defined conversion; empty series.
        ShapeTag::NestedObject | ShapeTag::Empty => {}
    }

    out
}
