//! Structural classification of a raw chart payload.
//!
//! The analytics backend has no single schema contract: a "trend over time"
//! may arrive as `{date, sales}`, `{x, y}`, `{lines: {...}}`,
//! `{historical, forecast}`, `{labels, values}` or a bare array. Classification
//! assigns exactly one [`ShapeTag`] per payload so that the normalizer can be
//! an exhaustive match.

use serde_json::Value;

/// Which structural dialect a record's `data` payload matches.
///
/// Closed union: every recognized shape has one variant, and anything
/// unrecognized maps to [`ShapeTag::Empty`]. Classification never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeTag {
    /// Paired `date` + `sales` arrays.
    DateSalesPair,
    /// Paired `category` + `sales` arrays.
    CategorySalesPair,
    /// Paired `x` + `y` arrays.
    XYPair,
    /// `x` array plus a `lines` object-of-arrays (one key per sub-series).
    XLinesMultiSeries,
    /// `historical` + `forecast` objects, each itself an x/y pair; forecast
    /// optionally carries `lower_bound`/`upper_bound`.
    HistoricalForecastPair,
    /// The payload itself is an array.
    BareArray,
    /// Object whose `data` field holds an array.
    NestedArray,
    /// Object whose `data` field holds a non-array object.
    NestedObject,
    /// `labels` + `values` arrays, only meaningful under a declared pie type.
    LabelsValuesPair,
    /// Nothing recognized; normalizes to the explicit empty series.
    Empty,
}

fn has_array(obj: &serde_json::Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Array(_)))
}

fn has_object(obj: &serde_json::Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Object(_)))
}

/// Classify a raw `data` payload.
///
/// `pie_hint` is true when the record's declared chart type is `"pie"`; the
/// `labels`/`values` shape is ambiguous without it and is only recognized
/// relative to that declaration.
///
/// The checks below run in a deliberate precedence order; several shapes can
/// satisfy weaker predicates at once (e.g. an object carrying both `x`/`y`
/// and `lines`), and the first match wins. Reordering changes behavior.
pub fn classify(data: &Value, pie_hint: bool) -> ShapeTag {
    match data {
        // 6. a bare array payload
        Value::Array(_) => ShapeTag::BareArray,
        Value::Object(obj) => {
            // 1. date/sales pair
            if has_array(obj, "date") && has_array(obj, "sales") {
                ShapeTag::DateSalesPair
            // 2. category/sales pair
            } else if has_array(obj, "category") && has_array(obj, "sales") {
                ShapeTag::CategorySalesPair
            // 3. plain x/y pair
            } else if has_array(obj, "x") && has_array(obj, "y") {
                ShapeTag::XYPair
            // 4. x domain + named lines
            } else if has_array(obj, "x") && has_object(obj, "lines") {
                ShapeTag::XLinesMultiSeries
            // 5. historical/forecast split
            } else if has_object(obj, "historical") && has_object(obj, "forecast") {
                ShapeTag::HistoricalForecastPair
            // 7. nested `data` array
            } else if has_array(obj, "data") {
                ShapeTag::NestedArray
            // 8. nested `data` object (best effort; normalizes to empty)
            } else if has_object(obj, "data") {
                ShapeTag::NestedObject
            // 9. labels/values, only under the declared pie type
            } else if pie_hint && has_array(obj, "labels") && has_array(obj, "values") {
                ShapeTag::LabelsValuesPair
            } else {
                ShapeTag::Empty
            }
        }
        // 10. null / scalar / string payloads carry no plottable structure
        _ => ShapeTag::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn precedence_prefers_xy_over_lines() {
        // An object satisfying both the x/y and x/lines predicates must take
        // the earlier branch.
        let data = json!({"x": [1, 2], "y": [3, 4], "lines": {"a": [1, 2]}});
        assert_eq!(classify(&data, false), ShapeTag::XYPair);
    }

    #[test]
    fn labels_values_requires_pie_hint() {
        let data = json!({"labels": ["a"], "values": [1]});
        assert_eq!(classify(&data, false), ShapeTag::Empty);
        assert_eq!(classify(&data, true), ShapeTag::LabelsValuesPair);
    }

    #[test]
    fn null_is_empty() {
        assert_eq!(classify(&Value::Null, false), ShapeTag::Empty);
        assert_eq!(classify(&json!("text"), true), ShapeTag::Empty);
    }
}
