use crate::models::CanonicalSeries;
use serde::{Deserialize, Serialize};

/// Summary statistics for one chart's plotted values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

fn summarize_values(mut vals: Vec<f64>, missing: usize) -> Summary {
    // Values are pre-filtered to finite floats, so total order holds.
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        missing,
        min,
        max,
        mean,
        median,
    }
}

/// Compute summary statistics over a canonical series.
///
/// Single-series charts summarize `points` (null values count as missing);
/// multi-series charts summarize across all named sub-series.
pub fn summarize(series: &CanonicalSeries) -> Summary {
    if !series.series.is_empty() {
        let vals: Vec<f64> = series
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .filter(|v| v.is_finite())
            .collect();
        return summarize_values(vals, 0);
    }
    let mut vals = Vec::with_capacity(series.points.len());
    let mut missing = 0usize;
    for p in &series.points {
        match p.y {
            Some(v) if v.is_finite() => vals.push(v),
            _ => missing += 1,
        }
    }
    summarize_values(vals, missing)
}
