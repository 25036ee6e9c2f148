use crate::models::{CanonicalSeries, PointTag};
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a canonical series as tidy CSV with header (one row = one point).
pub fn save_csv<P: AsRef<Path>>(series: &CanonicalSeries, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        series.x_label.as_str(),
        series.y_label.as_str(),
        "segment",
        "lower_bound",
        "upper_bound",
    ))?;
    for p in &series.points {
        let segment = match p.tag {
            Some(PointTag::Historical) => Some("historical"),
            Some(PointTag::Forecast) => Some("forecast"),
            None => None,
        };
        wtr.serialize((&p.x, p.y, segment, p.lower_bound, p.upper_bound))?;
    }
    // Multi-series charts flatten to (name, x, y) rows after the main block.
    for sub in &series.series {
        for (x, y) in &sub.points {
            wtr.serialize((x, Some(*y), Some(sub.name.as_str()), None::<f64>, None::<f64>))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Save a canonical series as pretty JSON.
pub fn save_json<P: AsRef<Path>>(series: &CanonicalSeries, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(series)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
