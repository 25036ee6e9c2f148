use chartkit::models::{CanonicalSeries, NamedSeries, PointTag, SeriesPoint};
use chartkit::storage::{save_csv, save_json};
use std::fs;
use tempfile::tempdir;

fn forecast_series() -> CanonicalSeries {
    let mut hist = SeriesPoint::new("Jan", Some(10.0));
    hist.tag = Some(PointTag::Historical);
    let mut fore = SeriesPoint::new("Feb", Some(12.0));
    fore.tag = Some(PointTag::Forecast);
    fore.lower_bound = Some(11.0);
    fore.upper_bound = Some(13.0);
    CanonicalSeries {
        points: vec![hist, fore],
        x_label: "Month".into(),
        y_label: "Sales".into(),
        ..Default::default()
    }
}

#[test]
fn csv_carries_segment_and_bounds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("series.csv");
    save_csv(&forecast_series(), &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Month,Sales,segment,lower_bound,upper_bound"
    );
    assert_eq!(lines.next().unwrap(), "Jan,10.0,historical,,");
    assert_eq!(lines.next().unwrap(), "Feb,12.0,forecast,11.0,13.0");
}

#[test]
fn csv_flattens_sub_series_after_points() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("multi.csv");
    let series = CanonicalSeries {
        series: vec![NamedSeries {
            name: "alpha".into(),
            points: vec![("a".into(), 1.0)],
        }],
        x_label: "X".into(),
        y_label: "Y".into(),
        ..Default::default()
    };
    save_csv(&series, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.lines().any(|l| l == "a,1.0,alpha,,"));
}

#[test]
fn json_round_trips_the_series() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("series.json");
    let series = forecast_series();
    save_json(&series, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let back: CanonicalSeries = serde_json::from_str(&text).unwrap();
    assert_eq!(back, series);
}
