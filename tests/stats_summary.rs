use chartkit::models::{CanonicalSeries, NamedSeries, SeriesPoint};
use chartkit::stats::summarize;

fn series_from(values: &[Option<f64>]) -> CanonicalSeries {
    CanonicalSeries {
        points: values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(format!("p{i}"), *v))
            .collect(),
        x_label: "X".into(),
        y_label: "Y".into(),
        ..Default::default()
    }
}

#[test]
fn summarizes_plain_values() {
    let s = summarize(&series_from(&[Some(1.0), Some(3.0), Some(2.0)]));
    assert_eq!(s.count, 3);
    assert_eq!(s.missing, 0);
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.max, Some(3.0));
    assert_eq!(s.mean, Some(2.0));
    assert_eq!(s.median, Some(2.0));
}

#[test]
fn even_count_median_averages_the_middle_pair() {
    let s = summarize(&series_from(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]));
    assert_eq!(s.median, Some(2.5));
}

#[test]
fn missing_values_are_counted_not_summarized() {
    let s = summarize(&series_from(&[Some(10.0), None, Some(20.0), None]));
    assert_eq!(s.count, 2);
    assert_eq!(s.missing, 2);
    assert_eq!(s.mean, Some(15.0));
}

#[test]
fn empty_series_yields_all_none() {
    let s = summarize(&CanonicalSeries::default());
    assert_eq!(s.count, 0);
    assert_eq!(s.min, None);
    assert_eq!(s.max, None);
    assert_eq!(s.mean, None);
    assert_eq!(s.median, None);
}

#[test]
fn multi_series_summarizes_across_all_sub_series() {
    let series = CanonicalSeries {
        series: vec![
            NamedSeries {
                name: "a".into(),
                points: vec![("x".into(), 1.0), ("y".into(), 2.0)],
            },
            NamedSeries {
                name: "b".into(),
                points: vec![("x".into(), 9.0)],
            },
        ],
        x_label: "X".into(),
        y_label: "Y".into(),
        ..Default::default()
    };
    let s = summarize(&series);
    assert_eq!(s.count, 3);
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.max, Some(9.0));
    assert_eq!(s.mean, Some(4.0));
}
