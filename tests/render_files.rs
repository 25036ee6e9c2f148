use chartkit::models::{CanonicalSeries, NamedSeries, PointTag, SeriesPoint};
use chartkit::present::{ChartPlan, Derived, LinePlan, LineSegment, PieSlice, PresentationMode};
use chartkit::render::render_chart;
use std::fs;
use tempfile::tempdir;

fn point(x: &str, y: f64) -> SeriesPoint {
    SeriesPoint::new(x, Some(y))
}

fn line_series() -> CanonicalSeries {
    CanonicalSeries {
        points: vec![point("Jan", 10.0), point("Feb", 14.0), point("Mar", 9.0)],
        x_label: "Month".into(),
        y_label: "Sales".into(),
        ..Default::default()
    }
}

fn plan(mode: PresentationMode) -> ChartPlan {
    ChartPlan {
        mode,
        derived: Derived::None,
    }
}

fn render_and_check(series: &CanonicalSeries, plan: &ChartPlan, name: &str) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(name);
    render_chart(series, plan, "Test Chart", &path, 640, 480).expect("render");
    let svg = fs::read_to_string(&path).expect("read svg");
    assert!(svg.contains("<svg"), "{name} is not an svg document");
    assert!(svg.len() > 500, "{name} suspiciously small");
}

#[test]
fn renders_single_line_svg() {
    render_and_check(&line_series(), &plan(PresentationMode::SingleLine), "line.svg");
}

#[test]
fn renders_default_mode_svg() {
    render_and_check(&line_series(), &plan(PresentationMode::Default), "default.svg");
}

#[test]
fn renders_bar_svg() {
    render_and_check(&line_series(), &plan(PresentationMode::Bar), "bar.svg");
}

#[test]
fn renders_pie_svg() {
    let series = CanonicalSeries {
        points: vec![point("A", 30.0), point("B", 70.0)],
        x_label: "Category".into(),
        y_label: "Value".into(),
        ..Default::default()
    };
    let plan = ChartPlan {
        mode: PresentationMode::Pie,
        derived: Derived::Pie {
            slices: vec![
                PieSlice {
                    label: "A".into(),
                    value: 30.0,
                    percent: 30.0,
                },
                PieSlice {
                    label: "B".into(),
                    value: 70.0,
                    percent: 70.0,
                },
            ],
        },
    };
    render_and_check(&series, &plan, "pie.svg");
}

#[test]
fn renders_forecast_with_band_svg() {
    let mut series = line_series();
    for p in &mut series.points {
        p.tag = Some(PointTag::Historical);
    }
    let mut f1 = point("Apr", 11.0);
    f1.tag = Some(PointTag::Forecast);
    f1.lower_bound = Some(9.0);
    f1.upper_bound = Some(13.0);
    let mut f2 = point("May", 12.0);
    f2.tag = Some(PointTag::Forecast);
    f2.lower_bound = Some(10.0);
    f2.upper_bound = Some(14.0);
    series.points.push(f1);
    series.points.push(f2);

    let plan = ChartPlan {
        mode: PresentationMode::ForecastLine,
        derived: Derived::Forecast {
            split: 3,
            has_band: true,
        },
    };
    render_and_check(&series, &plan, "forecast.svg");
}

#[test]
fn renders_multi_line_svg() {
    let series = CanonicalSeries {
        series: vec![
            NamedSeries {
                name: "alpha".into(),
                points: vec![("a".into(), 1.0), ("b".into(), 2.0)],
            },
            NamedSeries {
                name: "beta".into(),
                points: vec![("a".into(), 3.0), ("b".into(), 1.5)],
            },
        ],
        x_label: "X".into(),
        y_label: "Y".into(),
        ..Default::default()
    };
    let plan = ChartPlan {
        mode: PresentationMode::MultiLine,
        derived: Derived::MultiLine {
            lines: vec![
                LinePlan {
                    series_index: 0,
                    base: "alpha".into(),
                    segment: LineSegment::Whole,
                    color_index: 0,
                },
                LinePlan {
                    series_index: 1,
                    base: "beta".into(),
                    segment: LineSegment::Whole,
                    color_index: 1,
                },
            ],
        },
    };
    render_and_check(&series, &plan, "multi.svg");
}

#[test]
fn renders_components_svg() {
    let series = line_series();
    let plan = ChartPlan {
        mode: PresentationMode::Components,
        derived: Derived::Components {
            seasonal: vec![Some(2.0), Some(-1.0), Some(0.5)],
        },
    };
    render_and_check(&series, &plan, "components.svg");
}

#[test]
fn renders_png_by_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("chart.png");
    render_chart(
        &line_series(),
        &plan(PresentationMode::SingleLine),
        "Test Chart",
        &path,
        640,
        480,
    )
    .expect("render png");
    let bytes = fs::read(&path).expect("read png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn empty_series_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.svg");
    let err = render_chart(
        &CanonicalSeries::default(),
        &plan(PresentationMode::Default),
        "Empty",
        &path,
        640,
        480,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no data"));
    assert!(!path.exists());
}
