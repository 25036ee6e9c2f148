use chartkit::export::{ExportItem, build_table, insight_sections, sparkline};
use chartkit::models::{CanonicalSeries, NarrativeInsights, RawChartRecord, SeriesPoint};
use serde_json::json;

fn points(values: &[(&str, f64)]) -> Vec<SeriesPoint> {
    values
        .iter()
        .map(|(x, y)| SeriesPoint::new(*x, Some(*y)))
        .collect()
}

fn series_of(values: &[(&str, f64)]) -> CanonicalSeries {
    CanonicalSeries {
        points: points(values),
        x_label: "Month".into(),
        y_label: "Revenue".into(),
        ..Default::default()
    }
}

#[test]
fn sparkline_is_byte_deterministic() {
    let pts = points(&[("Jan", 10.0), ("Feb", 25.0), ("Mar", 17.5)]);
    let a = sparkline(&pts, "Revenue");
    let b = sparkline(&pts, "Revenue");
    assert_eq!(a, b);
}

#[test]
fn sparkline_single_point_emits_single_char_bar() {
    let pts = points(&[("Only", 42.0)]);
    let text = sparkline(&pts, "t");
    let bar_line = text.lines().nth(1).expect("one point line");
    assert_eq!(bar_line.matches('█').count(), 1);
}

#[test]
fn sparkline_bars_scale_between_min_and_max() {
    let pts = points(&[("lo", 0.0), ("hi", 100.0)]);
    let text = sparkline(&pts, "t");
    let mut lines = text.lines().skip(1);
    let lo = lines.next().unwrap().matches('█').count();
    let hi = lines.next().unwrap().matches('█').count();
    assert_eq!(lo, 1);
    assert_eq!(hi, 30);
}

#[test]
fn sparkline_truncates_long_labels() {
    let pts = points(&[("a label that is far too long", 1.0)]);
    let text = sparkline(&pts, "t");
    let line = text.lines().nth(1).unwrap();
    let label = line.split('|').next().unwrap().trim();
    assert_eq!(label.chars().count(), 15);
}

#[test]
fn table_sections_carry_header_sparkline_and_rows() {
    let record = RawChartRecord {
        title: Some("Monthly Revenue".into()),
        kind: Some("line".into()),
        brief_description: Some("Revenue by month".into()),
        ..Default::default()
    };
    let series = series_of(&[("Jan", 10.0), ("Feb", 20.0)]);
    let text = build_table(&[ExportItem {
        record: &record,
        series: &series,
    }]);

    assert!(text.starts_with(&"=".repeat(60)));
    assert!(text.contains("Title: Monthly Revenue"));
    assert!(text.contains("Type: line"));
    assert!(text.contains("Description: Revenue by month"));
    assert!(text.contains("Month,Revenue"));
    assert!(text.contains("Jan,10"));
    assert!(text.contains('█'));
}

#[test]
fn table_substitutes_commas_inside_labels() {
    let record = RawChartRecord::default();
    let mut series = series_of(&[("Jan, 2026", 10.0)]);
    series.x_label = "Month, Year".into();
    let text = build_table(&[ExportItem {
        record: &record,
        series: &series,
    }]);
    assert!(text.contains("Month; Year,Value") || text.contains("Month; Year,Revenue"));
    assert!(text.contains("Jan; 2026,10"));
    assert!(!text.contains("Jan, 2026"));
}

#[test]
fn table_notes_truncated_conversions() {
    let record = RawChartRecord::default();
    let mut series = series_of(&[("Jan", 1.0)]);
    series.truncated = true;
    let text = build_table(&[ExportItem {
        record: &record,
        series: &series,
    }]);
    assert!(text.contains("unequal lengths"));
}

#[test]
fn insight_precedence_prefers_current_fields() {
    let record = RawChartRecord {
        narrative_insights: Some(NarrativeInsights {
            conversational_analysis: Some("the new analysis".into()),
            business_description: Some("the legacy description".into()),
            ..Default::default()
        }),
        insights: Some("ancient free text".into()),
        ..Default::default()
    };
    let sections = insight_sections(&record);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].0, "Analysis");
    assert_eq!(sections[0].1, "the new analysis");
}

#[test]
fn insight_sections_follow_priority_order() {
    let record = RawChartRecord {
        narrative_insights: Some(NarrativeInsights {
            business_impact: Some("impact".into()),
            conversational_analysis: Some("analysis".into()),
            actionable_advice: Some("advice".into()),
            personalized_insight: Some("insight".into()),
            business_description: None,
        }),
        ..Default::default()
    };
    let headings: Vec<&str> = insight_sections(&record).iter().map(|(h, _)| *h).collect();
    assert_eq!(
        headings,
        vec![
            "Analysis",
            "Personalized Insight",
            "Actionable Advice",
            "Business Impact"
        ]
    );
}

#[test]
fn legacy_description_used_only_when_current_fields_absent() {
    let record = RawChartRecord {
        narrative_insights: Some(NarrativeInsights {
            business_description: Some("legacy only".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let sections = insight_sections(&record);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].1, "legacy only");
}

#[test]
fn free_text_insights_are_last_resort() {
    let record = RawChartRecord {
        insights: Some("plain old text".into()),
        data: json!({}),
        ..Default::default()
    };
    let sections = insight_sections(&record);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].0, "Insights");
}
