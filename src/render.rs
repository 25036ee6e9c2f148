//! Renderer adapter: translate a (mode, canonical series) pair into plotters
//! calls and write **SVG** or **PNG** output.
//!
//! This module owns only the translation; the presentation decision lives in
//! [`crate::present`] and the drawing itself in the plotters backends.

use crate::models::{CanonicalSeries, PointTag};
use crate::present::{ChartPlan, Derived, LinePlan, LineSegment, PresentationMode};
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Render a prepared chart to `out_path`; the backend is chosen by extension
/// (`.svg` → SVG, anything else → bitmap).
pub fn render_chart<P: AsRef<Path>>(
    series: &CanonicalSeries,
    plan: &ChartPlan,
    title: &str,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if series.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, series, plan, title)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, series, plan, title)?;
    }
    Ok(())
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &CanonicalSeries,
    plan: &ChartPlan,
    title: &str,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    if plan.mode == PresentationMode::Pie {
        return draw_pie(&root, plan, title);
    }

    // The x axis is categorical: points are placed at integer indices and the
    // tick formatter maps an index back to its source label.
    let x_labels_src: Vec<String> = if series.series.is_empty() {
        series.points.iter().map(|p| p.x.clone()).collect()
    } else {
        series
            .series
            .iter()
            .max_by_key(|s| s.points.len())
            .map(|s| s.points.iter().map(|(x, _)| x.clone()).collect())
            .unwrap_or_default()
    };
    let n = x_labels_src.len().max(1);

    let (mut min_val, mut max_val) = series
        .value_range()
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    // Seasonal companion values live outside the canonical series.
    if let Derived::Components { seasonal } = &plan.derived {
        for v in seasonal.iter().flatten() {
            if v.is_finite() {
                min_val = min_val.min(*v);
                max_val = max_val.max(*v);
            }
        }
    }
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }
    // Bars grow from zero; keep the baseline in range.
    if plan.mode == PresentationMode::Bar {
        min_val = min_val.min(0.0);
        max_val = max_val.max(0.0);
    }

    let x_label_fmt = |x: &f64| {
        let idx = x.round() as i64;
        if idx >= 0 && (idx as usize) < x_labels_src.len() && (*x - idx as f64).abs() < 0.25 {
            x_labels_src[idx as usize].clone()
        } else {
            String::new()
        }
    };
    let y_label_fmt = |v: &f64| {
        let a = v.abs();
        let prec = if a >= 100.0 {
            0
        } else if a >= 10.0 {
            1
        } else {
            2
        };
        format!("{:.*}", prec, *v)
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 72)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), min_val..max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc(series.x_label.as_str())
        .y_desc(series.y_label.as_str())
        .x_labels(n.min(12))
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let mut has_legend = false;
    match (&plan.mode, &plan.derived) {
        (PresentationMode::Bar, _) => draw_bars(&mut chart, series)?,
        (PresentationMode::ForecastLine, Derived::Forecast { split, has_band }) => {
            draw_forecast(&mut chart, series, *split, *has_band)?;
            has_legend = true;
        }
        (PresentationMode::MultiLine, Derived::MultiLine { lines }) => {
            draw_multi_line(&mut chart, series, lines)?;
            has_legend = true;
        }
        (PresentationMode::Components, Derived::Components { seasonal }) => {
            draw_components(&mut chart, series, seasonal)?;
            has_legend = true;
        }
        // SingleLine, Default, and any mode whose derived data degraded.
        _ => draw_single_line(&mut chart, series)?,
    }

    if has_legend {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

type IndexedChart<'a, DB> =
    ChartContext<'a, DB, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>;

/// Points with a numeric value, at their source index.
fn indexed_values(series: &CanonicalSeries) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.y.map(|v| (i as f64, v)))
        .collect()
}

fn draw_single_line<DB: DrawingBackend>(
    chart: &mut IndexedChart<'_, DB>,
    series: &CanonicalSeries,
) -> Result<()> {
    let style = ShapeStyle {
        color: office_color(0),
        filled: false,
        stroke_width: 2,
    };
    chart
        .draw_series(LineSeries::new(indexed_values(series), style))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    chart: &mut IndexedChart<'_, DB>,
    series: &CanonicalSeries,
) -> Result<()> {
    let color = office_color(0);
    for (x, v) in indexed_values(series) {
        let y0 = 0.0f64.min(v);
        let y1 = 0.0f64.max(v);
        let rect = Rectangle::new([(x - 0.4, y0), (x + 0.4, y1)], color.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn legend_entry<'a, DB: DrawingBackend + 'a>(
    elem: &mut plotters::chart::SeriesAnno<'a, DB>,
    label: &str,
    color: RGBAColor,
) {
    let text = label.to_string();
    elem.label(text.clone()).legend(move |(x, y)| {
        EmptyElement::at((x, y))
            + Circle::new((x + 8, y), 4, color.filled())
            + Text::new(text.clone(), (x + 20, y), (FontFamily::SansSerif, 14))
    });
}

fn draw_forecast<'a, DB: DrawingBackend + 'a>(
    chart: &mut IndexedChart<'a, DB>,
    series: &CanonicalSeries,
    split: usize,
    has_band: bool,
) -> Result<()> {
    let historical = office_color(0);
    let forecast = office_color(1);

    // Confidence band first, under the lines: forecast lower bounds forward,
    // upper bounds reversed, as one polygon.
    if has_band {
        let mut poly: Vec<(f64, f64)> = Vec::new();
        for (i, p) in series.points.iter().enumerate() {
            if p.tag == Some(PointTag::Forecast)
                && let Some(lo) = p.lower_bound
            {
                poly.push((i as f64, lo));
            }
        }
        let mut upper: Vec<(f64, f64)> = Vec::new();
        for (i, p) in series.points.iter().enumerate() {
            if p.tag == Some(PointTag::Forecast)
                && let Some(hi) = p.upper_bound
            {
                upper.push((i as f64, hi));
            }
        }
        poly.extend(upper.into_iter().rev());
        if poly.len() >= 3 {
            chart
                .draw_series(std::iter::once(Polygon::new(
                    poly,
                    forecast.mix(0.18).filled(),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    let all = indexed_values(series);
    // Overlap by one point so the two segments connect visually.
    let hist_part: Vec<(f64, f64)> = all
        .iter()
        .cloned()
        .filter(|(x, _)| (*x as usize) < split)
        .collect();
    let fore_part: Vec<(f64, f64)> = all
        .iter()
        .cloned()
        .filter(|(x, _)| (*x as usize) + 1 >= split)
        .collect();

    let hist_elem = chart
        .draw_series(LineSeries::new(
            hist_part,
            ShapeStyle {
                color: historical,
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    legend_entry(hist_elem, "Historical", historical);

    let fore_elem = chart
        .draw_series(LineSeries::new(
            fore_part,
            ShapeStyle {
                color: forecast,
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    legend_entry(fore_elem, "Forecast", forecast);

    Ok(())
}

fn draw_multi_line<'a, DB: DrawingBackend + 'a>(
    chart: &mut IndexedChart<'a, DB>,
    series: &CanonicalSeries,
    lines: &[LinePlan],
) -> Result<()> {
    for plan in lines {
        let Some(sub) = series.series.get(plan.series_index) else {
            continue;
        };
        let base = office_color(plan.color_index);
        // Forecast segments share the base color but draw lighter, so a
        // product's history and forecast read as one line.
        let color = match plan.segment {
            LineSegment::Forecast => base.mix(0.55),
            _ => base,
        };
        let points: Vec<(f64, f64)> = sub
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, y))| (i as f64, *y))
            .collect();
        let elem = chart
            .draw_series(LineSeries::new(
                points,
                ShapeStyle {
                    color,
                    filled: false,
                    stroke_width: 2,
                },
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        legend_entry(elem, &sub.name, color);
    }
    Ok(())
}

/// Trend line (the canonical points) plus its per-point seasonal companion.
fn draw_components<'a, DB: DrawingBackend + 'a>(
    chart: &mut IndexedChart<'a, DB>,
    series: &CanonicalSeries,
    seasonal: &[Option<f64>],
) -> Result<()> {
    let trend_color = office_color(0);
    let elem = chart
        .draw_series(LineSeries::new(
            indexed_values(series),
            ShapeStyle {
                color: trend_color,
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    legend_entry(elem, "Trend", trend_color);

    let seasonal_points: Vec<(f64, f64)> = seasonal
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
        .collect();
    if !seasonal_points.is_empty() {
        let seasonal_color = office_color(1);
        let elem = chart
            .draw_series(LineSeries::new(
                seasonal_points,
                ShapeStyle {
                    color: seasonal_color,
                    filled: false,
                    stroke_width: 2,
                },
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        legend_entry(elem, "Seasonal", seasonal_color);
    }
    Ok(())
}

/// Pie charts skip the cartesian frame: wedges are drawn in pixel coordinates
/// as arc polygons, with the percentage labels beside each slice.
fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan,
    title: &str,
) -> Result<()> {
    let Derived::Pie { slices } = &plan.derived else {
        return Err(anyhow!("pie mode without slice data"));
    };
    if slices.is_empty() {
        return Err(anyhow!("no data to plot"));
    }

    let (w, h) = root.dim_in_pixel();
    let cx = w as i32 / 2;
    let cy = h as i32 / 2 + 12; // leave room for the caption
    let radius = (w.min(h) as i32 / 2 - 48).max(24) as f64;

    root.draw(&Text::new(
        title.to_string(),
        (16, 16),
        (FontFamily::SansSerif, 24),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    // An all-zero pie still draws: equal spans keep the output deterministic.
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    let fraction = |value: f64| {
        if total > 0.0 {
            value.max(0.0) / total
        } else {
            1.0 / slices.len() as f64
        }
    };

    let mut angle = -std::f64::consts::FRAC_PI_2; // start at 12 o'clock
    for (idx, slice) in slices.iter().enumerate() {
        let sweep = fraction(slice.value) * std::f64::consts::TAU;
        let color = office_color(idx);

        let steps = ((sweep / 0.05).ceil() as usize).max(2);
        let mut poly: Vec<(i32, i32)> = vec![(cx, cy)];
        for s in 0..=steps {
            let a = angle + sweep * s as f64 / steps as f64;
            poly.push((
                cx + (radius * a.cos()).round() as i32,
                cy + (radius * a.sin()).round() as i32,
            ));
        }
        root.draw(&Polygon::new(poly, color.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;

        let mid = angle + sweep / 2.0;
        let lx = cx + ((radius + 14.0) * mid.cos()).round() as i32;
        let ly = cy + ((radius + 14.0) * mid.sin()).round() as i32;
        root.draw(&Text::new(
            format!("{} ({:.1}%)", slice.label, slice.percent),
            (lx, ly),
            (FontFamily::SansSerif, 13),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

        angle += sweep;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
