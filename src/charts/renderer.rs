//! Static Chart Renderer
//! Writes PNG charts with plotters. Every call takes its own `ChartStyle`.
//!
//! Charts:
//! 1. Histogram with optional density overlay (market values, ages)
//! 2. Bar chart of counts per category (players per position)
//! 3. Overlaid bar chart of a country x position matrix
//! 4. Pie chart of category shares

use crate::analysis::ValueChart;
use crate::config::ChartStyle;
use crate::stats::Histogram;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::series::Histogram as BarSeries;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Nothing to draw for '{0}'")]
    NoData(String),
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Labels and axis titles of a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartText<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    fn rgb(style: &ChartStyle, index: usize) -> RGBColor {
        let [r, g, b] = style.color(index);
        RGBColor(r, g, b)
    }

    fn prepare<'a>(
        path: &'a Path,
        style: &ChartStyle,
    ) -> Result<DrawingArea<BitMapBackend<'a>, Shift>, RenderError> {
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        Ok(root)
    }

    /// Histogram bars, with the density curve drawn on top when `kde` is non-empty.
    pub fn render_histogram(
        path: &Path,
        text: ChartText<'_>,
        histogram: &Histogram,
        kde: &[(f64, f64)],
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        let (Some(&x_min), Some(&x_max)) = (histogram.edges.first(), histogram.edges.last())
        else {
            return Err(RenderError::NoData(text.title.to_string()));
        };

        let kde_peak = kde.iter().map(|&(_, y)| y).fold(0.0, f64::max);
        let y_max = (histogram.max_count() as f64).max(kde_peak).max(1.0) * 1.1;

        let root = Self::prepare(path, style)?;
        let font = style.font_family.as_str();

        let mut chart = ChartBuilder::on(&root)
            .caption(text.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(text.x_label)
            .y_desc(text.y_label)
            .label_style((font, style.label_size).into_font())
            .draw()
            .map_err(draw_err)?;

        let bar_color = Self::rgb(style, 6);
        chart
            .draw_series(histogram.bins().map(|(lo, hi, count)| {
                Rectangle::new(
                    [(lo, 0.0), (hi, count as f64)],
                    bar_color.mix(style.bar_opacity).filled(),
                )
            }))
            .map_err(draw_err)?;

        if !kde.is_empty() {
            let line_color = Self::rgb(style, 0);
            chart
                .draw_series(LineSeries::new(
                    kde.iter().copied(),
                    line_color.stroke_width(2),
                ))
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// One bar per category, in the given order.
    pub fn render_bar_chart(
        path: &Path,
        text: ChartText<'_>,
        bars: &[(String, f64)],
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        if bars.is_empty() {
            return Err(RenderError::NoData(text.title.to_string()));
        }

        let labels: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
        let y_max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.1;

        let root = Self::prepare(path, style)?;
        let font = style.font_family.as_str();

        let mut chart = ChartBuilder::on(&root)
            .caption(text.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(120)
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(&labels, v))
            .x_label_style(
                (font, style.label_size)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(text.x_label)
            .y_desc(text.y_label)
            .draw()
            .map_err(draw_err)?;

        let color = Self::rgb(style, 0);
        chart
            .draw_series(
                BarSeries::vertical(&chart)
                    .style(color.mix(style.bar_opacity).filled())
                    .margin(8)
                    .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Countries along the x axis in ranking order, one translucent bar
    /// series per position drawn in position ranking order.
    pub fn render_value_chart(
        path: &Path,
        value_chart: &ValueChart,
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        let title = value_chart.title();
        if value_chart.matrix.is_empty() {
            return Err(RenderError::NoData(title));
        }

        let countries: Vec<String> = value_chart
            .country_order
            .iter()
            .map(|r| r.name.clone())
            .collect();
        let y_max = value_chart.matrix.max_value().unwrap_or(1.0).max(1.0) * 1.1;

        let root = Self::prepare(path, style)?;
        let font = style.font_family.as_str();

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(120)
            .y_label_area_size(110)
            .build_cartesian_2d(
                (0u32..countries.len() as u32).into_segmented(),
                0f64..y_max,
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(countries.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(&countries, v))
            .x_label_style(
                (font, style.label_size)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .x_desc("Country")
            .y_desc(value_chart.y_label())
            .draw()
            .map_err(draw_err)?;

        for (idx, position) in value_chart.position_order.iter().enumerate() {
            let color = Self::rgb(style, idx);
            let values = value_chart
                .matrix
                .column_values(&position.name, &value_chart.country_order);

            chart
                .draw_series(
                    BarSeries::vertical(&chart)
                        .style(color.mix(style.bar_opacity).filled())
                        .margin(6)
                        .data(
                            values
                                .iter()
                                .enumerate()
                                .filter_map(|(i, v)| v.map(|v| (i as u32, v))),
                        ),
                )
                .map_err(draw_err)?
                .label(position.name.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((font, style.label_size).into_font())
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Share of each category with percentage labels.
    pub fn render_pie_chart(
        path: &Path,
        title: &str,
        slices: &[(String, usize)],
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        if slices.iter().all(|(_, count)| *count == 0) {
            return Err(RenderError::NoData(title.to_string()));
        }

        let root = Self::prepare(path, style)?;
        let font = style.font_family.as_str();
        let area = root
            .titled(title, (font, style.caption_size).into_font())
            .map_err(draw_err)?;

        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = (w.min(h) as f64 / 2.0 - 60.0).max(20.0);

        let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
        let colors: Vec<RGBColor> = (0..slices.len()).map(|i| Self::rgb(style, i)).collect();
        let labels: Vec<String> = slices.iter().map(|(name, _)| name.clone()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style((font, style.label_size).into_font().color(&BLACK));
        pie.percentages((font, style.label_size).into_font().color(&WHITE));
        area.draw(&pie).map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_labels_only_at_centres() {
        let labels = vec!["Brazil".to_string(), "France".to_string()];
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(1)), "France");
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(0)), "");
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(9)), "");
    }

    #[test]
    fn empty_inputs_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let style = ChartStyle::default();
        let text = ChartText {
            title: "Empty",
            x_label: "x",
            y_label: "y",
        };

        let err = StaticChartRenderer::render_histogram(
            &dir.path().join("h.png"),
            text,
            &Histogram::default(),
            &[],
            &style,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NoData(_)));

        let err = StaticChartRenderer::render_bar_chart(&dir.path().join("b.png"), text, &[], &style)
            .unwrap_err();
        assert!(matches!(err, RenderError::NoData(_)));
        assert!(!dir.path().join("b.png").exists());
    }
}
