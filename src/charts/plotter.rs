//! Chart Plotter Module
//! Interactive dashboard charts using egui_plot.

use crate::analysis::{AgeDistribution, ValueChart};
use crate::config::ChartStyle;
use crate::stats::{format_eur, CountryDetail, Histogram};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text,
};
use std::f64::consts::TAU;

/// Color used for single-series charts
pub const PRIMARY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Palette color for a series index.
    pub fn series_color(style: &ChartStyle, index: usize) -> Color32 {
        let [r, g, b] = style.color(index);
        Color32::from_rgb(r, g, b)
    }

    /// Grid marks at every integer category position.
    fn category_marks(count: usize) -> Vec<GridMark> {
        (0..count)
            .map(|i| GridMark {
                value: i as f64,
                step_size: 1.0,
            })
            .collect()
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Countries on the x axis in ranking order; one translucent bar series
    /// per position, drawn in position ranking order.
    pub fn draw_value_chart(ui: &mut egui::Ui, chart: &ValueChart, style: &ChartStyle) {
        let countries: Vec<String> = chart.country_order.iter().map(|r| r.name.clone()).collect();
        let n = countries.len();
        let labels = countries.clone();
        let alpha = style.bar_opacity as f32;

        Plot::new(format!("value_chart_{:?}", chart.statistic))
            .height(360.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Country")
            .y_axis_label(chart.y_label())
            .x_grid_spacer(move |_input| Self::category_marks(n))
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .y_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                for (idx, position) in chart.position_order.iter().enumerate() {
                    let color = Self::series_color(style, idx);
                    let bars: Vec<Bar> = chart
                        .matrix
                        .column_values(&position.name, &chart.country_order)
                        .into_iter()
                        .enumerate()
                        .filter_map(|(i, v)| {
                            v.map(|v| {
                                Bar::new(i as f64, v)
                                    .width(0.8)
                                    .fill(color.gamma_multiply(alpha))
                                    .name(format!("{} - {}", countries[i], position.name))
                            })
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&position.name));
                }
            });
    }

    /// Histogram bars with an optional density curve.
    pub fn draw_histogram(
        ui: &mut egui::Ui,
        id: &str,
        histogram: &Histogram,
        kde: &[(f64, f64)],
        x_label: &str,
    ) {
        let width = histogram.bin_width();

        Plot::new(id)
            .height(280.0)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = histogram
                    .bins()
                    .map(|(lo, hi, count)| {
                        Bar::new((lo + hi) / 2.0, count as f64)
                            .width(width)
                            .fill(PRIMARY_COLOR.gamma_multiply(0.6))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(PRIMARY_COLOR).name("Count"));

                if !kde.is_empty() {
                    let points: PlotPoints = kde.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(Color32::from_rgb(231, 76, 60))
                            .width(2.0)
                            .name("Density"),
                    );
                }
            });
    }

    pub fn draw_age_chart(ui: &mut egui::Ui, ages: &AgeDistribution) {
        Self::draw_histogram(ui, "age_histogram", &ages.histogram, &ages.kde, "Age");
        if ages.excluded > 0 {
            ui.label(
                RichText::new(format!(
                    "{} players without a usable date of birth were left out",
                    ages.excluded
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
    }

    /// Pie chart drawn as polygons, with percentage labels.
    pub fn draw_pie_chart(
        ui: &mut egui::Ui,
        id: &str,
        slices: &[(String, usize)],
        style: &ChartStyle,
    ) {
        let total: usize = slices.iter().map(|(_, count)| count).sum();
        if total == 0 {
            ui.label("No data");
            return;
        }

        Plot::new(id)
            .height(300.0)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                // Start at 12 o'clock and go clockwise
                let mut start = TAU / 4.0;
                for (idx, (name, count)) in slices.iter().enumerate() {
                    let share = *count as f64 / total as f64;
                    let sweep = share * TAU;
                    let color = Self::series_color(style, idx);

                    let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
                    let mut points = vec![[0.0, 0.0]];
                    points.extend((0..=steps).map(|s| {
                        let angle = start - sweep * s as f64 / steps as f64;
                        [angle.cos(), angle.sin()]
                    }));

                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(points))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(name),
                    );

                    let mid = start - sweep / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.1}%", share * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    ));

                    start -= sweep;
                }
            });
    }

    /// Per-country blocks: highest and average value, then position mean/max.
    pub fn draw_detail_table(ui: &mut egui::Ui, details: &[CountryDetail]) {
        for detail in details {
            ui.add_space(6.0);
            ui.label(RichText::new(&detail.country).size(16.0).strong());
            ui.columns(2, |cols| {
                cols[0].label(format!(
                    "Highest Market Value: {}",
                    detail.highest.map(format_eur).unwrap_or_else(|| "-".into())
                ));
                cols[1].label(format!(
                    "Average Market Value: {}",
                    detail.average.map(format_eur).unwrap_or_else(|| "-".into())
                ));
            });

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    egui::Grid::new(ui.make_persistent_id(format!("detail_{}", detail.country)))
                        .striped(true)
                        .min_col_width(110.0)
                        .spacing([8.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("position").strong().size(11.0));
                            ui.label(RichText::new("mean").strong().size(11.0));
                            ui.label(RichText::new("max").strong().size(11.0));
                            ui.end_row();

                            for stats in &detail.positions {
                                ui.label(RichText::new(&stats.position).size(11.0));
                                ui.label(RichText::new(format!("{:.2}", stats.mean)).size(11.0));
                                ui.label(RichText::new(format!("{:.2}", stats.max)).size(11.0));
                                ui.end_row();
                            }
                        });
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integers() {
        let labels = vec!["Brazil".to_string(), "France".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "France");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, -1.0), "");
        assert_eq!(ChartPlotter::category_label(&labels, 7.0), "");
    }

    #[test]
    fn category_marks_cover_each_slot() {
        let marks = ChartPlotter::category_marks(3);
        let values: Vec<f64> = marks.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }
}
