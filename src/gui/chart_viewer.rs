//! Chart Viewer Widget
//! Central scrollable panel showing the dashboard for the current filters.

use crate::analysis::{AnalysisOutcome, DashboardView};
use crate::charts::ChartPlotter;
use crate::config::ChartStyle;
use crate::stats::{format_count, format_eur};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;

/// Tabs of the market value section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketTab {
    #[default]
    Highest,
    Average,
    Details,
}

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
    pub active_tab: MarketTab,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    /// Placeholder, error or content for one analysis.
    fn show_outcome<T>(
        ui: &mut egui::Ui,
        outcome: &AnalysisOutcome<T>,
        content: impl FnOnce(&mut egui::Ui, &T),
    ) {
        match outcome {
            AnalysisOutcome::Ready(data) => content(ui, data),
            AnalysisOutcome::Empty => {
                ui.label(
                    RichText::new("No players match the current filters")
                        .color(Color32::GRAY),
                );
            }
            AnalysisOutcome::Skipped(reason) => {
                ui.label(
                    RichText::new(format!("Not available: {}", reason))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        }
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui, style: &ChartStyle, load_error: Option<&str>) {
        if let Some(error) = load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(error)
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };
        let active_tab = &mut self.active_tab;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new("⚽ Football Player Market Value Analysis")
                        .size(24.0)
                        .strong(),
                );
                ui.label("Analysis of player market values across different countries and positions");
                ui.add_space(SECTION_SPACING);

                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("Dataset Overview").size(16.0).strong());
                    cols[0].label(format!(
                        "Total Players: {}",
                        format_count(view.overview.total_players)
                    ));
                    cols[0].label(format!("Countries: {}", view.overview.countries_selected));
                    cols[0].label(format!("Positions: {}", view.overview.positions_selected));

                    cols[1].label(RichText::new("Market Value Statistics").size(16.0).strong());
                    Self::show_outcome(&mut cols[1], &view.summary, |ui, summary| {
                        let money = |v: Option<f64>| v.map(format_eur).unwrap_or_else(|| "-".into());
                        ui.label(format!("Total Market Value: {}", format_eur(summary.total)));
                        ui.label(format!("Average Market Value: {}", money(summary.mean)));
                        ui.label(format!("Highest Market Value: {}", money(summary.max)));
                    });
                });

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.label(RichText::new("Market Value Analysis").size(20.0).strong());

                ui.horizontal(|ui| {
                    ui.selectable_value(active_tab, MarketTab::Highest, "Highest Values");
                    ui.selectable_value(active_tab, MarketTab::Average, "Average Values");
                    ui.selectable_value(active_tab, MarketTab::Details, "Detailed Stats");
                });
                ui.add_space(8.0);

                Self::show_outcome(ui, &view.market, |ui, market| match *active_tab {
                    MarketTab::Highest => {
                        ui.label(RichText::new(market.highest.title()).strong());
                        ChartPlotter::draw_value_chart(ui, &market.highest, style);
                    }
                    MarketTab::Average => {
                        ui.label(RichText::new(market.average.title()).strong());
                        ChartPlotter::draw_value_chart(ui, &market.average, style);
                    }
                    MarketTab::Details => {
                        ui.label(
                            RichText::new("Detailed Statistics by Country and Position").strong(),
                        );
                        ChartPlotter::draw_detail_table(ui, &market.details);
                    }
                });

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.label(RichText::new("Additional Insights").size(20.0).strong());

                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("Age Distribution").size(16.0).strong());
                    Self::show_outcome(&mut cols[0], &view.ages, |ui, ages| {
                        ChartPlotter::draw_age_chart(ui, ages);
                    });

                    cols[1].label(RichText::new("Position Distribution").size(16.0).strong());
                    Self::show_outcome(&mut cols[1], &view.positions, |ui, counts| {
                        ChartPlotter::draw_pie_chart(ui, "position_pie", counts, style);
                    });
                });

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.label(RichText::new("Data source: Transfermarkt").color(Color32::GRAY));
            });
    }
}
