//! Player Market Explorer Main Application
//! Main window with control panel and dashboard viewer.

use crate::analysis::{default_filter, DashboardView};
use crate::config::AppConfig;
use crate::data::{DataLoader, LoaderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report;
use chrono::Local;
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window.
pub struct ExplorerApp {
    config: AppConfig,
    data_path: PathBuf,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    load_error: Option<String>,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            data_path: config.data_path.clone(),
            config,
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_error: None,
        };
        app.refresh(true);
        app
    }

    /// Re-run the pipeline for the current filters. The table itself comes
    /// from the loader cache unless the file changed.
    ///
    /// With `reset_filters` the selections go back to their defaults:
    /// the top countries by best player and every position.
    fn refresh(&mut self, reset_filters: bool) {
        self.control_panel.csv_path = Some(self.data_path.clone());

        let data = match self.loader.load(&self.data_path) {
            Ok(data) => data,
            Err(e) => {
                let message = match &e {
                    LoaderError::DataNotFound(path) => format!(
                        "Could not find {}. Please ensure the data file is in the correct location.",
                        path.display()
                    ),
                    other => format!("Error: {}", other),
                };
                self.control_panel.set_status(&message);
                self.chart_viewer.clear();
                self.load_error = Some(message);
                return;
            }
        };
        self.load_error = None;

        let table = &data.table;
        if reset_filters {
            let defaults = default_filter(table, self.config.default_country_count);
            self.control_panel
                .countries
                .set_options(table.countries(), &defaults.countries);
            self.control_panel
                .positions
                .set_options(table.positions(), &defaults.positions);
        } else {
            self.control_panel.countries.sync_options(table.countries(), false);
            self.control_panel.positions.sync_options(table.positions(), true);
        }

        let filter = self.control_panel.filter();
        let view = DashboardView::compute(
            table,
            &filter,
            self.config.dashboard_age_bins,
            Local::now().date_naive(),
        );
        self.control_panel.set_status(&format!(
            "Showing {} of {} players",
            view.overview.total_players,
            table.len()
        ));
        self.chart_viewer.set_view(view);
    }

    /// Pick another CSV file and start over with default filters.
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.data_path = path;
            self.loader.invalidate();
            self.refresh(true);
        }
    }

    fn handle_reload(&mut self) {
        self.loader.invalidate();
        self.refresh(false);
    }

    /// Write the charts for the current selection as PNG files.
    fn handle_export_charts(&mut self) {
        let filter = self.control_panel.filter();
        let Some(data) = self.loader.get_data() else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let filtered = filter.apply(&data.table);
        let result = report::render_charts(
            &filtered,
            &self.config,
            Local::now().date_naive(),
            self.config.dashboard_age_bins,
            true,
        );

        match result {
            Ok(batch) => {
                self.control_panel.set_status(&format!(
                    "Exported {} charts to {} ({} skipped)",
                    batch.rendered.len(),
                    self.config.output_dir.display(),
                    batch.skipped.len()
                ));
                if self.config.open_after_render {
                    report::open_rendered(&batch.rendered);
                }
            }
            Err(e) => {
                log::error!("Chart export failed: {}", e);
                self.control_panel
                    .set_status(&format!("Error: export failed: {}", e));
            }
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::FiltersChanged => self.refresh(false),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer
                .show(ui, &self.config.style, self.load_error.as_deref());
        });
    }
}
