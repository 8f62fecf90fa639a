//! Control Panel Widget
//! Left side panel with the data source and the country/position filters.

use crate::data::{PlayerFilter, Selection};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashSet;
use std::path::PathBuf;

/// One checkbox entry of a multi-select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub name: String,
    pub selected: bool,
}

/// Multi-select list with a search box.
#[derive(Debug, Clone, Default)]
pub struct MultiSelect {
    pub options: Vec<FilterOption>,
    pub search: String,
}

impl MultiSelect {
    /// Replace the options, selecting exactly those in `selection`.
    pub fn set_options(&mut self, names: Vec<String>, selection: &Selection) {
        self.options = names
            .into_iter()
            .map(|name| {
                let selected = selection.admits(Some(name.as_str()));
                FilterOption { name, selected }
            })
            .collect();
    }

    /// Replace the options, keeping the state of names seen before.
    /// New names start selected when `select_new` is set.
    pub fn sync_options(&mut self, names: Vec<String>, select_new: bool) {
        let previous: HashSet<&str> = self
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.name.as_str())
            .collect();
        let known: HashSet<&str> = self.options.iter().map(|o| o.name.as_str()).collect();

        let options = names
            .into_iter()
            .map(|name| {
                let selected = if known.contains(name.as_str()) {
                    previous.contains(name.as_str())
                } else {
                    select_new
                };
                FilterOption { name, selected }
            })
            .collect();
        self.options = options;
    }

    pub fn selection(&self) -> Selection {
        Selection::only(
            self.options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.name.clone()),
        )
    }

    pub fn selected_count(&self) -> usize {
        self.options.iter().filter(|o| o.selected).count()
    }

    pub fn set_all(&mut self, selected: bool) {
        self.options.iter_mut().for_each(|o| o.selected = selected);
    }

    /// Draw the list. Returns true when the selection changed.
    fn show(&mut self, ui: &mut egui::Ui, id: &str) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("🔍");
            ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search"));
        });
        ui.add_space(4.0);

        let needle = self.search.to_lowercase();
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(180.0)
                    .show(ui, |ui| {
                        for option in self
                            .options
                            .iter_mut()
                            .filter(|o| needle.is_empty() || o.name.to_lowercase().contains(&needle))
                        {
                            if ui.checkbox(&mut option.selected, &option.name).changed() {
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.set_all(true);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                self.set_all(false);
                changed = true;
            }
            ui.label(
                RichText::new(format!("{}/{}", self.selected_count(), self.options.len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        changed
    }
}

/// Left side control panel with file selection and filters.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub countries: MultiSelect,
    pub positions: MultiSelect,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            countries: MultiSelect::default(),
            positions: MultiSelect::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter built from both lists.
    pub fn filter(&self) -> PlayerFilter {
        PlayerFilter::new(self.countries.selection(), self.positions.selection())
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("⚽ Player Market Explorer")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui.button("⟳ Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🌍 Select Countries").size(14.0).strong());
        ui.add_space(5.0);
        if self.countries.show(ui, "country_filter") {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);

        ui.label(RichText::new("🏃 Select Positions").size(14.0).strong());
        ui.add_space(5.0);
        if self.positions.show(ui, "position_filter") {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportCharts;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") || self.status.contains("not found") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    FiltersChanged,
    ExportCharts,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_options_follows_selection() {
        let mut list = MultiSelect::default();
        list.set_options(names(&["Brazil", "France", "Spain"]), &Selection::only(["France"]));
        assert_eq!(list.selected_count(), 1);
        assert_eq!(list.selection(), Selection::only(["France"]));

        list.set_options(names(&["Brazil", "France"]), &Selection::All);
        assert_eq!(list.selected_count(), 2);
    }

    #[test]
    fn sync_keeps_previous_choices() {
        let mut list = MultiSelect::default();
        list.set_options(names(&["Brazil", "France"]), &Selection::only(["Brazil"]));
        list.sync_options(names(&["France", "Brazil", "Chile"]), false);

        assert_eq!(list.selection(), Selection::only(["Brazil"]));
        assert_eq!(list.options[0].name, "France");

        list.sync_options(names(&["France", "Brazil", "Chile", "Peru"]), true);
        assert_eq!(list.selection(), Selection::only(["Brazil", "Peru"]));
    }

    #[test]
    fn cleared_list_filters_everything() {
        let mut panel = ControlPanel::new();
        panel
            .countries
            .set_options(names(&["Brazil"]), &Selection::All);
        panel
            .positions
            .set_options(names(&["Forward"]), &Selection::All);
        panel.positions.set_all(false);

        assert_eq!(panel.filter().positions, Selection::none());
    }
}
