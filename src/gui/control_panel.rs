//! Control Panel Widget
//! Left side panel: dataset, mode choice, dependent selectors and action buttons.

use crate::views::Mode;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub mode: Mode,
    pub dataset_path: Option<PathBuf>,
    pub startups: Vec<String>,
    pub investors: Vec<String>,
    pub selected_startup: String,
    pub selected_investor: String,
    startup_filter: String,
    investor_filter: String,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            mode: Mode::Overview,
            dataset_path: None,
            startups: Vec::new(),
            investors: Vec::new(),
            selected_startup: String::new(),
            selected_investor: String::new(),
            startup_filter: String::new(),
            investor_filter: String::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace selector contents after a dataset load. Selections fall back to the first entry.
    pub fn update_lists(&mut self, startups: Vec<String>, investors: Vec<String>) {
        if !startups.contains(&self.selected_startup) {
            self.selected_startup = startups.first().cloned().unwrap_or_default();
        }
        if !investors.contains(&self.selected_investor) {
            self.selected_investor = investors.first().cloned().unwrap_or_default();
        }
        self.startups = startups;
        self.investors = investors;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Startup Analysis")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .dataset_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    let path_color = if self.dataset_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open").clicked() {
                            action = ControlPanelAction::OpenDataset;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Mode Section =====
        ui.label(RichText::new("What you want to do?").size(14.0).strong());
        ui.add_space(5.0);

        let previous_mode = self.mode;
        ComboBox::from_id_salt("mode")
            .width(220.0)
            .selected_text(self.mode.label())
            .show_ui(ui, |ui| {
                for mode in Mode::ALL {
                    ui.selectable_value(&mut self.mode, mode, mode.label());
                }
            });
        if self.mode != previous_mode {
            action = ControlPanelAction::ModeChanged(self.mode);
        }

        ui.add_space(15.0);

        // ===== Mode-specific selectors =====
        match self.mode {
            Mode::Overview => {}
            Mode::Startups => {
                ui.label("Select Startup Name");
                Self::searchable_combo(
                    ui,
                    "startup_select",
                    &self.startups,
                    &mut self.selected_startup,
                    &mut self.startup_filter,
                );

                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    let enabled = !self.selected_startup.is_empty();
                    ui.add_enabled_ui(enabled, |ui| {
                        let button = egui::Button::new(RichText::new("Find Startup Detail").size(15.0))
                            .min_size(egui::vec2(200.0, 32.0));
                        if ui.add(button).clicked() {
                            action = ControlPanelAction::ShowStartup(self.selected_startup.clone());
                        }
                    });
                });
            }
            Mode::Investors => {
                ui.label("Select Investor");
                let changed = Self::searchable_combo(
                    ui,
                    "investor_select",
                    &self.investors,
                    &mut self.selected_investor,
                    &mut self.investor_filter,
                );
                if changed {
                    action = ControlPanelAction::SelectionChanged;
                }

                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    let enabled = !self.selected_investor.is_empty();
                    ui.add_enabled_ui(enabled, |ui| {
                        let button = egui::Button::new(RichText::new("Find Investor Detail").size(15.0))
                            .min_size(egui::vec2(200.0, 32.0));
                        if ui.add(button).clicked() {
                            action = ControlPanelAction::ShowInvestor(self.selected_investor.clone());
                        }
                    });
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Combo box with a filter field. Returns true when the selection changed.
    fn searchable_combo(
        ui: &mut egui::Ui,
        id: &str,
        options: &[String],
        selected: &mut String,
        filter: &mut String,
    ) -> bool {
        let mut changed = false;
        ui.add(egui::TextEdit::singleline(filter).hint_text("🔍 Filter").desired_width(220.0));

        let needle = filter.to_lowercase();
        ComboBox::from_id_salt(id)
            .width(220.0)
            .height(320.0)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for option in options
                    .iter()
                    .filter(|o| needle.is_empty() || o.to_lowercase().contains(&needle))
                {
                    if ui.selectable_label(*selected == *option, option).clicked() && *selected != *option {
                        *selected = option.clone();
                        changed = true;
                    }
                }
            });
        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenDataset,
    ModeChanged(Mode),
    SelectionChanged,
    ShowStartup(String),
    ShowInvestor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_lists_keeps_a_valid_selection() {
        let mut panel = ControlPanel::new();
        panel.update_lists(vec!["Bar".into(), "Foo".into()], vec!["Alpha".into()]);
        assert_eq!(panel.selected_startup, "Bar");
        assert_eq!(panel.selected_investor, "Alpha");

        panel.selected_startup = "Foo".into();
        panel.update_lists(vec!["Foo".into(), "Qux".into()], Vec::new());
        assert_eq!(panel.selected_startup, "Foo");
        assert_eq!(panel.selected_investor, "");
    }
}
