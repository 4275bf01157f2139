//! Control Panel Widget
//! Left side panel with the data source and the three dashboard filters.

use crate::data::filters;
use crate::stats::FrequencyTable;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    /// Multi-select options, most frequent state first.
    pub state_options: Vec<String>,
    pub selected_states: Vec<bool>,
    pub min_count: u32,
    pub max_count: u32,
    /// Single-select options, in order of first appearance.
    pub map_states: Vec<String>,
    pub map_state: Option<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            state_options: Vec::new(),
            selected_states: Vec::new(),
            min_count: 0,
            max_count: 0,
            map_states: Vec::new(),
            map_state: None,
            status: "Pronto".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every control for a freshly loaded dataset.
    pub fn update_options(
        &mut self,
        state_freq: &FrequencyTable,
        municipality_freq: &FrequencyTable,
        map_states: Vec<String>,
        default_min_count: u32,
    ) {
        self.state_options = state_freq.keys();
        self.selected_states = vec![false; self.state_options.len()];

        let (range, start) = filters::slider_bounds(municipality_freq, default_min_count);
        self.max_count = *range.end();
        self.min_count = start;

        self.map_state = map_states.first().cloned();
        self.map_states = map_states;
    }

    /// States ticked in the multi-select.
    pub fn get_selected_states(&self) -> Vec<String> {
        self.state_options
            .iter()
            .zip(self.selected_states.iter())
            .filter(|(_, &selected)| selected)
            .map(|(state, _)| state.clone())
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏥 UBS Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Unidades Básicas de Saúde")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Fonte de dados").size(14.0).strong());
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
                        .unwrap_or_else(|| "Nenhum arquivo".to_string());

                    ui.label(RichText::new(&path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Abrir CSV").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== State Multi-select =====
        ui.label(RichText::new("🗂 Selecione os estados").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("state_multiselect")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for (i, state) in self.state_options.iter().enumerate() {
                            if i < self.selected_states.len()
                                && ui.checkbox(&mut self.selected_states[i], state).changed()
                            {
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Selecionar todos").clicked() {
                self.selected_states.iter_mut().for_each(|v| *v = true);
                action = ControlPanelAction::FiltersChanged;
            }
            if ui.small_button("Limpar").clicked() {
                self.selected_states.iter_mut().for_each(|v| *v = false);
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Minimum Count Slider =====
        ui.label(
            RichText::new("📊 Número mínimo de UBS por município")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        let slider = egui::Slider::new(&mut self.min_count, 0..=self.max_count).text("UBS");
        if ui.add(slider).changed() {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Map State Single-select =====
        ui.label(
            RichText::new("🗺 Selecione o Estado para o mapa")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        ComboBox::from_id_salt("map_state")
            .width(220.0)
            .selected_text(self.map_state.clone().unwrap_or_default())
            .show_ui(ui, |ui| {
                for state in &self.map_states {
                    if ui
                        .selectable_label(self.map_state.as_deref() == Some(state.as_str()), state)
                        .clicked()
                    {
                        self.map_state = Some(state.clone());
                        action = ControlPanelAction::FiltersChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Erro") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FiltersChanged,
}
