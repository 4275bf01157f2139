//! Chart Viewer Widget
//! Central scrollable panel with the dashboard charts, tables and map.

use crate::charts::ChartPlotter;
use crate::data::Dataset;
use crate::stats::FrequencyTable;
use egui::{RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const CHART_HEIGHT: f32 = 320.0;
const PIE_SIZE: f32 = 320.0;
const MAP_HEIGHT: f32 = 480.0;

/// Everything the viewer draws, recomputed by the app on each interaction.
pub struct DashboardView {
    pub state_freq: FrequencyTable,
    /// Rows of the states ticked in the multi-select; `None` when nothing is ticked.
    pub selected_rows: Option<Dataset>,
    pub municipalities: FrequencyTable,
    pub min_count: u32,
    pub map_state: Option<String>,
    pub map_rows: Option<Dataset>,
}

pub struct ChartViewer {
    pub view: Option<DashboardView>,
    table_row_limit: usize,
    map_preview_rows: usize,
}

impl ChartViewer {
    pub fn new(table_row_limit: usize, map_preview_rows: usize) -> Self {
        Self {
            view: None,
            table_row_limit,
            map_preview_rows,
        }
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Sem dados").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(
                    RichText::new("Dashboard de Unidades Básicas de Saúde (UBS)")
                        .size(24.0)
                        .strong(),
                );
                ui.add_space(SECTION_SPACING);

                // Units per state
                Self::section_title(ui, "Frequência de UBS por Estado");
                ChartPlotter::draw_frequency_bars(ui, "state_bars", &view.state_freq, CHART_HEIGHT);
                ui.add_space(SECTION_SPACING);

                // Rows of the selected states
                if let Some(rows) = &view.selected_rows {
                    Self::section_title(ui, "UBS dos estados selecionados");
                    ui.label(format!("{} UBS", rows.len()));
                    ChartPlotter::draw_records_table(
                        ui,
                        "selected_rows",
                        rows,
                        self.table_row_limit,
                    );
                    ui.add_space(SECTION_SPACING);
                }

                // State distribution
                Self::section_title(ui, "Distribuição de UBS por Estado");
                ChartPlotter::draw_pie(ui, &view.state_freq, PIE_SIZE);
                ui.add_space(SECTION_SPACING);

                // Municipalities above the threshold
                Self::section_title(
                    ui,
                    &format!("Municípios com pelo menos {} UBS", view.min_count),
                );
                ChartPlotter::draw_frequency_bars(
                    ui,
                    "municipality_bars",
                    &view.municipalities,
                    CHART_HEIGHT,
                );
                ui.add_space(SECTION_SPACING);

                // Map of one state
                if let (Some(state), Some(rows)) = (&view.map_state, &view.map_rows) {
                    Self::section_title(ui, &format!("Exibindo UBS para o estado: {}", state));
                    ui.label(format!("Número de UBS encontradas: {}", rows.len()));
                    ui.add_space(5.0);
                    ui.label(RichText::new("Prévia dos dados filtrados:").size(12.0));
                    ChartPlotter::draw_coordinate_preview(
                        ui,
                        "map_preview",
                        rows,
                        self.map_preview_rows,
                    );
                    ui.add_space(10.0);
                    ChartPlotter::draw_map(ui, "state_map", rows, MAP_HEIGHT);
                }
            });
    }

    fn section_title(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(5.0);
    }
}
