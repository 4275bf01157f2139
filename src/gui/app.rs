//! UBS Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::DashboardConfig;
use crate::data::{filters, DataLoader, Dataset, DatasetError};
use crate::gui::chart_viewer::DashboardView;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{FrequencyTable, GroupKey};
use egui::SidePanel;
use tracing::{error, info};

/// Current values of the three dashboard controls.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub selected_states: Vec<String>,
    pub min_count: u32,
    pub map_state: Option<String>,
}

/// Recompute every chart input from the dataset and the control values.
pub fn build_view(dataset: &Dataset, filter: &FilterState) -> Result<DashboardView, DatasetError> {
    let state_freq = FrequencyTable::count_by(dataset, GroupKey::State);
    let municipality_freq = FrequencyTable::count_by(dataset, GroupKey::Municipality);

    let selected_rows = filters::filter_by_states(dataset, &filter.selected_states)?;
    let municipalities = filters::filter_min_count(&municipality_freq, filter.min_count);
    let map_rows = filter
        .map_state
        .as_deref()
        .map(|state| filters::select_state_for_map(dataset, state))
        .transpose()?;

    Ok(DashboardView {
        state_freq,
        selected_rows,
        municipalities,
        min_count: filter.min_count,
        map_state: filter.map_state.clone(),
        map_rows,
    })
}

/// Main application window.
pub struct UbsDashboardApp {
    loader: DataLoader,
    dataset: Dataset,
    default_min_count: u32,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl UbsDashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &DashboardConfig,
        loader: DataLoader,
        dataset: Dataset,
    ) -> Self {
        let mut app = Self {
            loader,
            dataset,
            default_min_count: config.default_min_count,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(config.table_row_limit, config.map_preview_rows),
        };
        app.control_panel.csv_path = Some(config.csv_path.clone());
        app.reset_controls();
        app.refresh_view();
        app
    }

    /// Repopulate the controls from the current dataset.
    fn reset_controls(&mut self) {
        let state_freq = FrequencyTable::count_by(&self.dataset, GroupKey::State);
        let municipality_freq = FrequencyTable::count_by(&self.dataset, GroupKey::Municipality);
        self.control_panel.update_options(
            &state_freq,
            &municipality_freq,
            self.dataset.unique_states(),
            self.default_min_count,
        );
        self.control_panel
            .set_status(&format!("{} UBS carregadas", self.dataset.len()));
    }

    fn refresh_view(&mut self) {
        let filter = FilterState {
            selected_states: self.control_panel.get_selected_states(),
            min_count: self.control_panel.min_count,
            map_state: self.control_panel.map_state.clone(),
        };

        match build_view(&self.dataset, &filter) {
            Ok(view) => self.chart_viewer.set_view(view),
            Err(e) => {
                error!(error = %e, "Failed to apply filters");
                self.control_panel.set_status(&format!("Erro: {}", e));
            }
        }
    }

    /// Handle CSV file selection. The current dataset is kept if loading fails.
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.loader.load_dataset(&path) {
            Ok(dataset) => {
                info!(path = %path.display(), rows = dataset.len(), "Switched dataset");
                self.dataset = dataset;
                self.control_panel.csv_path = Some(path);
                self.reset_controls();
                self.refresh_view();
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load CSV");
                self.control_panel.set_status(&format!("Erro: {}", e));
            }
        }
    }
}

impl eframe::App for UbsDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FiltersChanged => self.refresh_view(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
