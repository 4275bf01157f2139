//! Headless Report
//! Prints the dashboard tables to stdout and optionally writes PNG charts and JSON.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{filters, Dataset};
use crate::stats::{FrequencyTable, GroupKey};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};

const CHART_SIZE: (u32, u32) = (1400, 900);

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub min_count: Option<u32>,
    pub state: Option<String>,
    pub charts_dir: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportSummary<'a> {
    rows: usize,
    states: &'a FrequencyTable,
    min_count: u32,
    municipalities: &'a FrequencyTable,
    map_state: Option<&'a str>,
    map_units: usize,
}

pub fn run(dataset: &Dataset, config: &DashboardConfig, options: &ReportOptions) -> Result<()> {
    let state_freq = FrequencyTable::count_by(dataset, GroupKey::State);
    let municipality_freq = FrequencyTable::count_by(dataset, GroupKey::Municipality);

    let requested = options.min_count.unwrap_or(config.default_min_count);
    let (_, min_count) = filters::slider_bounds(&municipality_freq, requested);
    let municipalities = filters::filter_min_count(&municipality_freq, min_count);

    let map_state = options
        .state
        .clone()
        .or_else(|| dataset.unique_states().into_iter().next());
    let map_rows = map_state
        .as_deref()
        .map(|state| filters::select_state_for_map(dataset, state))
        .transpose()?;

    println!("Frequência de UBS por Estado");
    println!("{}", state_freq.to_dataframe()?);
    println!();
    println!("Municípios com pelo menos {} UBS", min_count);
    println!("{}", municipalities.to_dataframe()?);

    if let (Some(state), Some(rows)) = (&map_state, &map_rows) {
        let columns = dataset.columns();
        let preview = rows
            .frame()
            .select([
                columns.state.as_str(),
                columns.latitude.as_str(),
                columns.longitude.as_str(),
            ])?
            .head(Some(config.map_preview_rows));

        println!();
        println!("Exibindo UBS para o estado: {}", state);
        println!("Número de UBS encontradas: {}", rows.len());
        println!("{}", preview);
    }

    if let Some(dir) = &options.charts_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create chart directory: {:?}", dir))?;

        let mut charts: Vec<(&str, Result<(), RenderError>)> = vec![
            (
                "estados_barras.png",
                StaticChartRenderer::render_frequency_bars(
                    &state_freq,
                    "Frequência de UBS por Estado",
                    &dir.join("estados_barras.png"),
                    CHART_SIZE,
                ),
            ),
            (
                "estados_pizza.png",
                StaticChartRenderer::render_pie(
                    &state_freq,
                    "Distribuição de UBS por Estado",
                    &dir.join("estados_pizza.png"),
                    CHART_SIZE,
                ),
            ),
            (
                "municipios.png",
                StaticChartRenderer::render_frequency_bars(
                    &municipalities,
                    &format!("Municípios com pelo menos {} UBS", min_count),
                    &dir.join("municipios.png"),
                    CHART_SIZE,
                ),
            ),
        ];
        if let (Some(state), Some(rows)) = (&map_state, &map_rows) {
            charts.push((
                "mapa.png",
                StaticChartRenderer::render_map(
                    rows,
                    &format!("UBS - {}", state),
                    &dir.join("mapa.png"),
                    CHART_SIZE,
                ),
            ));
        }

        for (name, result) in charts {
            match result {
                Ok(()) => info!(chart = name, "Chart written"),
                Err(RenderError::Empty(title)) => warn!(chart = name, %title, "Chart skipped, no data"),
                Err(e) => return Err(e).with_context(|| format!("Failed to render {}", name)),
            }
        }
    }

    if let Some(path) = &options.json {
        let summary = ReportSummary {
            rows: dataset.len(),
            states: &state_freq,
            min_count,
            municipalities: &municipalities,
            map_state: map_state.as_deref(),
            map_units: map_rows.as_ref().map_or(0, Dataset::len),
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON report: {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .context("Failed to write JSON report")?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::tests::dataset_from_rows;

    #[test]
    fn json_summary_matches_tables() {
        let ds = dataset_from_rows(&[
            ("SP", "São Paulo", "-23,5", "-46,6"),
            ("SP", "São Paulo", "-23,6", ""),
            (" RJ ", "Niterói", "-22,9", "-43,1"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let options = ReportOptions {
            min_count: Some(2),
            state: Some("SP".to_string()),
            charts_dir: None,
            json: Some(dir.path().join("report.json")),
        };

        run(&ds, &DashboardConfig::default(), &options).unwrap();

        let text = fs::read_to_string(dir.path().join("report.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["rows"], 3);
        assert_eq!(json["states"]["group"], "state");
        assert_eq!(json["states"]["rows"][0]["key"], "SP");
        assert_eq!(json["states"]["rows"][0]["count"], 2);
        assert_eq!(json["states"]["rows"][1]["key"], "RJ");
        assert_eq!(json["min_count"], 2);
        assert_eq!(json["municipalities"]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["map_state"], "SP");
        assert_eq!(json["map_units"], 1);
    }

    #[test]
    fn default_threshold_is_clamped_and_first_state_mapped() {
        let ds = dataset_from_rows(&[
            ("BA", "Salvador", "-12,97", "-38,5"),
            ("SP", "São Paulo", "-23,5", "-46,6"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let options = ReportOptions {
            json: Some(dir.path().join("report.json")),
            ..ReportOptions::default()
        };

        run(&ds, &DashboardConfig::default(), &options).unwrap();

        let text = fs::read_to_string(dir.path().join("report.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["min_count"], 1);
        assert_eq!(json["municipalities"]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["map_state"], "BA");
        assert_eq!(json["map_units"], 1);
    }
}
