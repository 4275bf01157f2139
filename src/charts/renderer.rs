//! Static Chart Renderer
//! Writes the dashboard charts as PNG files with plotters, for headless reports.
//!
//! Charts:
//! 1. Bar chart of units per key (state or municipality)
//! 2. Pie chart of the state distribution
//! 3. Scatter map of one state's units (longitude x, latitude y)

use crate::data::Dataset;
use crate::stats::{FrequencyTable, COUNT_LABEL};
use plotters::element::Pie;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Nothing to draw for '{0}'")]
    Empty(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

// Colors (RGB)
const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const MAP_COLOR: RGBColor = RGBColor(231, 76, 60);

const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

const FONT: &str = "sans-serif";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Bar chart with one bar per table row, keys on the x axis.
    pub fn render_frequency_bars(
        table: &FrequencyTable,
        title: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if table.is_empty() {
            return Err(RenderError::Empty(title.to_string()));
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels = table.keys();
        let max = table.max_count();
        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 26))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(60)
            .build_cartesian_2d((0..table.len()).into_segmented(), 0u32..(max + max / 10 + 1))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(table.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
            .x_desc(table.group.label())
            .y_desc(COUNT_LABEL)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(3)
                    .data(table.rows.iter().enumerate().map(|(i, r)| (i, r.count))),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Pie chart of the table's share per key.
    pub fn render_pie(
        table: &FrequencyTable,
        title: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let total = table.total();
        if total == 0 {
            return Err(RenderError::Empty(title.to_string()));
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let area = root.titled(title, (FONT, 26)).map_err(draw_err)?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.35;
        let sizes: Vec<f64> = table.rows.iter().map(|r| f64::from(r.count)).collect();
        let colors: Vec<RGBColor> = (0..table.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();
        let labels: Vec<String> = table
            .rows
            .iter()
            .map(|r| format!("{} ({:.1}%)", r.key, f64::from(r.count) * 100.0 / total as f64))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 13).into_font().color(&BLACK));
        area.draw(&pie).map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Scatter of every unit with both coordinates.
    pub fn render_map(dataset: &Dataset, title: &str, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        let coords: Vec<(f64, f64)> = dataset
            .records()
            .iter()
            .filter_map(|r| r.coordinates())
            .collect();
        if coords.is_empty() {
            return Err(RenderError::Empty(title.to_string()));
        }

        let lat_range = padded_range(coords.iter().map(|c| c.0));
        let lon_range = padded_range(coords.iter().map(|c| c.1));

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 26))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lon_range, lat_range)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                coords
                    .iter()
                    .map(|&(lat, lon)| Circle::new((lon, lat), 3, MAP_COLOR.filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Min..max of the values with a 5% margin, never narrower than 0.02.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((max - min) * 0.05).max(0.01);
    (min - pad)..(max + pad)
}
