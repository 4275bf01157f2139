//! Chart Plotter Module
//! Interactive bar, pie and map views using egui_plot and the egui painter.

use crate::data::Dataset;
use crate::stats::{FrequencyTable, COUNT_LABEL};
use egui::{Color32, Pos2, RichText, ScrollArea, Shape, Stroke};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotPoints, Points, Text};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const MAP_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Count labels above bars are skipped past this many bars.
const MAX_BAR_LABELS: usize = 40;

/// Arc resolution of pie slices, in radians.
const PIE_ARC_STEP: f32 = 0.05;

/// Creates the dashboard visualizations.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Vertical bar chart of a frequency table, one bar per key.
    pub fn draw_frequency_bars(ui: &mut egui::Ui, id: &str, table: &FrequencyTable, height: f32) {
        if table.is_empty() {
            ui.label(RichText::new("Nenhum dado para exibir").color(Color32::GRAY));
            return;
        }

        let x_labels = table.keys();
        let bars: Vec<Bar> = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, f64::from(row.count))
                    .name(&row.key)
                    .width(0.7)
                    .fill(BAR_COLOR)
            })
            .collect();
        let labelled = table.len() <= MAX_BAR_LABELS;

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(table.group.label())
            .y_axis_label(COUNT_LABEL)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));

                if labelled {
                    for (i, row) in table.rows.iter().enumerate() {
                        plot_ui.text(
                            Text::new(
                                PlotPoint::new(i as f64, f64::from(row.count)),
                                RichText::new(row.count.to_string()).size(11.0),
                            )
                            .anchor(egui::Align2::CENTER_BOTTOM),
                        );
                    }
                }
            });
    }

    /// Pie chart of a frequency table with a legend to its right.
    pub fn draw_pie(ui: &mut egui::Ui, table: &FrequencyTable, size: f32) {
        let total = table.total();
        if total == 0 {
            ui.label(RichText::new("Nenhum dado para exibir").color(Color32::GRAY));
            return;
        }

        let fractions: Vec<f32> = table
            .rows
            .iter()
            .map(|r| r.count as f32 / total as f32)
            .collect();

        ui.horizontal(|ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = size * 0.45;

            let mut start = -FRAC_PI_2;
            for (i, fraction) in fractions.iter().enumerate() {
                let sweep = fraction * TAU;
                for wedge in Self::pie_wedges(center, radius, start, sweep) {
                    painter.add(Shape::convex_polygon(wedge, Self::slice_color(i), Stroke::NONE));
                }
                start += sweep;
            }

            if let Some(pos) = response.hover_pos() {
                let offset = pos - center;
                if offset.length() <= radius {
                    let angle = offset.y.atan2(offset.x);
                    if let Some(i) = Self::slice_at_angle(&fractions, angle) {
                        let row = &table.rows[i];
                        response.on_hover_text(format!(
                            "{}: {} ({:.1}%)",
                            row.key,
                            row.count,
                            fractions[i] * 100.0
                        ));
                    }
                }
            }

            ScrollArea::vertical()
                .id_salt("pie_legend")
                .max_height(size)
                .show(ui, |ui| {
                    for (i, row) in table.rows.iter().enumerate() {
                        ui.horizontal(|ui| {
                            let (swatch, _) = ui
                                .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter().rect_filled(swatch, 2.0, Self::slice_color(i));
                            ui.label(
                                RichText::new(format!(
                                    "{} ({:.1}%)",
                                    row.key,
                                    fractions[i] * 100.0
                                ))
                                .size(12.0),
                            );
                        });
                    }
                });
        });
    }

    /// Split a slice into convex wedges of at most a quarter turn each.
    ///
    /// Angles are in screen space: 0 points right, positive turns clockwise.
    pub fn pie_wedges(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Vec<Pos2>> {
        let mut wedges = Vec::new();
        if sweep <= 0.0 {
            return wedges;
        }

        let chunks = (sweep / FRAC_PI_4 - 1e-4).ceil().max(1.0) as usize;
        let chunk_sweep = sweep / chunks as f32;
        let steps = (chunk_sweep / PIE_ARC_STEP).ceil().max(1.0) as usize;

        for chunk in 0..chunks {
            let chunk_start = start + chunk as f32 * chunk_sweep;
            let mut wedge = Vec::with_capacity(steps + 2);
            wedge.push(center);
            for step in 0..=steps {
                let angle = chunk_start + chunk_sweep * step as f32 / steps as f32;
                wedge.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
            }
            wedges.push(wedge);
        }
        wedges
    }

    /// Index of the slice under a screen-space angle, slices starting at 12 o'clock.
    pub fn slice_at_angle(fractions: &[f32], angle: f32) -> Option<usize> {
        let relative = (angle + FRAC_PI_2).rem_euclid(TAU);
        let mut cumulative = 0.0;
        for (i, fraction) in fractions.iter().enumerate() {
            cumulative += fraction * TAU;
            if relative < cumulative {
                return Some(i);
            }
        }
        // Float rounding can leave a sliver past the last boundary
        fractions.iter().rposition(|f| *f > 0.0)
    }

    /// Scatter map of every unit with both coordinates, longitude on x.
    pub fn draw_map(ui: &mut egui::Ui, id: &str, dataset: &Dataset, height: f32) {
        let coords: Vec<[f64; 2]> = dataset
            .records()
            .iter()
            .filter_map(|r| r.coordinates())
            .map(|(lat, lon)| [lon, lat])
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .radius(2.5)
                        .color(MAP_COLOR)
                        .name("UBS"),
                );
            });
    }

    /// Every column of the dataset, capped at `row_limit` rows.
    pub fn draw_records_table(ui: &mut egui::Ui, id: &str, dataset: &Dataset, row_limit: usize) {
        let headers = dataset.column_names();
        let shown = dataset.len().min(row_limit);
        let rows: Vec<Vec<String>> = (0..shown)
            .map(|row| (0..headers.len()).map(|c| dataset.cell_text(row, c)).collect())
            .collect();

        if shown < dataset.len() {
            ui.label(
                RichText::new(format!(
                    "Exibindo {} de {} linhas",
                    shown,
                    dataset.len()
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
        Self::draw_grid(ui, id, &headers, &rows, 300.0);
    }

    /// First `limit` rows of the state and coordinate columns.
    pub fn draw_coordinate_preview(ui: &mut egui::Ui, id: &str, dataset: &Dataset, limit: usize) {
        let columns = dataset.columns();
        let headers = vec![
            columns.state.clone(),
            columns.latitude.clone(),
            columns.longitude.clone(),
        ];
        let rows: Vec<Vec<String>> = dataset
            .records()
            .iter()
            .take(limit)
            .map(|r| {
                vec![
                    r.state_name.clone().unwrap_or_default(),
                    r.latitude.map(|v| v.to_string()).unwrap_or_default(),
                    r.longitude.map(|v| v.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        Self::draw_grid(ui, id, &headers, &rows, 260.0);
    }

    fn draw_grid(
        ui: &mut egui::Ui,
        id: &str,
        headers: &[String],
        rows: &[Vec<String>],
        max_height: f32,
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt(id)
                    .max_height(max_height)
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id(id))
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in headers {
                                    ui.label(RichText::new(header).strong().size(11.0));
                                }
                                ui.end_row();

                                for row in rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
