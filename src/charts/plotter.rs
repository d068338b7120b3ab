//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot and the egui painter.

use crate::query::{HeatmapGrid, MonthlyPoint, RankedValue, YearValue};
use egui::{Align2, Color32, FontId, RichText, Stroke};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Color palette for categories
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

pub const TREND_COLOR: Color32 = Color32::from_rgb(40, 167, 69); // Green

// Heatmap scale end points (light yellow -> deep blue)
const HEAT_LOW: [f32; 3] = [255.0, 255.0, 217.0];
const HEAT_HIGH: [f32; 3] = [8.0, 29.0, 88.0];

const CHART_HEIGHT: f32 = 260.0;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Draws dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the category at `index`.
    pub fn category_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Short month name, 1-based.
    pub fn month_name(month: i32) -> &'static str {
        usize::try_from(month - 1)
            .ok()
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
            .unwrap_or("?")
    }

    /// Vertical bars, one per ranked value, labelled on the x axis.
    pub fn draw_ranked_bars(ui: &mut egui::Ui, id: &str, values: &[RankedValue], y_label: &str) {
        if values.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let x_labels: Vec<String> = values.iter().map(|v| v.label.clone()).collect();
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Bar::new(i as f64, v.value)
                    .name(&v.label)
                    .width(0.6)
                    .fill(Self::category_color(i))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Bars per year.
    pub fn draw_year_bars(ui: &mut egui::Ui, id: &str, values: &[YearValue]) {
        if values.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let bars: Vec<Bar> = values
            .iter()
            .map(|v| Bar::new(v.year as f64, v.value).name(v.year).width(0.6))
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Funds (Rs in crore)")
            .x_axis_formatter(|mark, _range| Self::integer_label(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(PALETTE[0]));
            });
    }

    /// Line with markers per year.
    pub fn draw_year_trend(ui: &mut egui::Ui, id: &str, values: &[YearValue]) {
        if values.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let points: Vec<[f64; 2]> = values.iter().map(|v| [v.year as f64, v.value]).collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Total Investment (Rs in crore)")
            .x_axis_formatter(|mark, _range| Self::integer_label(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Month-on-month line. Points are spaced evenly and labelled "Mon YYYY".
    pub fn draw_monthly_series(ui: &mut egui::Ui, id: &str, series: &[MonthlyPoint], y_label: &str) {
        if series.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let x_labels: Vec<String> = series
            .iter()
            .map(|p| format!("{} {}", Self::month_name(p.month), p.year))
            .collect();
        let points: Vec<[f64; 2]> = series
            .iter()
            .enumerate()
            .map(|(i, p)| [i as f64, p.value])
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT + 40.0)
            .allow_scroll(false)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Pie chart of shares with a legend showing percentages.
    pub fn draw_share_chart(ui: &mut egui::Ui, values: &[RankedValue]) {
        let total: f64 = values.iter().map(|v| v.value.max(0.0)).sum();
        if values.is_empty() || total <= 0.0 {
            Self::draw_empty(ui);
            return;
        }

        ui.horizontal(|ui| {
            let size = 220.0;
            let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = size / 2.0 - 6.0;

            let mut start = -FRAC_PI_2;
            for (i, v) in values.iter().enumerate() {
                let sweep = (v.value.max(0.0) / total) as f32 * TAU;
                let color = Self::category_color(i);

                // Wedges are drawn as thin triangles so every piece stays convex
                let steps = ((sweep / 0.05).ceil() as usize).max(1);
                for s in 0..steps {
                    let a0 = start + sweep * s as f32 / steps as f32;
                    let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                    let p0 = center + radius * egui::vec2(a0.cos(), a0.sin());
                    let p1 = center + radius * egui::vec2(a1.cos(), a1.sin());
                    painter.add(egui::Shape::convex_polygon(
                        vec![center, p0, p1],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, v) in values.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, Self::category_color(i));
                        let pct = v.value.max(0.0) / total * 100.0;
                        ui.label(RichText::new(format!("{} ({:.1}%)", v.label, pct)).size(12.0));
                    });
                }
            });
        });
    }

    /// Year x month heatmap with values written in each cell.
    pub fn draw_heatmap(ui: &mut egui::Ui, grid: &HeatmapGrid) {
        if grid.years.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let label_width = 48.0;
        let cell_height = 26.0;
        let cols = grid.months.len().max(1) as f32;
        let cell_width = ((ui.available_width() - label_width) / cols).clamp(36.0, 90.0);
        let width = label_width + cell_width * cols;
        let height = cell_height * (grid.years.len() + 1) as f32;

        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let max = grid.max_value();

        for (m, month) in grid.months.iter().enumerate() {
            let pos = rect.left_top()
                + egui::vec2(label_width + cell_width * (m as f32 + 0.5), cell_height * 0.5);
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                Self::month_name(*month),
                FontId::proportional(12.0),
                text_color,
            );
        }

        for (y, year) in grid.years.iter().enumerate() {
            let row_top = cell_height * (y + 1) as f32;
            painter.text(
                rect.left_top() + egui::vec2(label_width * 0.5, row_top + cell_height * 0.5),
                Align2::CENTER_CENTER,
                year.to_string(),
                FontId::proportional(12.0),
                text_color,
            );

            for (m, value) in grid.cells[y].iter().enumerate() {
                let min = rect.left_top() + egui::vec2(label_width + cell_width * m as f32, row_top);
                let cell = egui::Rect::from_min_size(min, egui::vec2(cell_width, cell_height)).shrink(1.0);
                let t = if max > 0.0 { (value / max) as f32 } else { 0.0 };
                let fill = Self::heat_color(t);
                painter.rect_filled(cell, 0.0, fill);

                let ink = if t > 0.5 { Color32::WHITE } else { Color32::BLACK };
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    format!("{:.1}", value),
                    FontId::proportional(10.0),
                    ink,
                );
            }
        }
    }

    /// Two-column ranking table.
    pub fn draw_ranked_table(ui: &mut egui::Ui, id: &str, headers: [&str; 2], values: &[RankedValue]) {
        if values.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong().size(12.0));
                        ui.label(RichText::new(headers[0]).strong().size(12.0));
                        ui.label(RichText::new(headers[1]).strong().size(12.0));
                        ui.end_row();

                        for (i, v) in values.iter().enumerate() {
                            ui.label(RichText::new((i + 1).to_string()).size(12.0));
                            ui.label(RichText::new(&v.label).size(12.0));
                            ui.label(RichText::new(format_amount(v.value)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Placeholder for a section with no rows.
    pub fn draw_empty(ui: &mut egui::Ui) {
        ui.label(RichText::new("No data").italics().color(Color32::GRAY));
    }

    fn heat_color(t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let mix = |i: usize| (HEAT_LOW[i] + (HEAT_HIGH[i] - HEAT_LOW[i]) * t).round() as u8;
        Color32::from_rgb(mix(0), mix(1), mix(2))
    }

    fn integer_label(value: f64) -> String {
        if (value - value.round()).abs() > f64::EPSILON {
            String::new()
        } else {
            format!("{}", value.round() as i64)
        }
    }
}

/// Amount with at most two decimals and no trailing zeros.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(ChartPlotter::month_name(1), "Jan");
        assert_eq!(ChartPlotter::month_name(12), "Dec");
        assert_eq!(ChartPlotter::month_name(0), "?");
        assert_eq!(ChartPlotter::month_name(13), "?");
    }

    #[test]
    fn amounts_drop_trailing_zeros() {
        assert_eq!(format_amount(10.0), "10");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(1.234), "1.23");
    }

    #[test]
    fn heat_scale_spans_the_end_points() {
        assert_eq!(ChartPlotter::heat_color(0.0), Color32::from_rgb(255, 255, 217));
        assert_eq!(ChartPlotter::heat_color(1.0), Color32::from_rgb(8, 29, 88));
        assert_eq!(ChartPlotter::heat_color(7.0), ChartPlotter::heat_color(1.0));
    }
}
