use std::ops::RangeInclusive;

use eframe::egui::{Align2, FontId, Rect, Sense, Ui, Vec2, pos2};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::data::model::{CellValue, ColumnKind, Table};
use crate::data::stats;
use crate::state::{AppState, ChartKind};

const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render the currently selected chart against the working table.  Exactly
/// one chart is drawn per frame; immediate mode means every render starts
/// from a clean surface.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };

    match state.chart_kind {
        ChartKind::Histogram => {
            let Some(x) = &state.chart_x else {
                ui.label("Choose a column for the histogram.");
                return;
            };
            histogram(ui, table, x);
        }
        ChartKind::Scatter => {
            let (Some(x), Some(y)) = (&state.chart_x, &state.chart_y) else {
                ui.label("Choose X and Y columns.");
                return;
            };
            scatter(ui, table, x, y);
        }
        ChartKind::Bar => {
            let (Some(x), Some(y)) = (&state.chart_x, &state.chart_y) else {
                ui.label("Choose X and Y columns.");
                return;
            };
            bar_chart(ui, table, x, y);
        }
        ChartKind::Line => {
            let (Some(x), Some(y)) = (&state.chart_x, &state.chart_y) else {
                ui.label("Choose X and Y columns.");
                return;
            };
            line_plot(ui, table, x, y);
        }
    }
}

// ---------------------------------------------------------------------------
// Axis mapping: cells → plot coordinates
// ---------------------------------------------------------------------------

/// Maps one column onto a plot axis.  Numeric columns use their values
/// directly; other columns map each distinct value to its index in
/// first-appearance order, with the labels restored by an axis formatter.
struct Axis {
    index: usize,
    categories: Option<Vec<CellValue>>,
}

impl Axis {
    fn new(table: &Table, name: &str) -> Option<Axis> {
        let index = table.column_index(name)?;
        let categories = match table.column_kind(index) {
            ColumnKind::Numeric => None,
            ColumnKind::Other => Some(
                table
                    .unique_values(name)
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .collect(),
            ),
        };
        Some(Axis { index, categories })
    }

    /// Axis coordinate of this column's cell in `row`; `None` drops the row.
    fn value(&self, row: &[CellValue]) -> Option<f64> {
        let cell = &row[self.index];
        if cell.is_null() {
            return None;
        }
        match &self.categories {
            None => cell.as_f64(),
            Some(cats) => cats.iter().position(|c| c == cell).map(|i| i as f64),
        }
    }

    /// Tick formatter restoring category labels, when the axis is
    /// categorical.
    fn formatter(&self) -> Option<impl Fn(GridMark, &RangeInclusive<f64>) -> String> {
        let labels: Vec<String> = self
            .categories
            .as_ref()?
            .iter()
            .map(|v| v.to_string())
            .collect();
        Some(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        })
    }
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

fn histogram(ui: &mut Ui, table: &Table, column: &str) {
    let values = table.numeric_values(column);
    if values.is_empty() {
        ui.label("No values to plot.");
        return;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / HISTOGRAM_BINS as f64
    } else {
        1.0
    };

    let mut counts = vec![0usize; HISTOGRAM_BINS];
    for v in &values {
        let mut bin = ((v - min) / width) as usize;
        if bin >= HISTOGRAM_BINS {
            bin = HISTOGRAM_BINS - 1;
        }
        counts[bin] += 1;
    }

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(min + (i as f64 + 0.5) * width, count as f64).width(width))
        .collect();

    Plot::new("histogram")
        .x_axis_label(column)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(column));
        });
}

fn scatter(ui: &mut Ui, table: &Table, x: &str, y: &str) {
    let (Some(xa), Some(ya)) = (Axis::new(table, x), Axis::new(table, y)) else {
        return;
    };

    let points: Vec<[f64; 2]> = table
        .rows
        .iter()
        .filter_map(|row| Some([xa.value(row)?, ya.value(row)?]))
        .collect();

    let mut plot = Plot::new("scatter").x_axis_label(x).y_axis_label(y);
    if let Some(fmt) = xa.formatter() {
        plot = plot.x_axis_formatter(fmt);
    }
    if let Some(fmt) = ya.formatter() {
        plot = plot.y_axis_formatter(fmt);
    }
    plot.show(ui, |plot_ui| {
        plot_ui.points(
            Points::new(PlotPoints::from(points))
                .radius(3.0)
                .name(format!("{y} vs {x}")),
        );
    });
}

/// Bar chart: mean of the numeric `y` per distinct value of `x`, one bar per
/// category in first-appearance order.
fn bar_chart(ui: &mut Ui, table: &Table, x: &str, y: &str) {
    let (Some(xi), Some(yi)) = (table.column_index(x), table.column_index(y)) else {
        return;
    };

    let categories: Vec<CellValue> = table
        .unique_values(x)
        .into_iter()
        .filter(|v| !v.is_null())
        .collect();

    let mut sums = vec![(0.0f64, 0usize); categories.len()];
    for row in &table.rows {
        let Some(pos) = categories.iter().position(|c| c == &row[xi]) else {
            continue;
        };
        let Some(value) = row[yi].as_f64() else {
            continue;
        };
        sums[pos].0 += value;
        sums[pos].1 += 1;
    }

    let palette = color::generate_palette(categories.len());
    let bars: Vec<Bar> = categories
        .iter()
        .enumerate()
        .filter(|(i, _)| sums[*i].1 > 0)
        .map(|(i, cat)| {
            Bar::new(i as f64, sums[i].0 / sums[i].1 as f64)
                .width(0.7)
                .fill(palette[i])
                .name(cat.to_string())
        })
        .collect();

    let labels: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    Plot::new("bar_chart")
        .x_axis_label(x)
        .y_axis_label(format!("mean({y})"))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn line_plot(ui: &mut Ui, table: &Table, x: &str, y: &str) {
    let (Some(xa), Some(ya)) = (Axis::new(table, x), Axis::new(table, y)) else {
        return;
    };

    let mut points: Vec<[f64; 2]> = table
        .rows
        .iter()
        .filter_map(|row| Some([xa.value(row)?, ya.value(row)?]))
        .collect();
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut plot = Plot::new("line_plot").x_axis_label(x).y_axis_label(y);
    if let Some(fmt) = xa.formatter() {
        plot = plot.x_axis_formatter(fmt);
    }
    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points))
                .name(format!("{y} by {x}"))
                .width(1.5),
        );
    });
}

// ---------------------------------------------------------------------------
// Correlation heat map
// ---------------------------------------------------------------------------

const CELL_SIZE: f32 = 52.0;
const ROW_LABEL_WIDTH: f32 = 110.0;
const COLUMN_LABEL_HEIGHT: f32 = 22.0;

/// Render the pairwise Pearson correlation among numeric columns as an
/// annotated grid with a diverging colour scale centred at zero.
pub fn correlation_heatmap(ui: &mut Ui, table: &Table) {
    let Some(matrix) = stats::correlation_matrix(table) else {
        ui.label("No numeric columns available for correlation.");
        return;
    };

    let n = matrix.columns.len();
    let size = Vec2::new(
        ROW_LABEL_WIDTH + n as f32 * CELL_SIZE,
        COLUMN_LABEL_HEIGHT + n as f32 * CELL_SIZE,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (j, name) in matrix.columns.iter().enumerate() {
        painter.text(
            pos2(
                origin.x + ROW_LABEL_WIDTH + (j as f32 + 0.5) * CELL_SIZE,
                origin.y + COLUMN_LABEL_HEIGHT * 0.5,
            ),
            Align2::CENTER_CENTER,
            name,
            font.clone(),
            text_color,
        );
    }

    for (i, name) in matrix.columns.iter().enumerate() {
        let row_y = origin.y + COLUMN_LABEL_HEIGHT + i as f32 * CELL_SIZE;
        painter.text(
            pos2(origin.x + ROW_LABEL_WIDTH - 6.0, row_y + 0.5 * CELL_SIZE),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );

        for j in 0..n {
            let value = matrix.values[i][j];
            let rect = Rect::from_min_size(
                pos2(origin.x + ROW_LABEL_WIDTH + j as f32 * CELL_SIZE, row_y),
                Vec2::splat(CELL_SIZE),
            );
            painter.rect_filled(rect.shrink(1.0), 2.0, color::diverging(value));
            let label = if value.is_nan() {
                "--".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                font.clone(),
                color::annotation_color(value),
            );
        }
    }
}
