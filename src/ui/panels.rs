use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::{self, EXPORT_FILE_NAME};
use crate::data::model::Table;
use crate::data::{filter, stats};
use crate::state::{AppState, ChartKind};
use crate::ui::plot;

const PREVIEW_ROWS: usize = 100;
const PENDING_PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download Processed Dataset…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let (rows, cols) = table.shape();
            ui.label(format!("Dataset size: ({rows}, {cols})"));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – analysis / processing / visualization controls
// ---------------------------------------------------------------------------

/// Render the control panel.  Selection lists are derived freshly from the
/// current table on every frame, so stale column names can never be picked.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CSV Explorer");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.  (File → Open…)");
        return;
    }

    let (columns, numeric, filter_values, pending_numeric) = {
        let table = state.table.as_ref().unwrap();
        let filter_values = state
            .filter_column
            .as_ref()
            .map(|c| table.unique_values(c))
            .unwrap_or_default();
        let pending_numeric = state
            .pending
            .as_ref()
            .map(|p| p.numeric_columns())
            .unwrap_or_default();
        (
            table.column_names.clone(),
            table.numeric_columns(),
            filter_values,
            pending_numeric,
        )
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Analysis ----
            ui.checkbox(&mut state.show_analysis, "Show Analysis Options");
            if state.show_analysis {
                ui.indent("analysis", |ui: &mut Ui| {
                    ui.checkbox(&mut state.show_statistics, "Show Basic Statistics");

                    ui.checkbox(&mut state.show_filter, "Filter Data");
                    if state.show_filter {
                        ui.label("Choose a column to filter");
                        egui::ComboBox::from_id_salt("filter_column")
                            .selected_text(state.filter_column.clone().unwrap_or_default())
                            .show_ui(ui, |ui: &mut Ui| {
                                for col in &columns {
                                    if ui
                                        .selectable_label(
                                            state.filter_column.as_deref() == Some(col),
                                            col,
                                        )
                                        .clicked()
                                        && state.filter_column.as_deref() != Some(col)
                                    {
                                        state.filter_column = Some(col.clone());
                                        state.filter_value = None;
                                    }
                                }
                            });

                        ui.label("Choose a value");
                        let value_text = state
                            .filter_value
                            .as_ref()
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "choose a value".to_string());
                        egui::ComboBox::from_id_salt("filter_value")
                            .selected_text(value_text)
                            .show_ui(ui, |ui: &mut Ui| {
                                for value in &filter_values {
                                    let selected = state.filter_value.as_ref() == Some(value);
                                    if ui
                                        .selectable_label(selected, value.to_string())
                                        .clicked()
                                    {
                                        state.filter_value = Some(value.clone());
                                    }
                                }
                            });
                    }

                    ui.checkbox(&mut state.show_correlation, "Show Correlation Heatmap");
                });
            }

            ui.separator();

            // ---- Processing ----
            let mut show_processing = state.show_processing;
            if ui
                .checkbox(&mut show_processing, "Show Processing Options")
                .changed()
            {
                state.set_processing(show_processing);
            }
            if state.show_processing {
                ui.indent("processing", |ui: &mut Ui| {
                    ui.checkbox(&mut state.show_missing, "Handle Missing Data");
                    if state.show_missing {
                        ui.label("Choose how to handle missing data");
                        egui::ComboBox::from_id_salt("missing_policy")
                            .selected_text(state.missing_policy.label())
                            .show_ui(ui, |ui: &mut Ui| {
                                for policy in
                                    crate::data::transform::MissingPolicy::ALL
                                {
                                    ui.selectable_value(
                                        &mut state.missing_policy,
                                        policy,
                                        policy.label(),
                                    );
                                }
                            });
                        if ui.button("Apply Policy").clicked() {
                            state.run_missing_policy();
                        }
                        if let Some(report) = state.shape_report {
                            ui.label(format!("New dataset size: {:?}", report.new));
                            ui.label(format!("Old dataset size: {:?}", report.old));
                        }
                    }

                    ui.checkbox(&mut state.show_normalize, "Normalize Data");
                    if state.show_normalize {
                        column_combo(
                            ui,
                            "normalize_column",
                            "Choose a column to normalize",
                            &pending_numeric,
                            &mut state.normalize_column,
                        );
                        if ui.button("Normalize").clicked() {
                            state.run_normalization();
                        }
                    }

                    ui.checkbox(&mut state.show_duplicates, "Remove Duplicate Rows");
                    if state.show_duplicates && ui.button("Remove Duplicates").clicked() {
                        state.run_deduplication();
                    }

                    ui.separator();
                    if ui.button("Apply Changes").clicked() {
                        match state.apply_changes() {
                            Ok(()) => {
                                log::info!("pending changes applied");
                                state.status_message =
                                    Some("The changes have been applied.".to_string());
                            }
                            Err(e) => {
                                log::error!("apply failed: {e}");
                                state.status_message =
                                    Some(format!("The changes could not be applied: {e}"));
                            }
                        }
                    }
                    if ui.button("Download Processed Dataset").clicked() {
                        export_dialog(state);
                    }
                });
            }

            ui.separator();

            // ---- Visualization ----
            ui.checkbox(&mut state.show_visualization, "Show Visualization Options");
            if state.show_visualization {
                ui.indent("visualization", |ui: &mut Ui| {
                    ui.label("Choose chart type");
                    egui::ComboBox::from_id_salt("chart_kind")
                        .selected_text(state.chart_kind.label())
                        .show_ui(ui, |ui: &mut Ui| {
                            for kind in ChartKind::ALL {
                                ui.selectable_value(&mut state.chart_kind, kind, kind.label());
                            }
                        });

                    // Axis-type constraints: histograms and value axes only
                    // offer numeric columns.
                    match state.chart_kind {
                        ChartKind::Histogram => {
                            column_combo(
                                ui,
                                "chart_x",
                                "Choose column for histogram",
                                &numeric,
                                &mut state.chart_x,
                            );
                        }
                        ChartKind::Scatter => {
                            column_combo(ui, "chart_x", "X-axis column", &columns, &mut state.chart_x);
                            column_combo(ui, "chart_y", "Y-axis column", &columns, &mut state.chart_y);
                        }
                        ChartKind::Bar | ChartKind::Line => {
                            column_combo(ui, "chart_x", "X-axis column", &columns, &mut state.chart_x);
                            column_combo(ui, "chart_y", "Y-axis column", &numeric, &mut state.chart_y);
                        }
                    }
                });
            }
        });
}

/// A combo box over column names.
fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    current: &mut Option<String>,
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.clone().unwrap_or_else(|| "choose a column".to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                if ui
                    .selectable_label(current.as_deref() == Some(col), col)
                    .clicked()
                {
                    *current = Some(col.clone());
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – preview, statistics, filter results, charts
// ---------------------------------------------------------------------------

/// Render everything visible for the current state, top to bottom.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to explore it  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Dataset Preview");
            preview_table(ui, table, PREVIEW_ROWS, "preview");
            let (rows, cols) = table.shape();
            ui.label(format!("Dataset size: ({rows}, {cols})"));

            if state.show_analysis && state.show_statistics {
                ui.separator();
                ui.heading("Basic Statistics");
                describe_table(ui, table);
                ui.add_space(6.0);
                ui.strong("Count of missing values");
                missing_table(ui, table);
            }

            if state.show_analysis && state.show_filter {
                if let (Some(column), Some(value)) = (&state.filter_column, &state.filter_value)
                {
                    ui.separator();
                    ui.heading(format!("Filtered Data by {column} = {value}"));
                    let indices = filter::matching_rows(table, column, value);
                    let filtered = filter::subset(table, &indices);
                    preview_table(ui, &filtered, PREVIEW_ROWS, "filtered");
                    ui.label(format!("{} matching rows", filtered.rows.len()));
                }
            }

            if state.show_analysis && state.show_correlation {
                ui.separator();
                ui.heading("Correlation Heatmap (Numeric Columns Only)");
                plot::correlation_heatmap(ui, table);
            }

            if let Some(pending) = &state.pending {
                ui.separator();
                ui.heading("Pending Changes Preview");
                preview_table(ui, pending, PENDING_PREVIEW_ROWS, "pending");
                let (rows, cols) = pending.shape();
                ui.label(format!("Pending dataset size: ({rows}, {cols})"));
            }

            if state.show_visualization {
                ui.separator();
                ui.heading("Visualization");
                plot::chart_view(ui, state);
            }
        });
}

/// Render the first `limit` rows of a table as a grid.
fn preview_table(ui: &mut Ui, table: &Table, limit: usize, id: &str) {
    if table.column_names.is_empty() {
        ui.label("(no columns)");
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), table.column_names.len())
            .header(20.0, |mut header| {
                for name in &table.column_names {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in table.rows.iter().take(limit) {
                    body.row(18.0, |mut out| {
                        for cell in row {
                            out.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
    if table.rows.len() > limit {
        ui.label(format!("… {} more rows", table.rows.len() - limit));
    }
}

/// Descriptive summary of the numeric columns (`describe()` style).
fn describe_table(ui: &mut Ui, table: &Table) {
    let summaries = stats::describe(table);
    if summaries.is_empty() {
        ui.label("No numeric columns to describe.");
        return;
    }
    egui::Grid::new("describe_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for header in ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            {
                ui.strong(header);
            }
            ui.end_row();
            for s in &summaries {
                ui.label(&s.name);
                ui.label(s.count.to_string());
                for value in [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max] {
                    ui.label(format!("{value:.4}"));
                }
                ui.end_row();
            }
        });
}

/// Missing-value counts per column (`isna().sum()` style).
fn missing_table(ui: &mut Ui, table: &Table) {
    egui::Grid::new("missing_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("column");
            ui.strong("missing");
            ui.end_row();
            for (name, count) in stats::missing_counts(table) {
                ui.label(name);
                ui.label(count.to_string());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(table) => {
                let (rows, cols) = table.shape();
                log::info!(
                    "Loaded {rows} rows, {cols} columns: {:?}",
                    table.column_names
                );
                state.set_table(table);
            }
            Err(e) => {
                // A malformed upload leaves no table at all; a partial or
                // stale table is never shown.
                log::error!("Failed to load file: {e:#}");
                state.table = None;
                state.pending = None;
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(table) = &state.table else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Download processed dataset")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match loader::save_csv(table, &path) {
            Ok(()) => {
                log::info!("Exported dataset to {}", path.display());
                state.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
