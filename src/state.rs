use thiserror::Error;

use crate::data::model::{CellValue, Table};
use crate::data::transform::{self, MissingPolicy};

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Scatter,
    Bar,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Histogram,
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::Line,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Plot",
        }
    }
}

// ---------------------------------------------------------------------------
// Apply/confirm failure
// ---------------------------------------------------------------------------

/// Why confirming pending changes failed.  The working table is left
/// untouched in every case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("there are no pending changes to apply")]
    NothingPending,
    #[error("pending table is corrupt: row {row} has {width} cells")]
    RaggedRow { row: usize, width: usize },
}

// ---------------------------------------------------------------------------
// Shape reporting after a transform
// ---------------------------------------------------------------------------

/// Old and new `(rows, columns)` of the pending table around a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeReport {
    pub old: (usize, usize),
    pub new: (usize, usize),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  Every interaction mutates
/// this struct and the next frame re-renders the whole visible state from
/// it; there are no ambient globals.
pub struct AppState {
    /// Working table (None until a file is loaded).
    pub table: Option<Table>,

    /// Draft copy accumulating unconfirmed transforms; exists only while
    /// the processing panel is open.
    pub pending: Option<Table>,

    // -- Panel toggles, mirroring the analysis / processing / visualization
    // -- sections of the UI.
    pub show_analysis: bool,
    pub show_statistics: bool,
    pub show_filter: bool,
    pub show_correlation: bool,
    pub show_processing: bool,
    pub show_missing: bool,
    pub show_normalize: bool,
    pub show_duplicates: bool,
    pub show_visualization: bool,

    // -- Selections, validated against the current table on every render.
    pub filter_column: Option<String>,
    pub filter_value: Option<CellValue>,
    pub missing_policy: MissingPolicy,
    pub normalize_column: Option<String>,
    pub chart_kind: ChartKind,
    pub chart_x: Option<String>,
    pub chart_y: Option<String>,

    /// Shape change reported by the last pending-table transform.
    pub shape_report: Option<ShapeReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            pending: None,
            show_analysis: false,
            show_statistics: false,
            show_filter: false,
            show_correlation: false,
            show_processing: false,
            show_missing: false,
            show_normalize: false,
            show_duplicates: false,
            show_visualization: false,
            filter_column: None,
            filter_value: None,
            missing_policy: MissingPolicy::FillMean,
            normalize_column: None,
            chart_kind: ChartKind::Histogram,
            chart_x: None,
            chart_y: None,
            shape_report: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table, dropping all per-table state.
    pub fn set_table(&mut self, table: Table) {
        self.pending = None;
        self.filter_column = table.column_names.first().cloned();
        self.filter_value = None;
        self.normalize_column = table.numeric_columns().first().cloned();
        self.chart_x = None;
        self.chart_y = None;
        self.shape_report = None;
        self.status_message = None;
        self.table = Some(table);
    }

    /// Open or close the processing panel.  Opening creates the pending
    /// copy; closing discards unconfirmed edits.
    pub fn set_processing(&mut self, open: bool) {
        self.show_processing = open;
        if open {
            if self.pending.is_none() {
                self.pending = self.table.clone();
            }
        } else {
            self.discard_pending();
        }
    }

    /// Drop the pending copy without touching the working table.
    pub fn discard_pending(&mut self) {
        self.pending = None;
        self.shape_report = None;
    }

    /// Apply the selected missing-data policy to the pending copy and
    /// record the shape change.
    pub fn run_missing_policy(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        let old = pending.shape();
        let transformed = transform::handle_missing(pending, self.missing_policy);
        let new = transformed.shape();
        self.pending = Some(transformed);
        self.shape_report = Some(ShapeReport { old, new });
        self.status_message = Some(format!("{} done.", self.missing_policy.label()));
        log::info!(
            "{}: shape {:?} -> {:?}",
            self.missing_policy.label(),
            old,
            new
        );
    }

    /// Min-max normalize the selected numeric column of the pending copy.
    pub fn run_normalization(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        let Some(column) = self.normalize_column.clone() else {
            self.status_message = Some("No numeric column selected.".to_string());
            return;
        };
        match transform::normalize_column(pending, &column) {
            Ok(normalized) => {
                self.pending = Some(normalized);
                self.status_message = Some(format!("Normalized column: {column}"));
            }
            Err(e) => {
                log::error!("normalization failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Remove duplicate rows from the pending copy.
    pub fn run_deduplication(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        let old = pending.shape();
        let deduped = transform::drop_duplicates(pending);
        let new = deduped.shape();
        self.pending = Some(deduped);
        self.shape_report = Some(ShapeReport { old, new });
        self.status_message = Some("Duplicate rows removed.".to_string());
    }

    /// Replace the working table with the pending copy.  On failure the
    /// working table is left unchanged and the cause is reported.
    pub fn apply_changes(&mut self) -> Result<(), ApplyError> {
        let pending = self.pending.take().ok_or(ApplyError::NothingPending)?;
        if let Err((row, width)) = pending.validate() {
            self.pending = Some(pending);
            return Err(ApplyError::RaggedRow { row, width });
        }
        // Re-open the draft from the new working table so further edits
        // chain instead of resurrecting the pre-apply state.
        self.pending = Some(pending.clone());
        self.table = Some(pending);
        self.shape_report = None;
        self.prune_selections();
        Ok(())
    }

    /// Drop selections that no longer name an existing column; selection
    /// lists are derived freshly from the current table on every render.
    pub fn prune_selections(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let keep = |sel: &Option<String>| {
            sel.as_deref()
                .is_some_and(|name| table.column_index(name).is_some())
        };
        if !keep(&self.filter_column) {
            self.filter_column = table.column_names.first().cloned();
            self.filter_value = None;
        }
        if !keep(&self.normalize_column) {
            self.normalize_column = table.numeric_columns().first().cloned();
        }
        if !keep(&self.chart_x) {
            self.chart_x = None;
        }
        if !keep(&self.chart_y) {
            self.chart_y = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const SAMPLE: &str = "\
A,B,C
1,1.0,x
2,2.0,y
1,3.0,x
4,,z
5,5.0,x
";

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_table(read_csv(SAMPLE.as_bytes()).unwrap());
        state
    }

    #[test]
    fn opening_processing_creates_pending_copy() {
        let mut state = loaded_state();
        state.set_processing(true);
        assert_eq!(state.pending, state.table);
    }

    #[test]
    fn closing_processing_discards_pending() {
        let mut state = loaded_state();
        state.set_processing(true);
        state.missing_policy = MissingPolicy::DropRows;
        state.run_missing_policy();
        state.set_processing(false);
        assert!(state.pending.is_none());
        // Working table untouched.
        assert_eq!(state.table.as_ref().unwrap().shape(), (5, 3));
    }

    #[test]
    fn drop_rows_then_apply_replaces_table() {
        let mut state = loaded_state();
        state.set_processing(true);
        state.missing_policy = MissingPolicy::DropRows;
        state.run_missing_policy();
        assert_eq!(
            state.shape_report,
            Some(ShapeReport {
                old: (5, 3),
                new: (4, 3)
            })
        );
        state.apply_changes().unwrap();
        assert_eq!(state.table.as_ref().unwrap().shape(), (4, 3));
    }

    #[test]
    fn transforms_chain_on_the_pending_copy() {
        let mut state = loaded_state();
        state.set_processing(true);
        state.missing_policy = MissingPolicy::FillMean;
        state.run_missing_policy();
        state.run_normalization();
        state.run_deduplication();
        state.apply_changes().unwrap();
        let table = state.table.as_ref().unwrap();
        assert_eq!(table.shape().1, 3);
        assert!(table.rows.iter().all(|r| !r.iter().any(|c| c.is_null())));
    }

    #[test]
    fn apply_without_pending_fails() {
        let mut state = loaded_state();
        assert_eq!(state.apply_changes(), Err(ApplyError::NothingPending));
    }

    #[test]
    fn apply_with_ragged_pending_keeps_table() {
        let mut state = loaded_state();
        state.set_processing(true);
        if let Some(pending) = &mut state.pending {
            pending.rows[2].pop();
        }
        assert_eq!(
            state.apply_changes(),
            Err(ApplyError::RaggedRow { row: 2, width: 2 })
        );
        assert_eq!(state.table.as_ref().unwrap().shape(), (5, 3));
    }

    #[test]
    fn stale_selections_are_pruned_after_apply() {
        let mut state = loaded_state();
        state.filter_column = Some("B".to_string());
        state.normalize_column = Some("B".to_string());
        state.set_processing(true);
        state.missing_policy = MissingPolicy::DropColumns;
        state.run_missing_policy();
        state.apply_changes().unwrap();
        // B is gone; selections fall back to existing columns.
        assert_eq!(state.filter_column.as_deref(), Some("A"));
        assert_eq!(state.normalize_column.as_deref(), Some("A"));
    }
}
