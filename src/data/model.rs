use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a key in `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the cell counts as missing.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred per-column type
// ---------------------------------------------------------------------------

/// Inferred column type: numeric columns take part in statistics,
/// correlation and numeric chart axes; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Other,
}

// ---------------------------------------------------------------------------
// Table – the working dataset
// ---------------------------------------------------------------------------

/// The in-memory table: an ordered list of column names plus row-major cells.
/// Invariant: every row has exactly `column_names.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column names from the CSV header.
    pub column_names: Vec<String>,
    /// Row-major cell storage; `rows[r][c]` is the cell of column `c`.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == column_names.len()));
        Table { column_names, rows }
    }

    /// (row count, column count), matching the Pandas `df.shape` readout.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.column_names.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Infer the kind of a column: `Numeric` when every non-null cell is an
    /// integer or float.  An all-null column also counts as numeric, matching
    /// the Pandas float64 dtype of an all-NaN column.
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        let numeric = self
            .rows
            .iter()
            .map(|r| &r[idx])
            .filter(|c| !c.is_null())
            .all(|c| c.as_f64().is_some());
        if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Other
        }
    }

    /// Names of the numeric-typed columns, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .enumerate()
            .filter(|(i, _)| self.column_kind(*i) == ColumnKind::Numeric)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Non-null values of a numeric column as `f64`, in row order.
    pub fn numeric_values(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|cells| cells.iter().filter_map(|c| c.as_f64()).collect())
            .unwrap_or_default()
    }

    /// Distinct values of a column in first-appearance order, like
    /// `df[column].unique()`.
    pub fn unique_values(&self, name: &str) -> Vec<CellValue> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        let mut seen: BTreeSet<CellValue> = BTreeSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let val = &row[idx];
            if seen.insert(val.clone()) {
                out.push(val.clone());
            }
        }
        out
    }

    /// Check the equal-length invariant; `Err((row, width))` names the first
    /// offending row.
    pub fn validate(&self) -> Result<(), (usize, usize)> {
        let width = self.column_names.len();
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err((i, row.len()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![
                    CellValue::Integer(1),
                    CellValue::Float(0.5),
                    CellValue::Text("x".into()),
                ],
                vec![
                    CellValue::Integer(2),
                    CellValue::Null,
                    CellValue::Text("y".into()),
                ],
                vec![
                    CellValue::Integer(1),
                    CellValue::Float(1.5),
                    CellValue::Text("x".into()),
                ],
            ],
        )
    }

    #[test]
    fn shape_reports_rows_then_columns() {
        assert_eq!(sample().shape(), (3, 3));
    }

    #[test]
    fn column_kind_inference() {
        let t = sample();
        assert_eq!(t.column_kind(0), ColumnKind::Numeric);
        // A null cell does not break numeric inference.
        assert_eq!(t.column_kind(1), ColumnKind::Numeric);
        assert_eq!(t.column_kind(2), ColumnKind::Other);
        assert_eq!(t.numeric_columns(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unique_values_keep_appearance_order() {
        let t = sample();
        assert_eq!(
            t.unique_values("a"),
            vec![CellValue::Integer(1), CellValue::Integer(2)]
        );
        assert_eq!(
            t.unique_values("c"),
            vec![CellValue::Text("x".into()), CellValue::Text("y".into())]
        );
    }

    #[test]
    fn validate_catches_ragged_rows() {
        let mut t = sample();
        t.rows[1].pop();
        assert_eq!(t.validate(), Err((1, 2)));
    }
}
