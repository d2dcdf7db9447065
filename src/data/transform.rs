use std::collections::BTreeSet;

use anyhow::{Result, bail};

use super::model::{CellValue, ColumnKind, Table};
use super::stats::{mean, percentile};

// ---------------------------------------------------------------------------
// Missing-data policies
// ---------------------------------------------------------------------------

/// How to handle missing values; exactly one policy is applied per
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    FillMean,
    FillMedian,
    DropRows,
    DropColumns,
}

impl MissingPolicy {
    pub const ALL: [MissingPolicy; 4] = [
        MissingPolicy::FillMean,
        MissingPolicy::FillMedian,
        MissingPolicy::DropRows,
        MissingPolicy::DropColumns,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MissingPolicy::FillMean => "Fill with Mean",
            MissingPolicy::FillMedian => "Fill with Median",
            MissingPolicy::DropRows => "Drop Rows with Missing",
            MissingPolicy::DropColumns => "Drop Columns with Missing",
        }
    }
}

/// Apply one missing-data policy, returning the transformed table.
///
/// The fill policies replace nulls in numeric columns with that column's
/// mean / median; non-numeric columns keep their nulls.  The drop policies
/// remove any row / column containing at least one null anywhere.
pub fn handle_missing(table: &Table, policy: MissingPolicy) -> Table {
    match policy {
        MissingPolicy::FillMean => fill_numeric(table, |values| mean(values)),
        MissingPolicy::FillMedian => fill_numeric(table, |values| {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            percentile(&sorted, 0.5)
        }),
        MissingPolicy::DropRows => drop_rows_with_missing(table),
        MissingPolicy::DropColumns => drop_columns_with_missing(table),
    }
}

fn fill_numeric(table: &Table, fill_value: impl Fn(&[f64]) -> f64) -> Table {
    let mut out = table.clone();
    for idx in 0..out.column_names.len() {
        if out.column_kind(idx) != ColumnKind::Numeric {
            continue;
        }
        let values: Vec<f64> = out
            .rows
            .iter()
            .filter_map(|r| r[idx].as_f64())
            .collect();
        if values.is_empty() {
            // An all-null column has no defined mean / median; leave it.
            continue;
        }
        let fill = fill_value(&values);
        for row in &mut out.rows {
            if row[idx].is_null() {
                row[idx] = CellValue::Float(fill);
            }
        }
    }
    out
}

fn drop_rows_with_missing(table: &Table) -> Table {
    let rows = table
        .rows
        .iter()
        .filter(|row| !row.iter().any(CellValue::is_null))
        .cloned()
        .collect();
    Table::new(table.column_names.clone(), rows)
}

fn drop_columns_with_missing(table: &Table) -> Table {
    let keep: Vec<usize> = (0..table.column_names.len())
        .filter(|&idx| !table.rows.iter().any(|r| r[idx].is_null()))
        .collect();

    let column_names = keep.iter().map(|&i| table.column_names[i].clone()).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Table::new(column_names, rows)
}

// ---------------------------------------------------------------------------
// Min-max normalization
// ---------------------------------------------------------------------------

/// Rescale one numeric column to `[0, 1]` via `(x - min) / (max - min)`,
/// computed over the column's current non-null values; nulls stay null.
///
/// A constant column (max == min) is left unchanged instead of dividing by
/// zero.
pub fn normalize_column(table: &Table, name: &str) -> Result<Table> {
    let Some(idx) = table.column_index(name) else {
        bail!("No column named '{name}'");
    };
    if table.column_kind(idx) != ColumnKind::Numeric {
        bail!("Column '{name}' is not numeric");
    }

    let values: Vec<f64> = table.rows.iter().filter_map(|r| r[idx].as_f64()).collect();
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Ok(table.clone());
    };
    let max = values.iter().copied().fold(min, f64::max);
    let range = max - min;
    if range == 0.0 {
        return Ok(table.clone());
    }

    let mut out = table.clone();
    for row in &mut out.rows {
        if let Some(v) = row[idx].as_f64() {
            row[idx] = CellValue::Float((v - min) / range);
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Remove rows that are exact duplicates of an earlier row, keeping the
/// first occurrence and preserving order.
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen: BTreeSet<Vec<CellValue>> = BTreeSet::new();
    let rows = table
        .rows
        .iter()
        .filter(|row| seen.insert((*row).clone()))
        .cloned()
        .collect();
    Table::new(table.column_names.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    // Columns [A:int, B:float, C:str], 5 rows, one missing B value.
    const SAMPLE: &str = "\
A,B,C
1,1.0,x
2,2.0,y
1,3.0,x
4,,z
5,5.0,x
";

    fn sample() -> Table {
        read_csv(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn fill_mean_preserves_shape() {
        let t = sample();
        let filled = handle_missing(&t, MissingPolicy::FillMean);
        assert_eq!(filled.shape(), t.shape());
        // B = [1, 2, 3, 5] → mean 2.75
        assert_eq!(filled.rows[3][1], CellValue::Float(2.75));
    }

    #[test]
    fn fill_median_preserves_shape() {
        let t = sample();
        let filled = handle_missing(&t, MissingPolicy::FillMedian);
        assert_eq!(filled.shape(), t.shape());
        // B = [1, 2, 3, 5] → median 2.5
        assert_eq!(filled.rows[3][1], CellValue::Float(2.5));
    }

    #[test]
    fn fill_leaves_non_numeric_nulls() {
        let t = read_csv("n,s\n,\n1,a\n".as_bytes()).unwrap();
        let filled = handle_missing(&t, MissingPolicy::FillMean);
        assert_eq!(filled.rows[0][0], CellValue::Float(1.0));
        assert_eq!(filled.rows[0][1], CellValue::Null);
    }

    #[test]
    fn drop_rows_removes_offending_rows_only() {
        let t = sample();
        let dropped = handle_missing(&t, MissingPolicy::DropRows);
        assert_eq!(dropped.shape(), (4, 3));
        assert!(dropped.rows.iter().all(|r| !r.iter().any(|c| c.is_null())));
    }

    #[test]
    fn drop_columns_removes_offending_columns_only() {
        let t = sample();
        let dropped = handle_missing(&t, MissingPolicy::DropColumns);
        assert_eq!(dropped.shape(), (5, 2));
        assert_eq!(dropped.column_names, vec!["A", "C"]);
    }

    #[test]
    fn normalize_maps_min_to_zero_and_max_to_one() {
        let t = sample();
        let normed = normalize_column(&t, "A").unwrap();
        let values = normed.numeric_values("A");
        // A = [1, 2, 1, 4, 5]
        assert_eq!(values[0], 0.0);
        assert_eq!(values[4], 1.0);
        assert!((values[3] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn normalize_round_trips_with_stored_extremes() {
        let t = sample();
        let original = t.numeric_values("A");
        let min = 1.0;
        let max = 5.0;
        let normed = normalize_column(&t, "A").unwrap();
        for (norm, orig) in normed.numeric_values("A").iter().zip(&original) {
            assert!((norm * (max - min) + min - orig).abs() < 1e-12);
        }
    }

    #[test]
    fn normalize_constant_column_is_unchanged() {
        let t = read_csv("k\n7\n7\n7\n".as_bytes()).unwrap();
        let normed = normalize_column(&t, "k").unwrap();
        assert_eq!(normed, t);
    }

    #[test]
    fn normalize_rejects_non_numeric_column() {
        assert!(normalize_column(&sample(), "C").is_err());
    }

    #[test]
    fn drop_duplicates_keeps_first_occurrence() {
        let t = read_csv("a,b\n1,x\n2,y\n1,x\n3,z\n".as_bytes()).unwrap();
        let deduped = drop_duplicates(&t);
        assert_eq!(deduped.shape(), (3, 2));
        assert_eq!(deduped.rows[0][0], CellValue::Integer(1));
        assert_eq!(deduped.rows[1][0], CellValue::Integer(2));
        assert_eq!(deduped.rows[2][0], CellValue::Integer(3));
    }

    #[test]
    fn drop_duplicates_is_idempotent() {
        let t = read_csv("a,b\n1,x\n2,y\n1,x\n".as_bytes()).unwrap();
        let once = drop_duplicates(&t);
        let twice = drop_duplicates(&once);
        assert_eq!(once, twice);
    }
}
