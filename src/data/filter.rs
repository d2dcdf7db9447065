use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Equality filter: one column, one of its observed values
// ---------------------------------------------------------------------------

/// Return indices of rows whose value in `column` equals `value`, using
/// strict equality on the column's native type.  A read-only view; the
/// table is never mutated.
pub fn matching_rows(table: &Table, column: &str, value: &CellValue) -> Vec<usize> {
    let Some(idx) = table.column_index(column) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| &row[idx] == value)
        .map(|(i, _)| i)
        .collect()
}

/// Materialize a row subset as its own table, preserving column order.
pub fn subset(table: &Table, indices: &[usize]) -> Table {
    let rows = indices.iter().map(|&i| table.rows[i].clone()).collect();
    Table::new(table.column_names.clone(), rows)
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
4,4.0,z
5,5.0,x
";

    fn sample() -> Table {
        read_csv(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn filter_matches_exactly() {
        let t = sample();
        let rows = matching_rows(&t, "A", &CellValue::Integer(1));
        assert_eq!(rows, vec![0, 2]);
        let filtered = subset(&t, &rows);
        assert_eq!(filtered.shape(), (2, 3));
        assert_eq!(filtered.column_names, t.column_names);
    }

    #[test]
    fn matching_and_rest_partition_the_table() {
        let t = sample();
        let matched = matching_rows(&t, "C", &CellValue::Text("x".into()));
        let rest: Vec<usize> = (0..t.rows.len()).filter(|i| !matched.contains(i)).collect();
        assert_eq!(matched.len() + rest.len(), t.rows.len());
        let mut all: Vec<usize> = matched.iter().chain(rest.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..t.rows.len()).collect::<Vec<_>>());
    }

    #[test]
    fn equality_is_typed() {
        let t = sample();
        // The text "1" never matches the integer 1.
        assert!(matching_rows(&t, "A", &CellValue::Text("1".into())).is_empty());
    }

    #[test]
    fn unknown_column_matches_nothing() {
        assert!(matching_rows(&sample(), "missing", &CellValue::Integer(1)).is_empty());
    }
}
