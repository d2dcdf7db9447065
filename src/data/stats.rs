use super::model::Table;

// ---------------------------------------------------------------------------
// Descriptive summary (count / mean / std / quartiles / min / max)
// ---------------------------------------------------------------------------

/// Summary statistics of one numeric column, matching `df.describe()`:
/// missing entries are excluded, `std` is the sample standard deviation and
/// quartiles use linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Describe every numeric column of the table.  A table without numeric
/// columns yields an empty summary rather than an error.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .numeric_columns()
        .into_iter()
        .map(|name| {
            let mut values = table.numeric_values(&name);
            values.sort_by(f64::total_cmp);
            summarize(name, &values)
        })
        .collect()
}

fn summarize(name: String, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    ColumnSummary {
        name,
        count,
        mean: mean(sorted),
        std: sample_std(sorted),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: percentile(sorted, 0.25),
        median: percentile(sorted, 0.5),
        q75: percentile(sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Linear-interpolated percentile over a sorted slice, `q` in `[0, 1]`.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Missing-value counts
// ---------------------------------------------------------------------------

/// Count of null cells per column, in column order (like `df.isna().sum()`).
pub fn missing_counts(table: &Table) -> Vec<(String, usize)> {
    table
        .column_names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let n = table.rows.iter().filter(|r| r[idx].is_null()).count();
            (name.clone(), n)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation among the numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Column names on both axes, in column order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation between columns `i` and `j`.
    pub values: Vec<Vec<f64>>,
}

/// Compute the correlation matrix over numeric columns; `None` when the
/// table has no numeric columns.  Each pair uses the rows where both values
/// are present (pairwise-complete, like `df.corr()`).
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    let columns = table.numeric_columns();
    if columns.is_empty() {
        return None;
    }

    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = table
                .rows
                .iter()
                .filter_map(|row| {
                    let a = row[indices[i]].as_f64()?;
                    let b = row[indices[j]].as_f64()?;
                    Some((a, b))
                })
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix { columns, values })
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    // Zero variance on either side leaves the correlation undefined.
    cov / (var_a.sqrt() * var_b.sqrt())
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
    fn describe_excludes_missing_entries() {
        let summaries = describe(&sample());
        assert_eq!(summaries.len(), 2);
        let b = &summaries[1];
        assert_eq!(b.name, "B");
        assert_eq!(b.count, 4);
        assert!((b.mean - 2.75).abs() < 1e-12);
        assert_eq!(b.min, 1.0);
        assert_eq!(b.max, 5.0);
    }

    #[test]
    fn describe_quartiles_interpolate() {
        let summaries = describe(&sample());
        let a = &summaries[0];
        // A = [1, 1, 2, 4, 5]
        assert_eq!(a.median, 2.0);
        assert_eq!(a.q25, 1.0);
        assert_eq!(a.q75, 4.0);
    }

    #[test]
    fn describe_on_no_numeric_columns_is_empty() {
        let table = read_csv("name\nfoo\nbar\n".as_bytes()).unwrap();
        assert!(describe(&table).is_empty());
    }

    #[test]
    fn missing_counts_per_column() {
        let counts = missing_counts(&sample());
        assert_eq!(
            counts,
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 0)
            ]
        );
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let m = correlation_matrix(&sample()).unwrap();
        assert_eq!(m.columns, vec!["A", "B"]);
        assert_eq!(m.values[0][0], 1.0);
        assert_eq!(m.values[1][1], 1.0);
        assert_eq!(m.values[0][1], m.values[1][0]);
    }

    #[test]
    fn perfectly_correlated_columns() {
        let table = read_csv("x,y\n1,2\n2,4\n3,6\n".as_bytes()).unwrap();
        let m = correlation_matrix(&table).unwrap();
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_numeric_columns_yields_none() {
        let table = read_csv("name\nfoo\nbar\n".as_bytes()).unwrap();
        assert!(correlation_matrix(&table).is_none());
    }
}
