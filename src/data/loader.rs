use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Only `.csv` is accepted; the extension filter
/// mirrors the upload control.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        bail!("Unsupported file extension: .{ext}");
    }

    let file = std::fs::File::open(path).context("opening CSV file")?;
    read_csv(file)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Parse CSV text from any reader into a [`Table`].
///
/// Layout: header row with column names, comma delimiter.  Cell types are
/// guessed per cell (integer, float, bool, text); empty cells become
/// [`CellValue::Null`].  Any parse failure propagates — no partial table is
/// ever produced.
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: has {} fields, expected {}",
                record.len(),
                headers.len()
            );
        }
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Table::new(headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// File name offered for the exported dataset.
pub const EXPORT_FILE_NAME: &str = "processed_dataset.csv";

/// Serialize the table to CSV text: header row, no index column, null cells
/// written as empty fields.
pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&table.column_names)
        .context("writing CSV header")?;

    for (row_no, row) in table.rows.iter().enumerate() {
        let fields: Vec<String> = row.iter().map(cell_to_field).collect();
        writer
            .write_record(&fields)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Serialize the table and write it to the given path.
pub fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let text = to_csv_string(table)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn cell_to_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
a,b,c
1,0.5,x
2,,y
3,1.5,x
";

    #[test]
    fn ingestion_shape_matches_content() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_names, vec!["a", "b", "c"]);
    }

    #[test]
    fn cell_types_are_guessed() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.rows[0][0], CellValue::Integer(1));
        assert_eq!(table.rows[0][1], CellValue::Float(0.5));
        assert_eq!(table.rows[1][1], CellValue::Null);
        assert_eq!(table.rows[0][2], CellValue::Text("x".into()));
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let bad = "a,b\n1,2\n3\n";
        assert!(read_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn export_then_reimport_round_trips() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let text = to_csv_string(&table).unwrap();
        let again = read_csv(text.as_bytes()).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn export_has_no_index_column() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let text = to_csv_string(&table).unwrap();
        assert!(text.starts_with("a,b,c\n"));
    }
}
