use crate::metrics::MetricsError;
use std::error::Error;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// A single table cell as read from the source file
///
/// CSV cells arrive as text and are coerced later; Excel cells keep the
/// type calamine reports.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Empty => Ok(()),
        }
    }
}

/// An uploaded table: one header row plus data rows
///
/// The first row of the source file is always treated as the header row,
/// matching how the upload page describes the expected file layout.
#[derive(Clone, Debug)]
pub struct CitationTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl CitationTable {
    /// Render the first `n` data rows as display strings for the results page
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }
}

/// How the citation column is picked out of the uploaded table
///
/// Resolved once per upload, before anything reaches the calculator. The
/// two variants cover both column-selection strategies the tool supports:
/// a fixed position and a header-name lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnSelector {
    /// Zero-based positional index into the header row
    ByIndex(usize),

    /// Header name, matched case-insensitively after trimming
    ByName(String),
}

impl ColumnSelector {
    /// Parse a user-supplied column argument
    ///
    /// A string of digits selects by position ("12" → 13th column);
    /// anything else selects by header name ("Cited by").
    pub fn parse(arg: &str) -> ColumnSelector {
        let trimmed = arg.trim();
        match trimmed.parse::<usize>() {
            Ok(index) => ColumnSelector::ByIndex(index),
            Err(_) => ColumnSelector::ByName(trimmed.to_string()),
        }
    }

    /// Resolve this selector against a table's header row
    ///
    /// `ByIndex(i)` is valid when `i` is within the header row. `ByName`
    /// matches the first header that compares equal after trimming and
    /// ASCII case folding.
    ///
    /// # Errors
    /// * `MetricsError::InvalidInput` when the column does not exist
    pub fn resolve(&self, table: &CitationTable) -> Result<usize, MetricsError> {
        match self {
            ColumnSelector::ByIndex(index) => {
                if *index < table.headers.len() {
                    Ok(*index)
                } else {
                    Err(MetricsError::InvalidInput(format!(
                        "citation column not found: index {} out of range (file has {} columns)",
                        index,
                        table.headers.len()
                    )))
                }
            }
            ColumnSelector::ByName(name) => {
                let wanted = name.trim();
                table
                    .headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        MetricsError::InvalidInput(format!(
                            "citation column not found: no header named {:?}",
                            wanted
                        ))
                    })
            }
        }
    }
}

impl Default for ColumnSelector {
    /// Column index 12, the layout the upload page documents
    fn default() -> Self {
        ColumnSelector::ByIndex(12)
    }
}

/// Parse a CSV file's bytes into a table
///
/// The first line is the header row. Quoting and escaped quotes are
/// handled field by field; every cell arrives as text and is coerced when
/// the citation column is extracted.
///
/// # Arguments
/// * `bytes` - Raw file content as uploaded
///
/// # Returns
/// * `Result<CitationTable, Box<dyn Error>>` - The parsed table or an error
pub fn table_from_csv_bytes(bytes: &[u8]) -> Result<CitationTable, Box<dyn Error>> {
    let content = std::str::from_utf8(bytes).map_err(|_| "CSV file is not valid UTF-8")?;
    let mut lines = content.lines();

    let header_line = lines.next().ok_or("CSV file is empty")?;
    let headers = parse_csv_row(header_line)?
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let cells = parse_csv_row(line)?
            .into_iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field)
                }
            })
            .collect();
        rows.push(cells);
    }

    Ok(CitationTable { headers, rows })
}

/// Parse an Excel (XLSX) file's bytes into a table
///
/// Reads the first worksheet. The first row is the header row; remaining
/// rows keep the cell types calamine reports.
///
/// # Arguments
/// * `bytes` - Raw file content as uploaded
///
/// # Returns
/// * `Result<CitationTable, Box<dyn Error>>` - The parsed table or an error
pub fn table_from_xlsx_bytes(bytes: &[u8]) -> Result<CitationTable, Box<dyn Error>> {
    use calamine::{Data, Reader, Xlsx};

    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or("No sheets found in Excel file")?
        .clone();

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .ok_or("Excel sheet is empty")?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for row in row_iter {
        let cells = row
            .iter()
            .map(|cell| match cell {
                Data::Int(i) => CellValue::Int(*i),
                Data::Float(f) => CellValue::Float(*f),
                Data::String(s) => {
                    if s.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(s.clone())
                    }
                }
                Data::Bool(b) => CellValue::Text(b.to_string()),
                Data::Empty => CellValue::Empty,
                // Dates, durations and error cells carry no citation count
                _ => CellValue::Empty,
            })
            .collect();
        rows.push(cells);
    }

    Ok(CitationTable { headers, rows })
}

/// Detect file type from the filename and parse accordingly
///
/// Dispatches on the extension: `.csv` or `.xlsx`/`.xls`. Uploads keep
/// their original filename, so the same rule serves both the web upload
/// and the CLI.
///
/// # Arguments
/// * `filename` - Original name of the file (only the extension matters)
/// * `bytes` - Raw file content
///
/// # Returns
/// * `Result<CitationTable, Box<dyn Error>>` - The parsed table or an error
pub fn table_from_bytes(filename: &str, bytes: &[u8]) -> Result<CitationTable, Box<dyn Error>> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("csv") => table_from_csv_bytes(bytes),
        Some("xlsx") | Some("xls") => table_from_xlsx_bytes(bytes),
        Some(ext) => Err(format!("Unsupported file extension: {}", ext).into()),
        None => Err("File has no extension".into()),
    }
}

/// Load a table from a file on disk
///
/// # Examples
/// ```no_run
/// use citemetrics::loader::table_from_path;
///
/// match table_from_path("citations.csv") {
///     Ok(table) => println!("Loaded {} rows", table.rows.len()),
///     Err(e) => eprintln!("Error loading file: {}", e),
/// }
/// ```
pub fn table_from_path(filepath: impl AsRef<Path>) -> Result<CitationTable, Box<dyn Error>> {
    let path = filepath.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("Invalid file path")?;
    table_from_bytes(filename, &bytes)
}

/// Extract the citation column as a clean list of integers
///
/// This is the validation step between the raw table and the calculator:
/// empty cells and non-numeric text are dropped, numeric text is coerced,
/// floats are truncated to integers. The calculator only ever sees the
/// clean list this produces.
///
/// # Errors
/// * `MetricsError::InvalidInput` if the column cannot be resolved or a
///   coerced value is negative
pub fn extract_citations(
    table: &CitationTable,
    selector: &ColumnSelector,
) -> Result<Vec<i64>, MetricsError> {
    let col = selector.resolve(table)?;

    let mut citations = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let cell = row.get(col).unwrap_or(&CellValue::Empty);
        if let Some(count) = coerce_count(cell) {
            if count < 0 {
                return Err(MetricsError::InvalidInput(format!(
                    "negative citation count {} in column {}",
                    count, col
                )));
            }
            citations.push(count);
        }
    }

    Ok(citations)
}

// Coerce one cell to a citation count; None drops the row.
fn coerce_count(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        CellValue::Float(_) => None,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Some(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Some(f.trunc() as i64),
                _ => None,
            }
        }
        CellValue::Empty => None,
    }
}

// Parse a CSV row into a vector of strings
fn parse_csv_row(line: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Double quote inside quoted field - add a single quote
                        current_field.push('"');
                        chars.next();
                    } else {
                        // Toggle quote state
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                // End of field
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    // Add the last field
    result.push(current_field);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csv() -> &'static [u8] {
        b"Title,Year,Cited by\n\
          \"Paper, the first\",2019,10\n\
          Paper B,2020,8\n\
          Paper C,2021,\n\
          Paper D,2021,n/a\n\
          Paper E,2022,3\n"
    }

    #[test]
    fn csv_parses_headers_and_rows() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        assert_eq!(table.headers, vec!["Title", "Year", "Cited by"]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(
            table.rows[0][0],
            CellValue::Text("Paper, the first".to_string())
        );
    }

    #[test]
    fn csv_empty_file_is_an_error() {
        assert!(table_from_csv_bytes(b"").is_err());
    }

    #[test]
    fn csv_quoted_quotes_unescape() {
        let table = table_from_csv_bytes(b"Title\n\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("say \"hi\"".to_string()));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(table_from_bytes("data.parquet", b"x").is_err());
        assert!(table_from_bytes("data", b"x").is_err());
    }

    #[test]
    fn selector_parse_digits_vs_name() {
        assert_eq!(ColumnSelector::parse("12"), ColumnSelector::ByIndex(12));
        assert_eq!(
            ColumnSelector::parse("Cited by"),
            ColumnSelector::ByName("Cited by".to_string())
        );
    }

    #[test]
    fn selector_default_is_index_12() {
        assert_eq!(ColumnSelector::default(), ColumnSelector::ByIndex(12));
    }

    #[test]
    fn resolve_by_name_is_case_insensitive() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        let selector = ColumnSelector::ByName("cited BY".to_string());
        assert_eq!(selector.resolve(&table), Ok(2));
    }

    #[test]
    fn resolve_missing_name_reports_column_not_found() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        let selector = ColumnSelector::ByName("Citations".to_string());
        let err = selector.resolve(&table).unwrap_err();
        assert!(err.to_string().contains("citation column not found"));
    }

    #[test]
    fn resolve_index_out_of_range() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        let selector = ColumnSelector::ByIndex(12);
        assert!(selector.resolve(&table).is_err());
        assert_eq!(ColumnSelector::ByIndex(2).resolve(&table), Ok(2));
    }

    #[test]
    fn extract_drops_missing_and_non_numeric() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        let selector = ColumnSelector::ByName("Cited by".to_string());
        let citations = extract_citations(&table, &selector).unwrap();
        // blank and "n/a" rows are dropped
        assert_eq!(citations, vec![10, 8, 3]);
    }

    #[test]
    fn extract_truncates_float_text() {
        let table = table_from_csv_bytes(b"Cited by\n7.9\n2.0\n").unwrap();
        let citations = extract_citations(&table, &ColumnSelector::ByIndex(0)).unwrap();
        assert_eq!(citations, vec![7, 2]);
    }

    #[test]
    fn extract_rejects_negative_counts() {
        let table = table_from_csv_bytes(b"Cited by\n5\n-2\n").unwrap();
        let err = extract_citations(&table, &ColumnSelector::ByIndex(0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidInput(_)));
    }

    #[test]
    fn extract_treats_short_rows_as_empty() {
        let table = table_from_csv_bytes(b"Title,Cited by\nonly-title\nPaper,4\n").unwrap();
        let citations =
            extract_citations(&table, &ColumnSelector::ByName("Cited by".to_string())).unwrap();
        assert_eq!(citations, vec![4]);
    }

    #[test]
    fn preview_renders_display_strings() {
        let table = table_from_csv_bytes(sample_csv()).unwrap();
        let preview = table.preview(2);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0], vec!["Paper, the first", "2019", "10"]);
    }

    #[test]
    fn xlsx_round_trips_through_calamine() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Title").unwrap();
        worksheet.write_string(0, 1, "Cited by").unwrap();
        worksheet.write_string(1, 0, "Paper A").unwrap();
        worksheet.write_number(1, 1, 12).unwrap();
        worksheet.write_string(2, 0, "Paper B").unwrap();
        worksheet.write_number(2, 1, 3.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = table_from_xlsx_bytes(&bytes).unwrap();
        assert_eq!(table.headers, vec!["Title", "Cited by"]);

        let citations =
            extract_citations(&table, &ColumnSelector::ByName("Cited by".to_string())).unwrap();
        assert_eq!(citations, vec![12, 3]);
    }
}
