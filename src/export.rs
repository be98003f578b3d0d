use crate::metrics::Analysis;
use std::error::Error;

/// Convert an analysis to CSV format
///
/// Produces one `rank,citations` row per paper in upload order, followed
/// by the computed indices as summary rows. Commas, quotes and newlines
/// in header-derived values are escaped; the numeric body never needs it,
/// but the escaping rule is applied uniformly.
///
/// # Arguments
/// * `analysis` - The analysed upload to export
///
/// # Returns
/// * `Result<String, Box<dyn Error>>` - CSV content as a string or an error
pub fn to_csv(analysis: &Analysis) -> Result<String, Box<dyn Error>> {
    let mut csv_content = String::new();

    csv_content.push_str("rank,citations\n");
    for (rank, count) in analysis.citations.iter().enumerate() {
        csv_content.push_str(&format!("{},{}\n", rank + 1, count));
    }

    csv_content.push('\n');
    csv_content.push_str(&format!("{},{}\n", escape_field("h_index"), analysis.summary.h_index));
    csv_content.push_str(&format!(
        "{},{}\n",
        escape_field("i10_index"),
        analysis.summary.i10_index
    ));
    csv_content.push_str(&format!(
        "{},{}\n",
        escape_field("total_citations"),
        analysis.summary.total_citations
    ));

    Ok(csv_content)
}

/// Convert an analysis to XLSX format
///
/// Writes the same content as [`to_csv`] into an Excel workbook using the
/// rust_xlsxwriter library and returns the file as an in-memory buffer,
/// ready to serve as a download.
///
/// # Arguments
/// * `analysis` - The analysed upload to export
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
pub fn to_xlsx(analysis: &Analysis) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, "rank")?;
    worksheet.write_string(0, 1, "citations")?;

    for (rank, count) in analysis.citations.iter().enumerate() {
        let row = (rank + 1) as u32;
        worksheet.write_number(row, 0, (rank + 1) as f64)?;
        worksheet.write_number(row, 1, *count as f64)?;
    }

    let mut row = analysis.citations.len() as u32 + 2;
    worksheet.write_string(row, 0, "h_index")?;
    worksheet.write_number(row, 1, analysis.summary.h_index as f64)?;
    row += 1;
    worksheet.write_string(row, 0, "i10_index")?;
    worksheet.write_number(row, 1, analysis.summary.i10_index as f64)?;
    row += 1;
    worksheet.write_string(row, 0, "total_citations")?;
    worksheet.write_number(row, 1, analysis.summary.total_citations as f64)?;

    // Save to memory buffer
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Escape a CSV field if it contains commas, quotes or newlines
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace("\"", "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}
