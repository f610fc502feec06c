// Excel import/export
// Import reads the first worksheet as a header row plus data rows.
// Export writes one sheet with a bold header row.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use leadmerge_core::{Cell, Table};
use rust_xlsxwriter::{Format, FormatBorder, Workbook as XlsxWorkbook};

use crate::csv::normalize_headers;

/// Sheet name used for written workbooks.
pub const OUTPUT_SHEET_NAME: &str = "Sheet1";

/// Import the first worksheet of an Excel file (xlsx, xlsm, xls).
///
/// Returns the table and the name of the sheet it came from. Leading blank
/// rows are skipped by calamine's used range; the first remaining row is the
/// header row.
pub fn read_first_sheet(path: &Path) -> Result<(Table, String), String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((Table::default(), sheet_name));
    };

    let header_text: Vec<String> = header_row
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let mut table = Table::new(normalize_headers(header_text.iter().map(String::as_str)));

    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_text).collect();
        table.push_row(cells);
    }

    Ok((table, sheet_name))
}

/// Text of a single calamine cell; `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{}", n))
            }
        }
        Data::Int(n) => Some(format!("{}", n)),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Some(format!("#{:?}", e)),
        // Serial date number; contact exports rarely carry dates in mapped columns
        Data::DateTime(dt) => Some(format!("{}", dt.as_f64())),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Write a table to an .xlsx file: header row in bold, one text cell per value.
///
/// The workbook is saved next to `path` under a temporary name and renamed
/// into place, so a failed save never leaves a partial file at `path`.
pub fn write_table(table: &Table, path: &Path) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(OUTPUT_SHEET_NAME)
        .map_err(|e| format!("Failed to create sheet: {}", e))?;

    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    for (col, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| "too many columns for XLSX".to_string())?;
        worksheet
            .write_string_with_format(0, col, name, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = u32::try_from(row_idx + 1).map_err(|_| "too many rows for XLSX".to_string())?;
        for (col, value) in row.iter().enumerate() {
            let Some(value) = value else { continue };
            worksheet
                .write_string(excel_row, col as u16, value)
                .map_err(|e| format!("Failed to write row {}: {}", row_idx + 1, e))?;
        }
    }

    worksheet.autofit();

    let tmp = partial_path(path);
    if let Err(e) = workbook.save(&tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(format!("Failed to save XLSX file: {}", e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(format!("Failed to move XLSX file into place: {}", e));
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::with_rows(
            vec!["Email".into(), "First Name".into()],
            vec![
                vec![Some("a@x.io".into()), Some("Ann".into())],
                vec![None, Some("Bob".into())],
            ],
        )
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        write_table(&sample(), &path).unwrap();

        let (table, sheet) = read_first_sheet(&path).unwrap();
        assert_eq!(sheet, OUTPUT_SHEET_NAME);
        assert_eq!(table.columns(), &["Email", "First Name"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), None);
        assert_eq!(table.cell(1, 1), Some("Bob"));
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_export_to_missing_dir_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.xlsx");
        let err = write_table(&sample(), &path).unwrap_err();
        assert!(err.contains("Failed to save XLSX file"));
        assert!(!path.exists());
    }

    #[test]
    fn test_cell_text_numbers() {
        assert_eq!(cell_text(&Data::Float(42.0)), Some("42".into()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".into()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_text(&Data::String(String::new())), None);
        assert_eq!(cell_text(&Data::Empty), None);
    }
}
