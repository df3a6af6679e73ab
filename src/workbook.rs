//! Three-sheet workbook serialization.
//!
//! Given the same [`Conversion`], the sheet structure is reproducible: a `Data` sheet with
//! the (possibly reshaped) table, a `Metadata` sheet with conversion properties, and an
//! `Original_Data` sheet included exactly when reshaping changed the column count.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::conversion::Conversion;
use crate::error::ConvertResult;
use crate::types::{Table, Value};

/// Sheet holding the output table.
pub const DATA_SHEET: &str = "Data";

/// Sheet holding conversion properties.
pub const METADATA_SHEET: &str = "Metadata";

/// Sheet holding the unreshaped table, present only when the data was pivoted.
pub const ORIGINAL_DATA_SHEET: &str = "Original_Data";

/// Build the three-sheet workbook for a conversion.
///
/// `source_file` is recorded in the metadata sheet when present (batch mode); transport
/// callers converting in-memory payloads pass `None`.
pub fn build_workbook(
    conversion: &Conversion,
    source_file: Option<&str>,
) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    let data = workbook.add_worksheet();
    data.set_name(DATA_SHEET)?;
    write_table_sheet(data, &conversion.data)?;

    let metadata = workbook.add_worksheet();
    metadata.set_name(METADATA_SHEET)?;
    write_metadata_sheet(metadata, conversion, source_file)?;

    if conversion.was_pivoted() {
        let original = workbook.add_worksheet();
        original.set_name(ORIGINAL_DATA_SHEET)?;
        write_table_sheet(original, &conversion.original)?;
    }

    Ok(workbook)
}

/// Build and save the workbook to a file.
pub fn write_workbook_to_path(
    conversion: &Conversion,
    source_file: Option<&str>,
    path: impl AsRef<Path>,
) -> ConvertResult<()> {
    let mut workbook = build_workbook(conversion, source_file)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Build the workbook and serialize it to an in-memory XLSX buffer.
pub fn workbook_to_bytes(
    conversion: &Conversion,
    source_file: Option<&str>,
) -> ConvertResult<Vec<u8>> {
    let mut workbook = build_workbook(conversion, source_file)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_table_sheet(worksheet: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, out_row, col as u16, cell)?;
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Value,
) -> Result<(), XlsxError> {
    match cell {
        // Missing cells stay blank.
        Value::Missing => {}
        Value::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Value::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
    }
    Ok(())
}

fn write_metadata_sheet(
    worksheet: &mut Worksheet,
    conversion: &Conversion,
    source_file: Option<&str>,
) -> Result<(), XlsxError> {
    worksheet.write_string(0, 0, "Property")?;
    worksheet.write_string(0, 1, "Value")?;

    let mut row: u32 = 1;
    if let Some(name) = source_file {
        worksheet.write_string(row, 0, "Source File")?;
        worksheet.write_string(row, 1, name)?;
        row += 1;
    }

    worksheet.write_string(row, 0, "Total Records")?;
    worksheet.write_number(row, 1, conversion.record_count as f64)?;
    row += 1;

    worksheet.write_string(row, 0, "Conversion Status")?;
    worksheet.write_string(row, 1, "Success")?;
    row += 1;

    worksheet.write_string(row, 0, "Processing Notes")?;
    worksheet.write_string(row, 1, conversion.reshape_message.as_str())?;

    Ok(())
}
