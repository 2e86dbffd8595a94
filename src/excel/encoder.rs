//! Binary workbook encoding

use super::workbook::Workbook;
use super::worksheet::{Cell, Worksheet};
use crate::error::{ExportError, ExportResult};
use crate::types::{BookType, CellValue};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet};
use tracing::debug;

/// How a workbook should be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub book_type: BookType,
    /// Write per-cell formats; the plain path drops them
    pub cell_styles: bool,
}

/// Serializes a workbook into file bytes
pub trait Encoder: Send + Sync {
    fn write(&self, workbook: &Workbook, options: &WriteOptions) -> ExportResult<Vec<u8>>;
}

/// Encoder backed by rust_xlsxwriter. Writes `.xlsx` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxEncoder;

impl XlsxEncoder {
    pub fn new() -> Self {
        Self
    }

    fn write_sheet(
        target: &mut XlsxWorksheet,
        name: &str,
        sheet: &Worksheet,
        cell_styles: bool,
    ) -> ExportResult<()> {
        target
            .set_name(name)
            .map_err(|e| ExportError::Encode(format!("Failed to set worksheet name: {}", e)))?;

        for (at, cell) in sheet.cells() {
            Self::write_cell(target, at.row, at.col, cell, cell_styles)?;
        }
        Ok(())
    }

    fn write_cell(
        target: &mut XlsxWorksheet,
        row: u32,
        col: u16,
        cell: &Cell,
        cell_styles: bool,
    ) -> ExportResult<()> {
        let format = cell.format.as_ref().filter(|_| cell_styles);

        let written = match (&cell.value, format) {
            (CellValue::Number(n), Some(f)) => target.write_number_with_format(row, col, *n, f),
            (CellValue::Number(n), None) => target.write_number(row, col, *n),
            (CellValue::Text(s), Some(f)) => target.write_string_with_format(row, col, s, f),
            (CellValue::Text(s), None) => target.write_string(row, col, s),
            (CellValue::Bool(b), Some(f)) => target.write_boolean_with_format(row, col, *b, f),
            (CellValue::Bool(b), None) => target.write_boolean(row, col, *b),
            (CellValue::Empty, _) => return Ok(()),
        };

        written
            .map(|_| ())
            .map_err(|e| ExportError::Encode(format!("Failed to write cell: {}", e)))
    }
}

impl Encoder for XlsxEncoder {
    fn write(&self, workbook: &Workbook, options: &WriteOptions) -> ExportResult<Vec<u8>> {
        if options.book_type != BookType::Xlsx {
            return Err(ExportError::UnsupportedFormat(format!(
                "{} is not supported by the xlsx encoder, use use_legacy_export instead",
                options.book_type.extension()
            )));
        }

        let mut xlsx = XlsxWorkbook::new();
        for (name, sheet) in workbook.sheets() {
            let target = xlsx.add_worksheet();
            Self::write_sheet(target, name, sheet, options.cell_styles)?;
        }

        let bytes = xlsx
            .save_to_buffer()
            .map_err(|e| ExportError::Encode(format!("Failed to save workbook: {}", e)))?;
        debug!(
            sheets = workbook.len(),
            bytes = bytes.len(),
            styled = options.cell_styles,
            "Encoded workbook"
        );
        Ok(bytes)
    }
}
