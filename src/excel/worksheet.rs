//! Sparse worksheet grid and its builders

use super::range::{CellRange, CellRef};
use super::style;
use crate::dom::TableElement;
use crate::types::{CellStyle, CellValue, TableStyles};
use rust_xlsxwriter::Format;
use std::collections::BTreeMap;
use tracing::warn;

/// One populated cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub format: Option<Format>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            format: None,
        }
    }
}

/// Grid of cells keyed by `(row, col)`. Gaps hold no cell at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    cells: BTreeMap<CellRef, Cell>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a table element: header rows as text, body cells coerced
    /// to numbers when their trimmed text is a finite number.
    pub fn from_table(table: &TableElement) -> Self {
        let mut sheet = Self::new();
        let mut row = 0u32;

        for header in &table.header_rows {
            for (col, text) in header.iter().enumerate() {
                sheet.set_value(row, col as u16, CellValue::Text(text.trim().to_string()));
            }
            row += 1;
        }

        for body in &table.body_rows {
            for (col, text) in body.iter().enumerate() {
                sheet.set_value(row, col as u16, CellValue::coerce(text));
            }
            row += 1;
        }

        sheet
    }

    /// Build from a data matrix; non-empty `headers` become row 1
    pub fn from_matrix(data: &[Vec<CellValue>], headers: Option<&[String]>) -> Self {
        let mut sheet = Self::new();
        let mut row = 0u32;

        if let Some(headers) = headers.filter(|h| !h.is_empty()) {
            for (col, header) in headers.iter().enumerate() {
                sheet.set_value(row, col as u16, CellValue::Text(header.clone()));
            }
            row += 1;
        }

        for values in data {
            for (col, value) in values.iter().enumerate() {
                sheet.set_value(row, col as u16, value.clone());
            }
            row += 1;
        }

        sheet
    }

    /// Store a value; `Empty` removes the cell instead
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let key = CellRef::new(row, col);
        if value.is_empty() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, Cell::new(value));
        }
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&CellRef::new(row, col))
    }

    pub fn value(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cell(row, col).map(|c| &c.value)
    }

    pub fn format(&self, row: u32, col: u16) -> Option<&Format> {
        self.cell(row, col).and_then(|c| c.format.as_ref())
    }

    /// Populated cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box from `A1` to the last populated row and column
    pub fn dimensions(&self) -> Option<CellRange> {
        let last_row = self.cells.keys().map(|k| k.row).max()?;
        let last_col = self.cells.keys().map(|k| k.col).max()?;
        Some(CellRange::new(CellRef::new(0, 0), CellRef::new(last_row, last_col)))
    }

    /// Number of rows up to the last populated one
    pub fn row_count(&self) -> u32 {
        self.dimensions().map_or(0, |d| d.end.row + 1)
    }

    /// Values of one row across the full column extent
    pub fn row_values(&self, row: u32) -> Vec<Option<&CellValue>> {
        let Some(dims) = self.dimensions() else {
            return Vec::new();
        };
        (0..=dims.end.col).map(|col| self.value(row, col)).collect()
    }

    /// Format the existing cells inside `range`; gaps stay gaps. Only rows up
    /// to the last populated one are visited, and each row is a map range scan.
    fn format_range(&mut self, range: CellRange, format: &Format) {
        let Some(dims) = self.dimensions() else {
            return;
        };
        let last_row = range.end.row.min(dims.end.row);

        for row in range.start.row..=last_row {
            let from = CellRef::new(row, range.start.col);
            let to = CellRef::new(row, range.end.col);
            for (_, cell) in self.cells.range_mut(from..=to) {
                cell.format = Some(format.clone());
            }
        }
    }

    /// Apply a style plan: header row, then data / alternating rows, then
    /// custom ranges. Later phases overwrite earlier ones.
    pub fn apply_styles(&mut self, styles: &TableStyles) {
        let Some(dims) = self.dimensions() else {
            return;
        };
        let last_col = dims.end.col;

        if let Some(format) = styles.header_row.as_ref().and_then(effective_format) {
            self.format_range(
                CellRange::new(CellRef::new(0, 0), CellRef::new(0, last_col)),
                &format,
            );
        }

        if let Some(data_format) = styles.data_row.as_ref().and_then(effective_format) {
            let alt_format = styles.alternating_row.as_ref().and_then(effective_format);

            for row in 1..=dims.end.row {
                // Zero-based even rows are the 2nd, 4th, ... data rows
                let format = match &alt_format {
                    Some(alt) if row % 2 == 0 => alt,
                    _ => &data_format,
                };
                self.format_range(
                    CellRange::new(CellRef::new(row, 0), CellRef::new(row, last_col)),
                    format,
                );
            }
        }

        if let Some(cells) = &styles.cells {
            for (reference, cell_style) in cells {
                let Some(format) = effective_format(cell_style) else {
                    continue;
                };
                match CellRange::parse(reference) {
                    Ok(range) => self.format_range(range, &format),
                    Err(e) => warn!(range = %reference, error = %e, "Skipping cell style"),
                }
            }
        }
    }
}

/// Translated format, or `None` when the style adds no attribute at all
fn effective_format(style: &CellStyle) -> Option<Format> {
    let format = style::translate(style);
    (format != Format::new()).then_some(format)
}
