//! A1-style cell references and ranges
//!
//! Coordinates are zero-based internally (row 0 is Excel row 1, column 0 is
//! column A), matching the rust_xlsxwriter worksheet API.

use crate::error::{ExportError, ExportResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Last valid zero-based row (Excel row 1,048,576)
pub const MAX_ROW: u32 = 1_048_575;
/// Last valid zero-based column (Excel column XFD)
pub const MAX_COL: u16 = 16_383;

static CELL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]+)\$?([0-9]+)$").expect("cell reference regex is valid")
});

/// Decode column letters with bijective base 26: `A` = 1, `Z` = 26, `AA` = 27
pub fn column_letter_to_number(letters: &str) -> ExportResult<u32> {
    if letters.is_empty() {
        return Err(ExportError::InvalidRange("empty column letters".to_string()));
    }

    let mut number: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(ExportError::InvalidRange(format!(
                "invalid column letters '{}'",
                letters
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| {
                ExportError::InvalidRange(format!("column '{}' is out of range", letters))
            })?;
    }

    Ok(number)
}

/// Encode a one-based column number as letters: 1 → `A`, 27 → `AA`
pub fn number_to_column_letter(number: u32) -> ExportResult<String> {
    if number == 0 {
        return Err(ExportError::InvalidRange(
            "column numbers start at 1".to_string(),
        ));
    }

    let mut result = String::new();
    let mut n = number;
    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    Ok(result)
}

/// One cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse `"B3"` (absolute markers like `"$B$3"` are accepted)
    pub fn parse(reference: &str) -> ExportResult<Self> {
        let caps = CELL_REF
            .captures(reference.trim())
            .ok_or_else(|| ExportError::InvalidRange(reference.to_string()))?;

        let col = column_letter_to_number(&caps[1])?;
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| ExportError::InvalidRange(reference.to_string()))?;

        if row == 0 || row - 1 > MAX_ROW || col - 1 > MAX_COL as u32 {
            return Err(ExportError::InvalidRange(format!(
                "'{}' is outside the worksheet",
                reference
            )));
        }

        Ok(Self {
            row: row - 1,
            col: (col - 1) as u16,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = number_to_column_letter(self.col as u32 + 1).map_err(|_| fmt::Error)?;
        write!(f, "{}{}", letters, self.row + 1)
    }
}

/// Inclusive rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from two corners in any order
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse `"A1"` (a 1x1 region) or `"D2:D5"`
    pub fn parse(reference: &str) -> ExportResult<Self> {
        match reference.split_once(':') {
            Some((first, last)) => Ok(Self::new(CellRef::parse(first)?, CellRef::parse(last)?)),
            None => {
                let cell = CellRef::parse(reference)?;
                Ok(Self::new(cell, cell))
            }
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    /// Every address in the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        let cols = self.start.col..=self.end.col;
        (self.start.row..=self.end.row)
            .flat_map(move |row| cols.clone().map(move |col| CellRef::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
