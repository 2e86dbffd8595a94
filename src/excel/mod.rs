//! Workbook building and encoding
//!
//! - `codec`: hex colors and style enums → rust_xlsxwriter primitives
//! - `range`: A1 references and ranges
//! - `style`: `CellStyle` → `Format`
//! - `worksheet`: sparse grid, table/matrix builders, style plans
//! - `workbook`: multi-sheet assembly with per-sheet error isolation
//! - `encoder`: workbook → `.xlsx` bytes
//! - `legacy`: HTML-template `.xls` fallback

pub mod codec;
pub mod encoder;
pub mod legacy;
pub mod range;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use encoder::{Encoder, WriteOptions, XlsxEncoder};
pub use range::{column_letter_to_number, number_to_column_letter, CellRange, CellRef};
pub use style::translate;
pub use workbook::{Assembly, SheetOutcome, SourceMode, Workbook, WorkbookAssembler};
pub use worksheet::{Cell, Worksheet};
