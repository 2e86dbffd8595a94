//! tablexcel - export HTML tables and data matrices to Excel workbooks
//!
//! This library turns a declarative export config into a spreadsheet file:
//! tables are looked up by id in a document, data matrices are taken as-is,
//! and an optional style plan is applied before the workbook is encoded and
//! handed to a downloader.
//!
//! # Features
//!
//! - Single table, single matrix, multi-table and explicit multi-sheet exports
//! - Header, data, alternating-row and per-range cell styles
//! - Numeric coercion of scraped table cells
//! - Legacy HTML-template `.xls` export
//! - Per-sheet error isolation in multi-sheet modes
//!
//! # Example
//!
//! ```no_run
//! use tablexcel::{DirectoryDownloader, ExportConfig, Exporter, HtmlDocument};
//!
//! let html = std::fs::read_to_string("page.html")?;
//! let mut config = ExportConfig::new("report");
//! config.table = Some("users".to_string());
//!
//! let mut exporter = Exporter::new(config, DirectoryDownloader::new("."))
//!     .with_document(HtmlDocument::parse(&html))
//!     .on_after_export(|ok| println!("export finished: {}", ok));
//!
//! assert!(exporter.on_download());
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod cli;
pub mod dom;
pub mod download;
pub mod error;
pub mod excel;
pub mod exporter;
pub mod types;

// Re-export commonly used types
pub use dom::{Document, HtmlDocument, TableElement};
pub use download::{DirectoryDownloader, DownloadFile, Downloader, Payload};
pub use error::{ExportError, ExportResult};
pub use exporter::Exporter;
pub use types::{BookType, CellStyle, CellValue, ExportConfig, SheetConfig, TableStyles};
