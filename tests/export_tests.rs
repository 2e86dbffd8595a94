//! End-to-end export tests
//!
//! Drive `Exporter` with recording collaborators and read the produced
//! workbooks back with calamine.

use calamine::{Data, Reader, Xlsx};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tablexcel::excel::{Encoder, Workbook, WriteOptions, XlsxEncoder};
use tablexcel::{
    BookType, CellValue, DirectoryDownloader, DownloadFile, Downloader, ExportConfig, ExportError,
    ExportResult, Exporter, HtmlDocument, Payload, SheetConfig, TableElement,
};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// RECORDING COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════════

/// Encoder call as seen by the recorder
#[derive(Debug, Clone)]
struct EncodeCall {
    book_type: BookType,
    cell_styles: bool,
    sheet_names: Vec<String>,
}

/// Delegates to `XlsxEncoder` and records every call
#[derive(Clone, Default)]
struct RecordingEncoder {
    calls: Arc<Mutex<Vec<EncodeCall>>>,
}

impl RecordingEncoder {
    fn calls(&self) -> Vec<EncodeCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Encoder for RecordingEncoder {
    fn write(&self, workbook: &Workbook, options: &WriteOptions) -> ExportResult<Vec<u8>> {
        self.calls.lock().unwrap().push(EncodeCall {
            book_type: options.book_type,
            cell_styles: options.cell_styles,
            sheet_names: workbook.sheet_names().iter().map(|s| s.to_string()).collect(),
        });
        XlsxEncoder::new().write(workbook, options)
    }
}

#[derive(Clone, Default)]
struct RecordingDownloader {
    files: Rc<RefCell<Vec<DownloadFile>>>,
}

impl RecordingDownloader {
    fn single(&self) -> DownloadFile {
        let files = self.files.borrow();
        assert_eq!(files.len(), 1, "expected exactly one download");
        files[0].clone()
    }
}

impl Downloader for RecordingDownloader {
    fn download(&mut self, file: DownloadFile) -> ExportResult<()> {
        self.files.borrow_mut().push(file);
        Ok(())
    }
}

fn read_back(file: &DownloadFile) -> Xlsx<Cursor<Vec<u8>>> {
    let bytes = file.payload.to_bytes().unwrap();
    calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap()
}

fn document() -> HashMap<String, TableElement> {
    let mut doc = HashMap::new();
    doc.insert(
        "t1".to_string(),
        TableElement::new("t1")
            .with_header(["Name", "Age"])
            .with_row(["John", "30"])
            .with_row(["Jane", "32"]),
    );
    doc.insert(
        "A".to_string(),
        TableElement::new("A").with_header(["x"]).with_row(["1"]),
    );
    doc
}

// ═══════════════════════════════════════════════════════════════════════════
// SINGLE SOURCE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_table_end_to_end() {
    let encoder = RecordingEncoder::default();
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("out");
    config.table = Some("t1".to_string());

    let mut exporter = Exporter::new(config, downloader.clone())
        .with_document(document())
        .with_encoder(encoder.clone());
    assert!(exporter.on_download());

    let calls = encoder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].book_type, BookType::Xlsx);
    assert!(!calls[0].cell_styles);
    assert_eq!(calls[0].sheet_names, vec!["Sheet1"]);

    let file = downloader.single();
    assert_eq!(file.file_name, "out.xlsx");

    let mut xlsx = read_back(&file);
    let range = xlsx.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_size(), (3, 2));
    assert_eq!(range.get_value((0, 1)), Some(&Data::String("Age".to_string())));
    assert_eq!(range.get_value((2, 1)), Some(&Data::Float(32.0)));
}

#[test]
fn test_data_matrix_end_to_end() {
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("users");
    config.data = Some(vec![
        vec![CellValue::from("a"), CellValue::from(1)],
        vec![CellValue::from("b"), CellValue::from(2)],
    ]);
    config.headers = Some(vec!["Name".to_string(), "Val".to_string()]);
    config.sheet = Some("Users".to_string());

    let mut exporter = Exporter::new(config, downloader.clone()).with_document(document());
    assert!(exporter.on_download());

    let mut xlsx = read_back(&downloader.single());
    assert_eq!(xlsx.sheet_names(), vec!["Users".to_string()]);
    let range = xlsx.worksheet_range("Users").unwrap();
    assert_eq!(range.height(), 3);
    let header: Vec<&Data> = range.rows().next().unwrap().iter().collect();
    assert_eq!(
        header,
        vec![
            &Data::String("Name".to_string()),
            &Data::String("Val".to_string())
        ]
    );
}

#[test]
fn test_html_document_end_to_end() {
    let html = r#"<table id="scores">
        <thead><tr><th>Player</th><th>Score</th></tr></thead>
        <tbody><tr><td> Ann </td><td> 12.5 </td></tr></tbody>
    </table>"#;
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("scores");
    config.table = Some("scores".to_string());

    let mut exporter =
        Exporter::new(config, downloader.clone()).with_document(HtmlDocument::parse(html));
    assert!(exporter.on_download());

    let mut xlsx = read_back(&downloader.single());
    let range = xlsx.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("Ann".to_string())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(12.5)));
}

// ═══════════════════════════════════════════════════════════════════════════
// MULTI-SHEET MODES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_multi_table_missing_entry_is_skipped() {
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("multi");
    config.tables = Some(vec!["A".to_string(), "B".to_string()]);

    let mut exporter = Exporter::new(config, downloader.clone()).with_document(document());
    assert!(exporter.on_download());

    let xlsx = read_back(&downloader.single());
    assert_eq!(xlsx.sheet_names(), vec!["Sheet1".to_string()]);
}

#[test]
fn test_multi_table_all_missing_fails() {
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("multi");
    config.tables = Some(vec!["B".to_string(), "C".to_string()]);

    let mut exporter = Exporter::new(config, downloader.clone()).with_document(document());
    assert!(!exporter.on_download());
    assert!(downloader.files.borrow().is_empty());
    assert_eq!(
        exporter.last_error().map(|e| e.to_string()),
        Some("No valid data to export".to_string())
    );
}

#[test]
fn test_empty_sheets_without_source_fails() {
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("none");
    config.sheets = Some(vec![]);

    let mut exporter = Exporter::new(config, downloader.clone()).with_document(document());
    assert!(!exporter.on_download());
    assert!(downloader.files.borrow().is_empty());
}

#[test]
fn test_explicit_sheets_keep_order_and_names() {
    let encoder = RecordingEncoder::default();
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("book");
    config.sheets = Some(vec![
        SheetConfig::from_table("People", "t1"),
        SheetConfig::from_table("Ghost", "missing"),
        SheetConfig::from_data("Numbers", vec![vec![CellValue::from(7)]]),
    ]);

    let mut exporter = Exporter::new(config, downloader.clone())
        .with_document(document())
        .with_encoder(encoder.clone());
    assert!(exporter.on_download());

    assert_eq!(encoder.calls()[0].sheet_names, vec!["People", "Numbers"]);
    let xlsx = read_back(&downloader.single());
    assert_eq!(
        xlsx.sheet_names(),
        vec!["People".to_string(), "Numbers".to_string()]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// STYLED EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_styles_from_yaml_select_styled_path() {
    let yaml = r##"
file_name: styled
table: t1
styles:
  header_row:
    font: { bold: true, color: "#FFFFFF" }
    fill: { background_color: "#4472C4" }
    border:
      bottom: { style: medium, color: "000000" }
  data_row:
    alignment: { horizontal: center }
  alternating_row:
    fill: { background_color: "F2F2F2" }
  cells:
    "B2:B3":
      number_format: "0.00"
"##;
    let config = ExportConfig::from_yaml(yaml).unwrap();
    let encoder = RecordingEncoder::default();
    let downloader = RecordingDownloader::default();

    let mut exporter = Exporter::new(config, downloader.clone())
        .with_document(document())
        .with_encoder(encoder.clone());
    assert!(exporter.on_download());

    assert!(encoder.calls()[0].cell_styles);
    let mut xlsx = read_back(&downloader.single());
    let range = xlsx.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(30.0)));
}

#[test]
fn test_sheet_level_styles_select_styled_path() {
    let encoder = RecordingEncoder::default();
    let mut config = ExportConfig::new("book");
    config.sheets = Some(vec![SheetConfig::from_table("People", "t1")
        .with_styles(tablexcel::TableStyles::default())]);

    let mut exporter = Exporter::new(config, RecordingDownloader::default())
        .with_document(document())
        .with_encoder(encoder.clone());
    assert!(exporter.on_download());
    assert!(encoder.calls()[0].cell_styles);
}

// ═══════════════════════════════════════════════════════════════════════════
// CALLBACKS
// ═══════════════════════════════════════════════════════════════════════════

fn with_events(exporter: Exporter, events: &Rc<RefCell<Vec<String>>>) -> Exporter {
    let before = Rc::clone(events);
    let after = Rc::clone(events);
    exporter
        .on_before_export(move || before.borrow_mut().push("before".to_string()))
        .on_after_export(move |ok| after.borrow_mut().push(format!("after:{}", ok)))
}

fn table_config(file_name: &str, table: &str) -> ExportConfig {
    let mut config = ExportConfig::new(file_name);
    config.table = Some(table.to_string());
    config
}

#[test]
fn test_callbacks_on_every_path() {
    let mut legacy = table_config("legacy", "t1");
    legacy.use_legacy_export = true;

    let cases = vec![
        (table_config("ok", "t1"), true),
        (table_config("missing", "nope"), false),
        (ExportConfig::new("empty"), false),
        (legacy, true),
    ];

    for (config, expected) in cases {
        let events = Rc::new(RefCell::new(Vec::new()));
        let exporter =
            Exporter::new(config, RecordingDownloader::default()).with_document(document());
        let mut exporter = with_events(exporter, &events);

        assert_eq!(exporter.on_download(), expected);
        assert_eq!(
            *events.borrow(),
            vec!["before".to_string(), format!("after:{}", expected)]
        );
    }
}

#[test]
fn test_no_document_fails_with_callbacks() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let exporter = Exporter::new(table_config("out", "t1"), RecordingDownloader::default());
    let mut exporter = with_events(exporter, &events);

    assert!(!exporter.on_download());
    assert!(matches!(
        exporter.last_error(),
        Some(ExportError::EnvironmentUnavailable)
    ));
    assert_eq!(*events.borrow(), vec!["before", "after:false"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// LEGACY AND FILESYSTEM
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_legacy_export_is_data_uri() {
    let html = r#"<table id="t1"><tr><td>1</td></tr></table>"#;
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("legacy");
    config.table = Some("t1".to_string());
    config.use_legacy_export = true;

    let mut exporter =
        Exporter::new(config, downloader.clone()).with_document(HtmlDocument::parse(html));
    assert!(exporter.on_download());

    let file = downloader.single();
    assert_eq!(file.file_name, "legacy.xls");
    assert!(matches!(
        &file.payload,
        Payload::DataUri(uri) if uri.starts_with("data:application/vnd.ms-excel;base64,")
    ));
}

#[test]
fn test_directory_downloader_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let mut config = ExportConfig::new("saved");
    config.tables = Some(vec!["t1".to_string(), "A".to_string()]);

    let mut exporter =
        Exporter::new(config, DirectoryDownloader::new(dir.path())).with_document(document());
    assert!(exporter.on_download());

    let path = dir.path().join("saved.xlsx");
    let xlsx: Xlsx<_> = calamine::open_workbook(&path).unwrap();
    assert_eq!(
        xlsx.sheet_names(),
        vec!["Sheet1".to_string(), "Sheet2".to_string()]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// ASYNC
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_async_export_completes_before_returning() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let downloader = RecordingDownloader::default();
    let mut config = ExportConfig::new("async");
    config.table = Some("t1".to_string());

    let exporter = Exporter::new(config, downloader.clone()).with_document(document());
    let mut exporter = with_events(exporter, &events);

    assert!(exporter.on_download_async().await);
    assert_eq!(downloader.single().file_name, "async.xlsx");
    assert_eq!(*events.borrow(), vec!["before", "after:true"]);
}

#[tokio::test]
async fn test_async_failure_path() {
    let mut config = ExportConfig::new("async");
    config.tables = Some(vec!["nope".to_string()]);

    let mut exporter =
        Exporter::new(config, RecordingDownloader::default()).with_document(document());
    assert!(!exporter.on_download_async().await);
    assert!(matches!(exporter.last_error(), Some(ExportError::EmptyWorkbook)));
}
