//! Export orchestration: one call turns a config into a downloaded file
//!
//! [`Exporter::on_download`] never fails loudly. Every error is collapsed to
//! `false`, `on_before_export` and `on_after_export` each fire exactly once
//! per call, and diagnostics are only logged in debug builds.

use crate::dom::Document;
use crate::download::{DownloadFile, Downloader};
use crate::error::{ExportError, ExportResult};
use crate::excel::legacy;
use crate::excel::{Encoder, Workbook, WorkbookAssembler, WriteOptions, XlsxEncoder};
use crate::types::ExportConfig;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Workbook ready for encoding, detached from the exporter so it can move
/// onto a blocking thread
struct EncodeJob {
    workbook: Workbook,
    options: WriteOptions,
    file_name: String,
}

impl EncodeJob {
    fn run(self, encoder: &dyn Encoder) -> ExportResult<DownloadFile> {
        let bytes = encoder.write(&self.workbook, &self.options)?;
        Ok(DownloadFile::bytes(
            self.file_name,
            self.options.book_type.mime_type(),
            bytes,
        ))
    }
}

enum Prepared {
    Legacy(DownloadFile),
    Workbook(EncodeJob),
}

/// Exports tables and data matrices to spreadsheet files
pub struct Exporter {
    config: ExportConfig,
    document: Option<Box<dyn Document>>,
    encoder: Arc<dyn Encoder>,
    downloader: Box<dyn Downloader>,
    before_export: Option<Box<dyn FnMut()>>,
    after_export: Option<Box<dyn FnMut(bool)>>,
    last_error: Option<ExportError>,
}

impl Exporter {
    pub fn new(config: ExportConfig, downloader: impl Downloader + 'static) -> Self {
        Self {
            config,
            document: None,
            encoder: Arc::new(XlsxEncoder::new()),
            downloader: Box::new(downloader),
            before_export: None,
            after_export: None,
            last_error: None,
        }
    }

    /// Attach the document tables are looked up in. Without one every
    /// export fails with [`ExportError::EnvironmentUnavailable`].
    pub fn with_document(mut self, document: impl Document + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    pub fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    pub fn on_before_export(mut self, callback: impl FnMut() + 'static) -> Self {
        self.before_export = Some(Box::new(callback));
        self
    }

    /// Called with the final success flag, after the downloader returns
    pub fn on_after_export(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.after_export = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Error behind the most recent `false`, cleared on success
    pub fn last_error(&self) -> Option<&ExportError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<ExportError> {
        self.last_error.take()
    }

    /// Run the export, encoding on the current thread
    pub fn on_download(&mut self) -> bool {
        self.notify_before();
        let result = self.run();
        self.finish(result)
    }

    /// Run the export with the encode on tokio's blocking pool. Resolves
    /// once the file has been handed to the downloader.
    pub async fn on_download_async(&mut self) -> bool {
        self.notify_before();
        let result = self.run_async().await;
        self.finish(result)
    }

    fn run(&mut self) -> ExportResult<()> {
        let file = match self.prepare()? {
            Prepared::Legacy(file) => file,
            Prepared::Workbook(job) => job.run(self.encoder.as_ref())?,
        };
        self.deliver(file)
    }

    async fn run_async(&mut self) -> ExportResult<()> {
        let file = match self.prepare()? {
            Prepared::Legacy(file) => file,
            Prepared::Workbook(job) => {
                let encoder = Arc::clone(&self.encoder);
                tokio::task::spawn_blocking(move || job.run(encoder.as_ref()))
                    .await
                    .map_err(|e| ExportError::Encode(format!("Encode task failed: {}", e)))??
            }
        };
        self.deliver(file)
    }

    fn prepare(&self) -> ExportResult<Prepared> {
        let document = self
            .document
            .as_deref()
            .ok_or(ExportError::EnvironmentUnavailable)?;

        if self.config.is_legacy() {
            return self.prepare_legacy(document).map(Prepared::Legacy);
        }

        let assembly = WorkbookAssembler::new(&self.config, document).assemble()?;
        let options = WriteOptions {
            book_type: self.config.format,
            cell_styles: self.config.has_styles(),
        };
        debug!(
            sheets = assembly.workbook.len(),
            skipped = assembly.skipped.len(),
            styled = options.cell_styles,
            "Workbook assembled"
        );

        Ok(Prepared::Workbook(EncodeJob {
            workbook: assembly.workbook,
            options,
            file_name: self.config.output_file_name(),
        }))
    }

    fn prepare_legacy(&self, document: &dyn Document) -> ExportResult<DownloadFile> {
        let table_id = self.config.table.as_deref().unwrap_or_default();
        let table = document
            .table_by_id(table_id)
            .ok_or_else(|| ExportError::TableNotFound(table_id.to_string()))?;

        let uri = legacy::data_uri(&table.outer_html, self.config.sheet_name());
        Ok(DownloadFile::data_uri(self.config.output_file_name(), uri))
    }

    fn deliver(&mut self, file: DownloadFile) -> ExportResult<()> {
        let file_name = file.file_name.clone();
        self.downloader.download(file)?;
        info!(file = %file_name, "Export downloaded");
        Ok(())
    }

    fn notify_before(&mut self) {
        if let Some(callback) = self.before_export.as_mut() {
            callback();
        }
    }

    fn finish(&mut self, result: ExportResult<()>) -> bool {
        let success = match result {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                if cfg!(debug_assertions) {
                    error!(file = %self.config.file_name, error = %e, "Export failed");
                }
                self.last_error = Some(e);
                false
            }
        };

        if let Some(callback) = self.after_export.as_mut() {
            callback(success);
        }
        success
    }
}
