//! Delivery of finished files

use crate::error::{ExportError, ExportResult};
use crate::excel::legacy::DATA_URI_PREFIX;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// File contents as produced by the encoder or the legacy template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    /// Base64 `data:` URI
    DataUri(String),
}

impl Payload {
    /// Raw file bytes, decoding a data URI when needed
    pub fn to_bytes(&self) -> ExportResult<Vec<u8>> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes.clone()),
            Payload::DataUri(uri) => {
                let (_, encoded) = uri
                    .split_once(";base64,")
                    .ok_or_else(|| ExportError::Download("data URI is not base64".to_string()))?;
                STANDARD
                    .decode(encoded)
                    .map_err(|e| ExportError::Download(format!("Invalid data URI: {}", e)))
            }
        }
    }
}

/// A file ready to be offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub payload: Payload,
}

impl DownloadFile {
    pub fn bytes(file_name: String, mime_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime_type,
            payload: Payload::Bytes(bytes),
        }
    }

    pub fn data_uri(file_name: String, uri: String) -> Self {
        debug_assert!(uri.starts_with(DATA_URI_PREFIX));
        Self {
            file_name,
            mime_type: "application/vnd.ms-excel",
            payload: Payload::DataUri(uri),
        }
    }
}

/// Hands a finished file to the host environment
pub trait Downloader {
    fn download(&mut self, file: DownloadFile) -> ExportResult<()>;
}

/// Saves downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectoryDownloader {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            saved: Vec::new(),
        }
    }

    /// Paths written so far, oldest first
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

/// A download name must be a single plain file name inside the directory
fn check_file_name(file_name: &str) -> ExportResult<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ExportError::Download(format!(
            "Refusing to write outside the output directory: {}",
            file_name
        ))),
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&mut self, file: DownloadFile) -> ExportResult<()> {
        check_file_name(&file.file_name)?;
        let path = self.dir.join(&file.file_name);
        fs::write(&path, file.payload.to_bytes()?)?;
        info!(path = %path.display(), mime = file.mime_type, "Saved export");
        self.saved.push(path);
        Ok(())
    }
}
