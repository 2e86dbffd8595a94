use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Config(String),

    #[error("Failed to access document object")]
    EnvironmentUnavailable,

    #[error("Table with id \"{0}\" not found")]
    TableNotFound(String),

    #[error("Sheet \"{0}\" has no data source")]
    MissingSource(String),

    #[error("No data source provided")]
    NoDataSource,

    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    #[error("No valid data to export")]
    EmptyWorkbook,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Download error: {0}")]
    Download(String),
}

impl From<serde_yaml::Error> for ExportError {
    fn from(err: serde_yaml::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}
