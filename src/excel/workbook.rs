//! Workbook assembly from an export configuration

use super::worksheet::Worksheet;
use crate::dom::Document;
use crate::error::{ExportError, ExportResult};
use crate::types::{ExportConfig, SheetConfig, TableStyles};
use tracing::{debug, warn};

/// Ordered collection of named worksheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<(String, Worksheet)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_sheet(&mut self, name: impl Into<String>, worksheet: Worksheet) {
        self.sheets.push((name.into(), worksheet));
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sheet)| sheet)
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Worksheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Where the worksheets of one export come from, chosen once per call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceMode<'a> {
    /// `sheets`: one entry per configured sheet, each with its own styles
    ExplicitSheets(&'a [SheetConfig]),
    /// `tables`: one table per sheet, named `Sheet1`, `Sheet2`, ...
    ImplicitMultiTable(&'a [String]),
    /// A single `table` or `data` source
    SingleSource,
}

impl<'a> SourceMode<'a> {
    /// Pick the mode by precedence; empty lists fall through
    pub fn select(config: &'a ExportConfig) -> Self {
        if let Some(sheets) = config.sheets.as_deref().filter(|s| !s.is_empty()) {
            SourceMode::ExplicitSheets(sheets)
        } else if let Some(tables) = config.tables.as_deref().filter(|t| !t.is_empty()) {
            SourceMode::ImplicitMultiTable(tables)
        } else {
            SourceMode::SingleSource
        }
    }
}

/// Result of building one entry of a multi-sheet batch
#[derive(Debug)]
pub enum SheetOutcome {
    Built { name: String, worksheet: Worksheet },
    Skipped { name: String, reason: ExportError },
}

/// Assembled workbook plus the entries that were dropped on the way
#[derive(Debug)]
pub struct Assembly {
    pub workbook: Workbook,
    pub skipped: Vec<(String, ExportError)>,
}

/// Builds a workbook from a config and a table document
pub struct WorkbookAssembler<'a> {
    config: &'a ExportConfig,
    document: &'a dyn Document,
}

impl<'a> WorkbookAssembler<'a> {
    pub fn new(config: &'a ExportConfig, document: &'a dyn Document) -> Self {
        Self { config, document }
    }

    /// Assemble the workbook. Fails when the single source is missing or
    /// when no worksheet at all could be built.
    pub fn assemble(&self) -> ExportResult<Assembly> {
        let mode = SourceMode::select(self.config);
        debug!(?mode, "Assembling workbook");

        let outcomes = match mode {
            SourceMode::ExplicitSheets(sheets) => self.build_sheets(sheets),
            SourceMode::ImplicitMultiTable(tables) => self.build_tables(tables),
            SourceMode::SingleSource => vec![self.build_single()?],
        };

        let mut workbook = Workbook::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                SheetOutcome::Built { name, worksheet } => workbook.append_sheet(name, worksheet),
                SheetOutcome::Skipped { name, reason } => {
                    warn!(sheet = %name, error = %reason, "Skipping sheet");
                    skipped.push((name, reason));
                }
            }
        }

        if workbook.is_empty() {
            return Err(ExportError::EmptyWorkbook);
        }

        Ok(Assembly { workbook, skipped })
    }

    /// One outcome per explicit sheet config, in order
    pub fn build_sheets(&self, sheets: &[SheetConfig]) -> Vec<SheetOutcome> {
        sheets
            .iter()
            .map(|sheet| {
                let built = self
                    .sheet_source(sheet)
                    .map(|ws| styled(ws, sheet.styles.as_ref()));
                outcome(sheet.name.clone(), built)
            })
            .collect()
    }

    /// One outcome per table id, auto-named by position
    pub fn build_tables(&self, tables: &[String]) -> Vec<SheetOutcome> {
        tables
            .iter()
            .enumerate()
            .map(|(i, table_id)| {
                let built = self
                    .table_sheet(table_id)
                    .map(|ws| styled(ws, self.config.styles.as_ref()));
                outcome(format!("Sheet{}", i + 1), built)
            })
            .collect()
    }

    fn build_single(&self) -> ExportResult<SheetOutcome> {
        let worksheet = if let Some(table_id) = &self.config.table {
            self.table_sheet(table_id)?
        } else if let Some(data) = &self.config.data {
            Worksheet::from_matrix(data, self.config.headers.as_deref())
        } else {
            return Err(ExportError::NoDataSource);
        };

        Ok(SheetOutcome::Built {
            name: self.config.sheet_name().to_string(),
            worksheet: styled(worksheet, self.config.styles.as_ref()),
        })
    }

    fn sheet_source(&self, sheet: &SheetConfig) -> ExportResult<Worksheet> {
        if let Some(table_id) = &sheet.table_id {
            self.table_sheet(table_id)
        } else if let Some(data) = &sheet.data {
            Ok(Worksheet::from_matrix(data, sheet.headers.as_deref()))
        } else {
            Err(ExportError::MissingSource(sheet.name.clone()))
        }
    }

    fn table_sheet(&self, table_id: &str) -> ExportResult<Worksheet> {
        let table = self
            .document
            .table_by_id(table_id)
            .ok_or_else(|| ExportError::TableNotFound(table_id.to_string()))?;
        Ok(Worksheet::from_table(&table))
    }
}

fn styled(mut worksheet: Worksheet, styles: Option<&TableStyles>) -> Worksheet {
    if let Some(styles) = styles {
        worksheet.apply_styles(styles);
    }
    worksheet
}

fn outcome(name: String, built: ExportResult<Worksheet>) -> SheetOutcome {
    match built {
        Ok(worksheet) => SheetOutcome::Built { name, worksheet },
        Err(reason) => SheetOutcome::Skipped { name, reason },
    }
}
