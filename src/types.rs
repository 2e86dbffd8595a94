use crate::error::ExportResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

//==============================================================================
// Cell Values
//==============================================================================

/// A single cell value in a data matrix or a built worksheet.
///
/// Deserializes from plain YAML/JSON scalars; `null` maps to [`CellValue::Empty`],
/// which leaves a gap instead of writing a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Coerce trimmed cell text the way a table scrape does: finite numbers
    /// become [`CellValue::Number`], everything else stays text.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CellValue::Text(String::new());
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

//==============================================================================
// Cell Styles
//==============================================================================

/// Border line style of one cell edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderLineStyle {
    #[default]
    Thin,
    Medium,
    Thick,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Fill pattern; `Solid` is assumed whenever a background color is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    #[default]
    Solid,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Hex color, `#RRGGBB` or bare `RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<PatternType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BorderLineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
}

/// Library-agnostic cell style. Every facet is optional and an absent facet
/// leaves the cell untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentStyle>,
    /// Excel number format string, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

impl CellStyle {
    /// True when no facet is set
    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.fill.is_none()
            && self.border.is_none()
            && self.alignment.is_none()
            && self.number_format.is_none()
    }
}

/// Style plan for one worksheet.
///
/// Applied in order: `header_row`, then `data_row` / `alternating_row`, then
/// `cells`, so a custom range always wins over row styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row: Option<CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_row: Option<CellStyle>,
    /// Replaces `data_row` on the 2nd, 4th, ... data row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternating_row: Option<CellStyle>,
    /// Range reference (`"A1"`, `"D2:D5"`) to style, in insertion order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<IndexMap<String, CellStyle>>,
}

//==============================================================================
// Export Configuration
//==============================================================================

/// Output workbook format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    #[default]
    Xlsx,
    Xls,
}

impl BookType {
    pub fn extension(&self) -> &'static str {
        match self {
            BookType::Xlsx => "xlsx",
            BookType::Xls => "xls",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            BookType::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            BookType::Xls => "application/vnd.ms-excel",
        }
    }
}

impl std::str::FromStr for BookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(BookType::Xlsx),
            "xls" => Ok(BookType::Xls),
            other => Err(format!("unknown format '{}', expected xlsx or xls", other)),
        }
    }
}

/// One sheet of an explicit multi-sheet export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<CellValue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<TableStyles>,
}

impl SheetConfig {
    pub fn from_table(name: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_id: Some(table_id.into()),
            ..Default::default()
        }
    }

    pub fn from_data(name: impl Into<String>, data: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_styles(mut self, styles: TableStyles) -> Self {
        self.styles = Some(styles);
        self
    }
}

/// Everything one export call needs.
///
/// The source is picked by precedence: `sheets`, then `tables`, then a single
/// `table` or `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output file name without extension
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<SheetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<CellValue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    /// Sheet name for single table/data exports, `Sheet1` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(default)]
    pub format: BookType,
    /// Only honored together with a single `table`
    #[serde(default)]
    pub use_legacy_export: bool,
    /// Ignored by explicit `sheets`, which carry their own styles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<TableStyles>,
}

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

impl ExportConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// Load a config from a YAML (or JSON) file
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ExportResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn sheet_name(&self) -> &str {
        self.sheet.as_deref().unwrap_or(DEFAULT_SHEET_NAME)
    }

    /// Whether any style is configured, which selects the styled encoder path
    pub fn has_styles(&self) -> bool {
        self.styles.is_some()
            || self
                .sheets
                .as_ref()
                .is_some_and(|sheets| sheets.iter().any(|s| s.styles.is_some()))
    }

    /// Whether the HTML-template `.xls` path is taken instead of a workbook
    pub fn is_legacy(&self) -> bool {
        self.use_legacy_export && self.table.is_some()
    }

    /// Output file name including the extension. Legacy exports are always `.xls`.
    pub fn output_file_name(&self) -> String {
        let extension = if self.is_legacy() {
            BookType::Xls.extension()
        } else {
            self.format.extension()
        };
        format!("{}.{}", self.file_name, extension)
    }
}
