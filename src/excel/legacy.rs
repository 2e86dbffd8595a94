//! Legacy `.xls` export: table markup wrapped in an Excel HTML template

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Prefix of the data URI handed to the downloader
pub const DATA_URI_PREFIX: &str = "data:application/vnd.ms-excel;base64,";

const TEMPLATE_HEAD: &str = concat!(
    r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" "#,
    r#"xmlns:x="urn:schemas-microsoft-com:office:excel" "#,
    r#"xmlns="http://www.w3.org/TR/REC-html40"><head><meta charset="UTF-8">"#,
    "<!--[if gte mso 9]><xml><x:ExcelWorkbook><x:ExcelWorksheets><x:ExcelWorksheet>",
);

const TEMPLATE_TAIL: &str = concat!(
    "<x:WorksheetOptions><x:DisplayGridlines/></x:WorksheetOptions></x:ExcelWorksheet>",
    "</x:ExcelWorksheets></x:ExcelWorkbook></xml><![endif]--></head><body>",
);

/// Render the HTML workbook around one table's outer markup
pub fn render(table_html: &str, sheet_name: &str) -> String {
    format!(
        "{}<x:Name>{}</x:Name>{}{}</body></html>",
        TEMPLATE_HEAD, sheet_name, TEMPLATE_TAIL, table_html
    )
}

/// Render and encode as a `data:` URI
pub fn data_uri(table_html: &str, sheet_name: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(render(table_html, sheet_name)))
}
