use crate::dom::{Document, HtmlDocument};
use crate::download::DirectoryDownloader;
use crate::error::{ExportError, ExportResult};
use crate::exporter::Exporter;
use crate::types::{BookType, ExportConfig};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the config and apply command-line overrides
fn load_config(config_path: &Path, format: Option<BookType>) -> ExportResult<ExportConfig> {
    let mut config = ExportConfig::from_path(config_path)?;
    if let Some(format) = format {
        config.format = format;
    }
    Ok(config)
}

/// Describe where the rows of an export come from
fn describe_source(config: &ExportConfig) -> String {
    if let Some(sheets) = config.sheets.as_ref().filter(|s| !s.is_empty()) {
        format!("{} sheet(s)", sheets.len())
    } else if let Some(tables) = config.tables.as_ref().filter(|t| !t.is_empty()) {
        format!("tables {}", tables.join(", "))
    } else if let Some(table) = &config.table {
        format!("table #{}", table)
    } else if let Some(data) = &config.data {
        format!("{} data row(s)", data.len())
    } else {
        "nothing".to_string()
    }
}

fn load_document(html: Option<&Path>) -> ExportResult<HtmlDocument> {
    match html {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(HtmlDocument::parse(&content))
        }
        None => Ok(HtmlDocument::empty()),
    }
}

/// Execute the export command
pub fn export(
    config_path: PathBuf,
    html: Option<PathBuf>,
    out_dir: PathBuf,
    format: Option<BookType>,
    verbose: bool,
) -> ExportResult<()> {
    println!("{}", "📊 tablexcel - Excel Export".bold().green());
    println!("   Config: {}", config_path.display());
    if let Some(ref html) = html {
        println!("   HTML:   {}", html.display());
    }
    println!("   Output: {}\n", out_dir.display());

    if verbose {
        println!("{}", "📖 Loading config...".cyan());
    }
    let config = load_config(&config_path, format)?;
    let document = load_document(html.as_deref())?;

    if verbose {
        println!("   Source: {}", describe_source(&config));
        println!("   Tables in document: {}", document.table_ids().len());
        if config.is_legacy() {
            println!("   Mode:   {}", "legacy HTML template".yellow());
        }
        println!();
    }

    if !out_dir.is_dir() {
        return Err(ExportError::Config(format!(
            "Output directory does not exist: {}",
            out_dir.display()
        )));
    }

    let file_name = config.output_file_name();
    let mut exporter =
        Exporter::new(config, DirectoryDownloader::new(&out_dir)).with_document(document);

    if exporter.on_download() {
        println!("{}", "✅ Export Complete!".bold().green());
        println!("   File: {}\n", out_dir.join(file_name).display());
        Ok(())
    } else {
        println!("{}", "❌ Export failed".bold().red());
        Err(exporter
            .take_last_error()
            .unwrap_or(ExportError::Download(file_name)))
    }
}

/// Execute the inspect command: list the addressable tables of an HTML file
pub fn inspect(html: PathBuf) -> ExportResult<()> {
    println!("{}", "🔍 tablexcel - Tables".bold().green());
    println!("   File: {}\n", html.display());

    let document = load_document(Some(&html))?;
    let ids = document.table_ids();
    if ids.is_empty() {
        println!("{}", "   No tables with an id found".yellow());
        return Ok(());
    }

    for id in ids {
        if let Some(table) = document.table_by_id(id) {
            println!(
                "   {} {} header row(s), {} body row(s)",
                format!("#{}", id).bright_blue().bold(),
                table.header_rows.len(),
                table.body_rows.len()
            );
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
