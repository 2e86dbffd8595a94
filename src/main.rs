use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tablexcel::cli;
use tablexcel::types::BookType;

#[derive(Parser)]
#[command(name = "tablexcel")]
#[command(about = "Export HTML tables and data matrices to Excel workbooks")]
#[command(long_about = "tablexcel - HTML tables and data matrices to Excel

An export is described by a YAML (or JSON) config: which table ids or data
matrices to export, how sheets are named, and how cells are styled.

COMMANDS:
  export   - Write the workbook described by a config
  inspect  - List the tables of an HTML file that can be exported

EXAMPLES:
  tablexcel export report.yaml --html page.html
  tablexcel export data.yaml --out-dir build/
  tablexcel inspect page.html")]
#[command(version)]
struct Cli {
    /// Log level filter (overrides RUST_LOG)
    #[arg(long, global = true, env = "TABLEXCEL_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Write the workbook described by a config.

SOURCES (first match wins):
  sheets:  explicit sheets, each from a table_id or data matrix
  tables:  one sheet per table id, named Sheet1, Sheet2, ...
  table:   a single table id
  data:    a single data matrix (with optional headers)

In multi-sheet modes a sheet whose source is missing is skipped; the export
only fails when no sheet could be built.

CONFIG EXAMPLE:
  file_name: report
  table: users
  styles:
    header_row:
      font: { bold: true, color: \"#FFFFFF\" }
      fill: { background_color: \"#4472C4\" }
    cells:
      \"C2:C10\": { number_format: \"0.00\" }

Set use_legacy_export: true with a single table to write an HTML-based .xls.")]
    /// Export tables or data to an Excel file
    Export {
        /// Path to the export config (YAML or JSON)
        config: PathBuf,

        /// HTML file holding the tables to export
        #[arg(long)]
        html: Option<PathBuf>,

        /// Directory the file is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Output format, overrides the config. Only xlsx is encoded; .xls files
        /// come from `use_legacy_export` with a single table
        #[arg(short, long)]
        format: Option<BookType>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List exportable tables in an HTML file
    Inspect {
        /// Path to the HTML file
        html: PathBuf,
    },
}

fn init_tracing(filter: Option<String>) {
    let filter = match filter {
        Some(filter) => tracing_subscriber::EnvFilter::new(filter),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "tablexcel=info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log);

    match cli.command {
        Commands::Export {
            config,
            html,
            out_dir,
            format,
            verbose,
        } => cli::export(config, html, out_dir, format, verbose)?,

        Commands::Inspect { html } => cli::inspect(html)?,
    }

    Ok(())
}
