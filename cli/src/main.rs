//! xlsxtab CLI - XLSX worksheet preview and export tool
//!
//! A command-line tool for previewing a worksheet and exporting it to CSV,
//! tab-separated text or JSON.

mod logging;

use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use xlsxtab::render::{export, ExportFormat, ExportOutcome, ExportTarget, PreviewOptions};
use xlsxtab::{summarize, CoreProperties, Table, XlsxReader};

/// XLSX worksheet preview and export
#[derive(Parser)]
#[command(
    name = "xlsxtab",
    author = "iyulab",
    version,
    about = "Preview and export XLSX worksheets",
    long_about = "xlsxtab - Decode an XLSX worksheet into rows of text.\n\n\
                  Shows a console preview with table statistics, or exports the sheet\n\
                  to CSV, tab-separated text, or JSON."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show workbook information and a preview of a sheet
    Show {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Maximum rows in the preview
        #[arg(long, default_value = "10")]
        max_rows: usize,

        /// Maximum cells per preview row
        #[arg(long, default_value = "10")]
        max_cols: usize,

        /// Clip preview cells to this display width
        #[arg(long)]
        max_width: Option<usize>,
    },

    /// Export a sheet to CSV
    Csv {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Export a sheet to tab-separated text
    #[command(visible_alias = "txt")]
    Tsv {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Export a sheet and its statistics to JSON
    Json {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct SheetArgs {
    /// Input file path
    input: PathBuf,

    /// Sheet to read: part name, sheet number, or sheet name (default: first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Read sheet1 when the requested sheet does not exist
    #[arg(long)]
    fallback: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output file path (default: input path with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A decoded sheet and what the report needs to know about it.
struct Decoded {
    table: Table,
    part: String,
    metadata: CoreProperties,
    elapsed: Duration,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} [{}]: {}", "Error".red().bold(), e.stage(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> xlsxtab::Result<()> {
    match cli.command {
        Commands::Show {
            sheet,
            max_rows,
            max_cols,
            max_width,
        } => {
            let pb = create_spinner("Decoding worksheet...");
            let decoded = decode(&sheet);
            pb.finish_and_clear();
            let decoded = decoded?;

            let options = PreviewOptions::new()
                .with_max_rows(max_rows)
                .with_max_cols(max_cols)
                .with_max_cell_width(max_width);
            print_report(&sheet, &decoded, options)?;
        }

        Commands::Csv { export } => export_sheet(&export, ExportFormat::Csv)?,
        Commands::Tsv { export } => export_sheet(&export, ExportFormat::TAB)?,
        Commands::Json { export } => export_sheet(&export, ExportFormat::Json)?,

        Commands::Sheets { input } => {
            let reader = XlsxReader::open(&input)?;

            println!("{}", "Sheets".cyan().bold());
            println!("{}", "─".repeat(40));
            if reader.sheets().is_empty() {
                println!("{}", "(no workbook sheet list)".dimmed());
            }
            for (i, entry) in reader.sheets().iter().enumerate() {
                println!(
                    "{:>3}. {} {}",
                    i + 1,
                    entry.name.bold(),
                    entry.part.as_deref().unwrap_or("(no part)").dimmed()
                );
            }

            println!("\n{}", "Worksheet Parts".cyan().bold());
            println!("{}", "─".repeat(40));
            for part in reader.sheet_parts() {
                println!("  {}", part);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Open, resolve and decode. The archive is released before returning.
fn decode(args: &SheetArgs) -> xlsxtab::Result<Decoded> {
    let start = Instant::now();

    let reader = XlsxReader::open(&args.input)?.with_default_fallback(args.fallback);
    let part = reader.resolve_sheet(args.sheet.as_deref().unwrap_or(""))?;
    let table = reader.read_part(&part)?;
    let metadata = reader.metadata();

    Ok(Decoded {
        table,
        part,
        metadata,
        elapsed: start.elapsed(),
    })
}

fn export_sheet(args: &ExportArgs, format: ExportFormat) -> xlsxtab::Result<()> {
    let pb = create_spinner("Decoding worksheet...");
    let decoded = decode(&args.sheet);
    let decoded = match decoded {
        Ok(d) => d,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Writing output...");
    let target = ExportTarget::file(format, &args.sheet.input, args.output.clone());
    let outcome = export(&decoded.table, &target);
    pb.finish_and_clear();

    if let ExportOutcome::Written { path, bytes } = outcome? {
        let label = match format {
            ExportFormat::Csv => "CSV",
            ExportFormat::Delimited(_) => "text",
            ExportFormat::Json => "JSON",
        };
        println!(
            "{} Exported {} rows to {}: {} ({} bytes)",
            "✓".green().bold(),
            decoded.table.len(),
            label,
            path.display(),
            bytes
        );
    }

    Ok(())
}

fn print_report(args: &SheetArgs, decoded: &Decoded, options: PreviewOptions) -> xlsxtab::Result<()> {
    let size = fs::metadata(&args.input)?.len();
    let stats = summarize(&decoded.table).with_elapsed(decoded.elapsed);

    println!("{}", "Workbook Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        args.input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {} bytes", "Size".bold(), size);
    if let Some(ref title) = decoded.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref creator) = decoded.metadata.creator {
        println!("{}: {}", "Author".bold(), creator);
    }
    if let Some(ref modified) = decoded.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    println!("{}: {}", "Sheet".bold(), decoded.part);
    if let Some(elapsed) = stats.elapsed {
        println!(
            "{}: {:.2} ms",
            "Decode time".bold(),
            elapsed.as_secs_f64() * 1000.0
        );
    }

    println!("\n{}", "Table Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Rows".bold(), stats.row_count);
    println!("{}: {}", "Max columns".bold(), stats.max_columns);
    println!("{}: {}", "Cells".bold(), stats.cell_count);

    println!("\n{}", "Preview".cyan().bold());
    println!("{}", "─".repeat(40));
    if let ExportOutcome::Preview(text) = export(&decoded.table, &ExportTarget::Console(options))? {
        print!("{}", text);
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "xlsxtab".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("XLSX worksheet preview and CSV/TSV export");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
