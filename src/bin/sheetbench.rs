use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use sheetbench::config::Config;
use sheetbench::core::{ColumnSelection, Table};
use sheetbench::services::IntakeService;
use sheetbench::transform::Paginator;
use sheetbench::transform::chart::{category_counts, line_series};
use sheetbench::{View, Workbench};
use std::path::PathBuf;
use tracing::{error, info};

/// Load, filter, compare and recombine spreadsheet files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum, global = true)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show headers, row count and one page of every file
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: isize,
    },
    /// Filter one file by column substrings
    Filter {
        file: PathBuf,
        /// Repeatable. Syntax: COLUMN=PATTERN (case-insensitive substring)
        #[arg(long = "where", value_name = "COLUMN=PATTERN", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        #[arg(long, default_value_t = 1)]
        page: isize,
        /// Write all matching rows to filtered_data.xlsx in the output directory
        #[arg(long)]
        export: bool,
    },
    /// List the columns every file has
    Shared {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Pick columns across files into one table
    Combine {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Repeatable, in output order. Syntax: FILE_NAME:COLUMN
        #[arg(long = "select", value_name = "FILE:COLUMN", value_parser = parse_selection)]
        selections: Vec<ColumnSelection>,
        #[arg(long, default_value_t = 1)]
        page: isize,
        /// Write the combined table to combined_data.xlsx in the output directory
        #[arg(long)]
        export: bool,
    },
    /// Print chart series as JSON
    Chart {
        file: PathBuf,
        /// Count the values of a column (pie chart)
        #[arg(long, conflicts_with = "line", required_unless_present = "line")]
        pie: Option<String>,
        /// Label column of a line chart
        #[arg(long, requires = "values")]
        line: Option<String>,
        /// Value columns of a line chart
        #[arg(long, num_args = 1..)]
        values: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(c, p)| (c.to_string(), p.to_string()))
        .ok_or_else(|| format!("expected COLUMN=PATTERN, got '{s}'"))
}

fn parse_selection(s: &str) -> Result<ColumnSelection, String> {
    s.split_once(':')
        .filter(|(f, c)| !f.is_empty() && !c.is_empty())
        .map(|(f, c)| ColumnSelection::new(f, c))
        .ok_or_else(|| format!("expected FILE:COLUMN, got '{s}'"))
}

/// 1-based CLI page to the 0-based page the workbench clamps
fn page_index(page: isize) -> isize {
    page.saturating_sub(1)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = match args.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn) => Some(tracing::Level::WARN),
        Some(LogLevel::Info) => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => None,
    };
    sheetbench::logging::init_with(None, level)?;

    let config = Config::from_path(args.config.as_ref())?;
    info!("Config: {:?}", config);
    let mut bench = Workbench::new(config);

    match args.command {
        Command::Inspect { files, page } => {
            load(&mut bench, &files).await;
            for index in 0..bench.tables().len() {
                bench.select_table(index)?;
                bench.set_page(View::Filtered, page_index(page));
                if let Some(table) = bench.page(View::Filtered) {
                    println!("== {} ({} columns)", table.name, table.column_count());
                    print_page(&table, bench.pager(View::Filtered));
                }
            }
        }
        Command::Filter {
            file,
            filters,
            page,
            export,
        } => {
            load(&mut bench, &[file]).await;
            if bench.active_table().is_none() {
                return Err(eyre!("nothing to filter"));
            }
            for (column, pattern) in &filters {
                bench.set_filter(column, pattern);
            }
            if !bench.filters().is_empty() {
                println!("Filters: {}", bench.filters().summary());
            }
            bench.set_page(View::Filtered, page_index(page));
            if let Some(table) = bench.page(View::Filtered) {
                print_page(&table, bench.pager(View::Filtered));
            }
            if export {
                let path = bench.export(View::Filtered)?;
                println!("Exported to {}", path.display());
            }
        }
        Command::Shared { files } => {
            load(&mut bench, &files).await;
            if bench.tables().len() < 2 {
                println!("Load at least two files to compare.");
            } else {
                let shared = bench.shared_columns();
                if shared.is_empty() {
                    println!("No shared columns.");
                } else {
                    for column in shared {
                        println!("{column}");
                    }
                }
            }
        }
        Command::Combine {
            files,
            selections,
            page,
            export,
        } => {
            load(&mut bench, &files).await;
            for selection in &selections {
                match bench.select_column(&selection.file_name, &selection.column) {
                    Ok(true) => {}
                    Ok(false) => {
                        eprintln!("Already selected {}:{}", selection.file_name, selection.column)
                    }
                    Err(e) => {
                        eprintln!("Skipping {}:{}: {e}", selection.file_name, selection.column)
                    }
                }
            }
            if bench.selections().is_empty() {
                println!("No columns selected.");
                return Ok(());
            }
            bench.set_page(View::Combined, page_index(page));
            if let Some(table) = bench.page(View::Combined) {
                print_page(&table, bench.pager(View::Combined));
            }
            if export {
                let path = bench.export(View::Combined)?;
                println!("Exported to {}", path.display());
            }
        }
        Command::Chart {
            file,
            pie,
            line,
            values,
        } => {
            load(&mut bench, &[file]).await;
            let table = bench.active_table().ok_or_else(|| eyre!("nothing to chart"))?;
            let series = match (pie, line) {
                (Some(column), _) => category_counts(table, &column)?,
                (None, Some(label)) => {
                    let values: Vec<&str> = values.iter().map(String::as_str).collect();
                    line_series(table, &label, &values)?
                }
                (None, None) => return Err(eyre!("pass --pie or --line")),
            };
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
    }
    Ok(())
}

/// Read a batch of files into the workbench and report the ones that failed
async fn load(bench: &mut Workbench, files: &[PathBuf]) {
    let report = IntakeService::load_batch(files).await;
    for failure in bench.apply_report(report) {
        error!("{failure}");
        eprintln!("{failure}");
    }
}

fn print_page(table: &Table, pager: Paginator) {
    if table.headers.is_empty() || table.is_empty() {
        println!("No data.");
        return;
    }
    println!("{}", table.header_names().join(" | "));
    for row in &table.rows {
        let cells: Vec<String> = (0..table.column_count())
            .map(|idx| row.get(idx).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!(
        "-- page {} of {} ({} rows)",
        pager.page_number(),
        pager.total_pages(),
        pager.total_rows()
    );
}
