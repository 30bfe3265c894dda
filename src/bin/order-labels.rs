//! Order Labels CLI tool
//!
//! A command-line tool for stamping order summaries onto shipping labels.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use order_labels::discover::find_default_inputs;
use order_labels::layout::PageDimensions;
use order_labels::pdf::count_pages;
use order_labels::{inspect, run, Error, RunOptions, RunPaths};

/// Order Labels - Put order references and quantities on bol.com shipping labels
#[derive(Parser)]
#[command(name = "order-labels")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Use the exports in the current directory, write output.pdf
    order-labels merge

    # Name every file explicitly and open the result
    order-labels merge --orders \"bol.com - Bestellingen.pdf\" --labels verzendzegels-2024-05-01.pdf -o labels.pdf --open

    # Show what would be printed on each label
    order-labels inspect \"bol.com - Bestellingen.pdf\"")]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp each order's summary onto its shipping label page
    Merge(MergeArgs),

    /// Print the order tables and summaries read from an orders PDF
    Inspect {
        /// Orders PDF file
        orders: PathBuf,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Args)]
struct MergeArgs {
    /// Orders PDF (default: "bol.com - Bestellingen.pdf" in the current directory)
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Shipping labels PDF (default: first "verzendzegels*.pdf" in the current directory)
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output PDF file path (default: output.pdf in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when the number of orders and label pages differ
    #[arg(long)]
    strict: bool,

    /// Font size of the summary text in points
    #[arg(long, default_value_t = 6.0)]
    font_size: f32,

    /// Distance of the text from the left page edge in points
    #[arg(long, default_value_t = 5.0)]
    anchor_x: f32,

    /// Height of the first text line above the bottom page edge in points
    #[arg(long, default_value_t = 150.0)]
    anchor_y: f32,

    /// Canvas format of the text overlay (a1, a4 or a6)
    #[arg(long, default_value = "a1")]
    canvas: String,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "order_labels=debug" } else { "order_labels=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Merge(args) => cmd_merge(args),
        Commands::Inspect { orders } => cmd_inspect(&orders),
        Commands::Info { input } => cmd_info(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Fill in missing paths from the current directory
fn resolve_paths(args: &MergeArgs) -> Result<RunPaths> {
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    let defaults = find_default_inputs(&cwd)?;

    let orders = args
        .orders
        .clone()
        .or(defaults.orders)
        .ok_or(Error::MissingInput("orders PDF"))?;
    let labels = args
        .labels
        .clone()
        .or(defaults.labels)
        .ok_or(Error::MissingInput("labels PDF"))?;
    let output = args.output.clone().unwrap_or(defaults.output);

    Ok(RunPaths { orders, labels, output })
}

/// Merge order summaries onto the label pages
fn cmd_merge(args: MergeArgs) -> Result<()> {
    let paths = resolve_paths(&args)?;

    let mut options = RunOptions { strict: args.strict, ..RunOptions::default() };
    options.overlay.font_size = args.font_size;
    options.overlay.anchor_x = args.anchor_x;
    options.overlay.anchor_y = args.anchor_y;
    options.overlay.canvas = PageDimensions::from_name(&args.canvas)
        .ok_or_else(|| anyhow!("Unknown canvas format: {}", args.canvas))?;

    eprintln!("Orders: {}", paths.orders.display());
    eprintln!("Labels: {}", paths.labels.display());

    let report = run(&paths, &options)
        .with_context(|| format!("Failed to create {}", paths.output.display()))?;

    eprintln!(
        "Output: {} ({} of {} label pages, {} orders)",
        report.output.display(),
        report.pages_written,
        report.label_pages,
        report.orders
    );

    if args.open {
        open_file(&report.output)?;
    }

    Ok(())
}

/// Print tables and summaries of an orders PDF
fn cmd_inspect(orders: &Path) -> Result<()> {
    let inspection = inspect(orders, &RunOptions::default())
        .with_context(|| format!("Failed to read orders from {}", orders.display()))?;

    for table in &inspection.tables {
        println!("Page {} ({} rows)", table.page_number, table.data_rows());
        for row in &table.rows {
            println!("  {}", row.join(" | ").replace('\n', " / "));
        }
    }
    println!();

    for (position, summary) in inspection.aggregation.ordered_summaries().iter().enumerate() {
        println!("Label {}: order {} for {}", position + 1, summary.order_number, summary.customer_name);
        for line in summary.ref_text.lines() {
            println!("    {}", line);
        }
        for product in summary.product_text.lines() {
            println!("    - {}", product);
        }
    }

    if inspection.aggregation.unkeyed_rows > 0 {
        eprintln!("Warning: {} rows without order number or item code", inspection.aggregation.unkeyed_rows);
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let pages = count_pages(input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", pages);

    Ok(())
}
