//! The end-to-end merge: orders table → order summaries → annotated labels

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::error::{Error, Result};
use crate::orders::{aggregate, normalize, Aggregation, ColumnNames};
use crate::pdf::{compose, open_document, write_document, OverlayOptions};
use crate::report::{RunReport, Warning};
use crate::table::{collect_from_path, PageTable, TableSettings, TextTableExtractor};

/// Input and output locations of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub orders: PathBuf,
    pub labels: PathBuf,
    pub output: PathBuf,
}

/// Everything that tunes a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub columns: ColumnNames,
    pub table: TableSettings,
    pub overlay: OverlayOptions,
    /// Fail instead of warning when orders and label pages differ in count
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        let columns = ColumnNames::default();
        Self {
            table: TableSettings::for_columns(&columns),
            columns,
            overlay: OverlayOptions::default(),
            strict: false,
        }
    }
}

/// Tables and summaries read from an orders document
#[derive(Debug, Clone)]
pub struct Inspection {
    pub tables: Vec<PageTable>,
    pub aggregation: Aggregation,
}

/// Read the orders document into per-order summaries
pub fn inspect(orders: &Path, options: &RunOptions) -> Result<Inspection> {
    let extractor = TextTableExtractor::new(options.table.clone());
    let tables = collect_from_path(orders, &extractor)?;
    if tables.is_empty() {
        return Err(Error::NoOrderTables(orders.to_path_buf()));
    }

    let rows = normalize(&tables, &options.columns)?;
    if rows.is_empty() {
        return Err(Error::NoOrderTables(orders.to_path_buf()));
    }
    let aggregation = aggregate(&rows)?;
    info!("Read {} orders from {} rows", aggregation.len(), rows.len());

    Ok(Inspection { tables, aggregation })
}

/// Run the whole merge and write the output once it is complete
///
/// No output file is created when any step fails.
pub fn run(paths: &RunPaths, options: &RunOptions) -> Result<RunReport> {
    let mut warnings = Vec::new();

    let Inspection { aggregation, .. } = inspect(&paths.orders, options)?;
    if aggregation.unkeyed_rows > 0 {
        warnings.push(Warning::UnkeyedRows { count: aggregation.unkeyed_rows });
    }

    let texts: Vec<&str> = aggregation
        .ordered_summaries()
        .into_iter()
        .map(|summary| summary.ref_text.as_str())
        .collect();

    let labels = open_document(&paths.labels)?;
    let label_pages = labels.get_pages().len();

    if options.strict && texts.len() != label_pages {
        return Err(Error::PageCountMismatch { orders: texts.len(), label_pages });
    }

    let mut composition = compose(labels, &texts, &options.overlay)?;
    if composition.is_count_mismatch() {
        warnings.push(Warning::PageCountMismatch { orders: texts.len(), label_pages });
    }

    let bytes_written = write_document(&mut composition.document, &paths.output)?;
    info!(
        "Wrote {} pages to {}",
        composition.pages_written,
        paths.output.display()
    );

    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(RunReport {
        output: paths.output.clone(),
        orders: texts.len(),
        label_pages,
        pages_written: composition.pages_written,
        bytes_written,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_recognise_default_columns() {
        let options = RunOptions::default();
        assert!(options.table.header_markers.contains(&options.columns.order_number));
        assert!(!options.strict);
    }

    #[test]
    fn test_missing_orders_file_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = RunPaths {
            orders: dir.path().join("orders.pdf"),
            labels: dir.path().join("labels.pdf"),
            output: dir.path().join("out.pdf"),
        };

        let result = run(&paths, &RunOptions::default());

        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
        assert!(!paths.output.exists());
    }
}
