//! Walk the orders document page by page and keep the first table of each page

use std::path::Path;
use lopdf::Document;
use tracing::{debug, info};
use crate::error::Result;
use crate::pdf::open_document;
use super::{Grid, TableExtractor};

/// The first table found on one page of the orders document
#[derive(Debug, Clone, PartialEq)]
pub struct PageTable {
    /// 1-based page number
    pub page_number: u32,
    /// Header row followed by data rows
    pub rows: Grid,
}

impl PageTable {
    /// Number of data rows (excluding the header)
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Collect one table per page, in page order
///
/// Pages without a table contribute nothing; further tables on a page are ignored.
pub fn collect_tables<E>(doc: &Document, extractor: &E) -> Result<Vec<PageTable>>
where
    E: TableExtractor + ?Sized,
{
    let mut tables = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let mut found = extractor.extract_tables(doc, page_id)?;
        if found.is_empty() {
            debug!("Page {}: no table", page_number);
            continue;
        }
        if found.len() > 1 {
            debug!("Page {}: {} tables, keeping the first", page_number, found.len());
        }

        let rows = found.swap_remove(0);
        if rows.is_empty() {
            continue;
        }
        debug!("Page {}: table with {} data rows", page_number, rows.len() - 1);
        tables.push(PageTable { page_number, rows });
    }

    Ok(tables)
}

/// Open the orders document at `path` and collect its tables
pub fn collect_from_path<E>(path: &Path, extractor: &E) -> Result<Vec<PageTable>>
where
    E: TableExtractor + ?Sized,
{
    let doc = open_document(path)?;
    let tables = collect_tables(&doc, extractor)?;
    info!(
        "Found tables on {} of {} pages in {}",
        tables.len(),
        doc.get_pages().len(),
        path.display()
    );
    Ok(tables)
}
