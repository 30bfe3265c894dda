//! Turn per-page table grids into one flat, repaired sequence of order rows
//!
//! Pages are concatenated in page order and aligned by column name. Columns
//! that are blank on every row of the whole document are pruned (except the
//! consumed ones), and the order number and item code are forward-filled: a
//! blank cell takes the nearest non-blank value above it, across page breaks.

use tracing::debug;
use crate::error::{Error, Result};
use crate::table::PageTable;
use super::{is_blank, ColumnNames};

/// One order-table row with the consumed columns as named fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRow {
    /// Page the row came from (1-based)
    pub page: u32,
    /// Order number as printed on this row, `None` when the cell was blank
    pub declared_order: Option<String>,
    /// Order number after forward-fill
    pub order_number: Option<String>,
    /// Item code after forward-fill
    pub item_code: Option<String>,
    pub customer_name: String,
    pub reference: String,
    pub product: String,
    pub quantity: String,
    /// Remaining non-empty columns, in column order
    pub extra: Vec<(String, String)>,
}

impl NormalizedRow {
    /// Whether this row starts a new order
    pub fn declares_order(&self) -> bool {
        self.declared_order.is_some()
    }
}

/// All pages' rows aligned to the union of their headers
#[derive(Debug, Default)]
struct RawTable {
    columns: Vec<String>,
    rows: Vec<(u32, Vec<String>)>,
}

impl RawTable {
    fn column_index(&mut self, name: &str) -> usize {
        match self.columns.iter().position(|c| c == name) {
            Some(index) => index,
            None => {
                self.columns.push(name.to_string());
                self.columns.len() - 1
            }
        }
    }

    fn push_page(&mut self, table: &PageTable) {
        let Some((header, body)) = table.rows.split_first() else {
            return;
        };

        // Map page column -> union column; a repeated name keeps its first column
        let mut mapping: Vec<Option<usize>> = Vec::with_capacity(header.len());
        for (position, raw_name) in header.iter().enumerate() {
            let name = match raw_name.trim() {
                "" => format!("Col{}", position + 1),
                trimmed => trimmed.to_string(),
            };
            let index = self.column_index(&name);
            if mapping.contains(&Some(index)) {
                debug!("Page {}: duplicate column {:?} ignored", table.page_number, name);
                mapping.push(None);
            } else {
                mapping.push(Some(index));
            }
        }

        for cells in body {
            let mut row = vec![String::new(); self.columns.len()];
            for (cell, target) in cells.iter().zip(&mapping) {
                if let Some(index) = target {
                    row[*index] = cell.trim().to_string();
                }
            }
            self.rows.push((table.page_number, row));
        }
    }

    /// Pad rows of earlier pages up to the final column count
    fn finish(mut self) -> Self {
        let width = self.columns.len();
        for (_, row) in &mut self.rows {
            row.resize(width, String::new());
        }
        self
    }
}

/// Normalize the collected page tables into forward-filled rows
///
/// Fails with [`Error::MissingColumns`] when a consumed column appears on no page.
pub fn normalize(tables: &[PageTable], columns: &ColumnNames) -> Result<Vec<NormalizedRow>> {
    let mut raw = RawTable::default();
    for table in tables {
        raw.push_page(table);
    }
    let raw = raw.finish();

    if raw.columns.is_empty() {
        return Ok(Vec::new());
    }

    let missing: Vec<String> = columns
        .required()
        .iter()
        .filter(|name| !raw.columns.iter().any(|c| c == *name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }
    if raw.rows.is_empty() {
        debug!("Order tables hold a header but no rows");
        return Ok(Vec::new());
    }

    let position = |name: &str| raw.columns.iter().position(|c| c == name).unwrap_or_default();
    let order_col = position(&columns.order_number);
    let item_col = position(&columns.item_code);
    let customer_col = position(&columns.customer_name);
    let reference_col = position(&columns.reference);
    let product_col = position(&columns.product);
    let quantity_col = position(&columns.quantity);

    // Passthrough columns survive only when some row has a value
    let passthrough: Vec<usize> = (0..raw.columns.len())
        .filter(|&index| !columns.is_required(&raw.columns[index]))
        .filter(|&index| raw.rows.iter().any(|(_, row)| !is_blank(&row[index])))
        .collect();
    let required = raw.columns.iter().filter(|c| columns.is_required(c)).count();
    let pruned = raw.columns.len() - required - passthrough.len();
    if pruned > 0 {
        debug!("Dropped {} empty columns", pruned);
    }

    let non_blank = |value: &str| (!is_blank(value)).then(|| value.to_string());

    let mut last_order: Option<String> = None;
    let mut last_item: Option<String> = None;
    let mut rows = Vec::with_capacity(raw.rows.len());

    for (page, row) in &raw.rows {
        let declared_order = non_blank(&row[order_col]);
        if declared_order.is_some() {
            last_order = declared_order.clone();
        }
        if let Some(item) = non_blank(&row[item_col]) {
            last_item = Some(item);
        }

        rows.push(NormalizedRow {
            page: *page,
            declared_order,
            order_number: last_order.clone(),
            item_code: last_item.clone(),
            customer_name: row[customer_col].clone(),
            reference: row[reference_col].clone(),
            product: row[product_col].clone(),
            quantity: row[quantity_col].clone(),
            extra: passthrough
                .iter()
                .map(|&index| (raw.columns[index].clone(), row[index].clone()))
                .collect(),
        });
    }

    debug!("Normalized {} rows from {} tables", rows.len(), tables.len());
    Ok(rows)
}
