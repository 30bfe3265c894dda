//! Outcome of a merge run and the non-fatal conditions met along the way

use std::fmt;
use std::path::PathBuf;

/// A condition worth telling the user about that did not stop the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Orders and label pages differ in count; the output holds the shorter of the two
    PageCountMismatch { orders: usize, label_pages: usize },
    /// Rows without an order number or item code that were left out of every summary
    UnkeyedRows { count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PageCountMismatch { orders, label_pages } => write!(
                f,
                "{} orders but {} label pages; only the first {} were combined",
                orders,
                label_pages,
                orders.min(label_pages)
            ),
            Warning::UnkeyedRows { count } => {
                write!(f, "{} order rows had no order number or item code and were skipped", count)
            }
        }
    }
}

/// Summary of a completed merge
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output: PathBuf,
    /// Orders found in the orders document
    pub orders: usize,
    /// Pages in the labels document
    pub label_pages: usize,
    /// Pages in the output document
    pub pages_written: usize,
    /// Size of the output file
    pub bytes_written: usize,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
