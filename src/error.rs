//! Error types for the order-labels library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the order-labels library
#[derive(Error, Debug)]
pub enum Error {
    /// Input document could not be read or parsed
    #[error("Cannot open {}: {source}", path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// The orders tables lack columns the aggregation needs
    #[error("Orders table is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No page of the orders document carried a table
    #[error("No order table found in {}", .0.display())]
    NoOrderTables(PathBuf),

    /// Declared order numbers and aggregated orders disagree
    #[error(
        "Order sequence does not match aggregated orders (not aggregated: [{}], not declared: [{}])",
        .missing_summaries.join(", "),
        .undeclared.join(", ")
    )]
    OrderSequenceMismatch {
        /// Declared order numbers without a summary
        missing_summaries: Vec<String>,
        /// Summaries whose order number was never declared
        undeclared: Vec<String>,
    },

    /// Label pages and orders differ in count (strict mode only)
    #[error("Page count mismatch: {orders} orders but {label_pages} label pages")]
    PageCountMismatch { orders: usize, label_pages: usize },

    /// Output could not be written
    #[error("Cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required input path was neither given nor discovered
    #[error("No {0} selected; pass it explicitly or place it in the working directory")]
    MissingInput(&'static str),

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),
}

impl Error {
    /// Whether the error stems from the shape of the orders data rather than IO
    pub fn is_data_shape(&self) -> bool {
        matches!(
            self,
            Error::MissingColumns(_) | Error::NoOrderTables(_) | Error::OrderSequenceMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_sides() {
        let err = Error::OrderSequenceMismatch {
            missing_summaries: vec!["1003".to_string()],
            undeclared: vec!["9999".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("not aggregated: [1003]"));
        assert!(message.contains("not declared: [9999]"));
        assert!(err.is_data_shape());
    }

    #[test]
    fn test_missing_columns_message() {
        let err = Error::MissingColumns(vec!["EAN".to_string(), "Aant.".to_string()]);
        assert_eq!(err.to_string(), "Orders table is missing required columns: EAN, Aant.");
    }
}
