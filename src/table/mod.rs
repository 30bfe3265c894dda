//! Table collection from the orders document
//!
//! Tables are recovered from positioned text: fragments are grouped into
//! lines, a line holding enough known column headers starts a table, and the
//! header cells' x positions define the columns for the lines below it.

pub mod collect;
pub mod extract;
pub mod text;

use lopdf::{Document, ObjectId};
use crate::error::Result;
use crate::orders::ColumnNames;

pub use collect::{collect_from_path, collect_tables, PageTable};
pub use extract::TextTableExtractor;

/// One table as rows of string cells, header row first
pub type Grid = Vec<Vec<String>>;

/// Source of tables for a single page
pub trait TableExtractor {
    /// All tables detected on the page, in reading order
    fn extract_tables(&self, doc: &Document, page_id: ObjectId) -> Result<Vec<Grid>>;
}

/// Tuning for [`TextTableExtractor`]
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Header labels that identify a table's header line
    pub header_markers: Vec<String>,
    /// How many distinct markers a line needs to count as a header
    pub min_header_matches: usize,
    /// Columns that start a new row; a line blank in all of them continues the row above
    pub row_keys: Vec<String>,
    /// Max baseline difference (pt) for fragments on the same line
    pub line_tolerance: f32,
    /// Max horizontal gap, in font sizes, between fragments of one header cell
    pub word_gap: f32,
    /// Slack (pt) when matching a fragment to the column starting right of it
    pub column_tolerance: f32,
    /// Vertical gap, in font sizes, that ends a table
    pub max_row_gap: f32,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self::for_columns(&ColumnNames::default())
    }
}

impl TableSettings {
    /// Settings recognising the header line of the given columns
    pub fn for_columns(columns: &ColumnNames) -> Self {
        Self {
            header_markers: columns.required().iter().map(|s| s.to_string()).collect(),
            min_header_matches: 3,
            row_keys: vec![columns.order_number.clone(), columns.item_code.clone()],
            line_tolerance: 2.0,
            word_gap: 0.6,
            column_tolerance: 3.0,
            max_row_gap: 4.0,
        }
    }
}
