//! Order rows: normalization of raw table rows and per-order aggregation

pub mod aggregate;
pub mod columns;
pub mod normalize;

pub use aggregate::{aggregate, Aggregation, ItemGroup, OrderSummary};
pub use columns::ColumnNames;
pub use normalize::{normalize, NormalizedRow};

/// A cell counts as blank when it holds nothing but whitespace
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
