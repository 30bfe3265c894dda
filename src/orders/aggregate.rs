//! Two-level grouping of normalized rows: by (order, item), then by order

use std::collections::HashMap;
use tracing::debug;
use crate::error::{Error, Result};
use super::{is_blank, NormalizedRow};

/// Label preceding the quantity on every reference line
const QUANTITY_LABEL: &str = "Aantal: ";

/// All rows of one item within one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroup {
    pub order_number: String,
    pub item_code: String,
    /// First non-blank customer name of the group's rows
    pub customer_name: String,
    /// All reference cells concatenated without separator
    pub reference: String,
    /// All product cells concatenated without separator
    pub product: String,
    /// First non-blank quantity of the group's rows
    pub quantity: String,
}

impl ItemGroup {
    fn new(order_number: &str, item_code: &str) -> Self {
        Self {
            order_number: order_number.to_string(),
            item_code: item_code.to_string(),
            customer_name: String::new(),
            reference: String::new(),
            product: String::new(),
            quantity: String::new(),
        }
    }

    fn absorb(&mut self, row: &NormalizedRow) {
        if is_blank(&self.customer_name) && !is_blank(&row.customer_name) {
            self.customer_name = row.customer_name.clone();
        }
        if is_blank(&self.quantity) && !is_blank(&row.quantity) {
            self.quantity = row.quantity.clone();
        }
        self.reference.push_str(&row.reference);
        self.product.push_str(&row.product);
    }

    /// Reference followed by the quantity line, e.g. `"RefA\nAantal: 2"`
    pub fn ref_line(&self) -> String {
        format!("{}\n{}{}", self.reference, QUANTITY_LABEL, self.quantity)
    }
}

/// Everything printed on the label of one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_number: String,
    pub customer_name: String,
    /// Item reference lines joined by newlines, in encounter order
    pub ref_text: String,
    /// Item products joined by newlines, in encounter order
    pub product_text: String,
    pub items: Vec<ItemGroup>,
}

impl OrderSummary {
    fn from_items(order_number: String, items: Vec<ItemGroup>) -> Self {
        let customer_name = items
            .first()
            .map(|item| item.customer_name.clone())
            .unwrap_or_default();
        let ref_text = items.iter().map(ItemGroup::ref_line).collect::<Vec<_>>().join("\n");
        let product_text = items.iter().map(|item| item.product.as_str()).collect::<Vec<_>>().join("\n");

        Self {
            order_number,
            customer_name,
            ref_text,
            product_text,
            items,
        }
    }
}

/// Result of aggregating the orders table
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Distinct declared order numbers in first-seen order
    pub sequence: Vec<String>,
    /// Summaries in first-encounter order
    summaries: Vec<OrderSummary>,
    index: HashMap<String, usize>,
    /// Rows skipped because no order number or item code could be filled in
    pub unkeyed_rows: usize,
}

impl Aggregation {
    /// Summaries in `sequence` order, the order of the label pages
    pub fn ordered_summaries(&self) -> Vec<&OrderSummary> {
        self.sequence
            .iter()
            .filter_map(|order| self.summary(order))
            .collect()
    }

    pub fn summary(&self, order_number: &str) -> Option<&OrderSummary> {
        self.index.get(order_number).map(|&i| &self.summaries[i])
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Declared order numbers, de-duplicated, first occurrence kept
fn order_sequence(rows: &[NormalizedRow]) -> Vec<String> {
    let mut sequence: Vec<String> = Vec::new();
    for order in rows.iter().filter_map(|row| row.declared_order.as_ref()) {
        if sequence.contains(order) {
            debug!("Order {} declared more than once", order);
        } else {
            sequence.push(order.clone());
        }
    }
    sequence
}

/// Group rows into per-order summaries and check them against the declared orders
pub fn aggregate(rows: &[NormalizedRow]) -> Result<Aggregation> {
    let sequence = order_sequence(rows);

    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut group_index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut unkeyed_rows = 0;

    for row in rows {
        let (Some(order), Some(item)) = (row.order_number.as_deref(), row.item_code.as_deref()) else {
            debug!("Page {}: row without order or item key skipped", row.page);
            unkeyed_rows += 1;
            continue;
        };
        let index = *group_index.entry((order, item)).or_insert_with(|| {
            groups.push(ItemGroup::new(order, item));
            groups.len() - 1
        });
        groups[index].absorb(row);
    }

    let mut by_order: Vec<(String, Vec<ItemGroup>)> = Vec::new();
    let mut order_index: HashMap<String, usize> = HashMap::new();
    for group in groups {
        let index = *order_index.entry(group.order_number.clone()).or_insert_with(|| {
            by_order.push((group.order_number.clone(), Vec::new()));
            by_order.len() - 1
        });
        by_order[index].1.push(group);
    }

    let summaries: Vec<OrderSummary> = by_order
        .into_iter()
        .map(|(order, items)| OrderSummary::from_items(order, items))
        .collect();

    let missing_summaries: Vec<String> = sequence
        .iter()
        .filter(|order| !order_index.contains_key(*order))
        .cloned()
        .collect();
    let undeclared: Vec<String> = summaries
        .iter()
        .map(|summary| &summary.order_number)
        .filter(|order| !sequence.contains(order))
        .cloned()
        .collect();
    if !missing_summaries.is_empty() || !undeclared.is_empty() {
        return Err(Error::OrderSequenceMismatch { missing_summaries, undeclared });
    }

    debug!("Aggregated {} rows into {} orders", rows.len(), summaries.len());

    Ok(Aggregation {
        sequence,
        summaries,
        index: order_index,
        unkeyed_rows,
    })
}
