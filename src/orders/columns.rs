//! Names of the orders-table columns the aggregation consumes

/// Header labels for the consumed columns, matched verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub order_number: String,
    pub item_code: String,
    pub customer_name: String,
    pub reference: String,
    pub product: String,
    pub quantity: String,
}

impl Default for ColumnNames {
    /// The labels used by bol.com order overviews
    fn default() -> Self {
        Self {
            order_number: "Bestelnr.".to_string(),
            item_code: "EAN".to_string(),
            customer_name: "Klantnaam".to_string(),
            reference: "Referentie".to_string(),
            product: "Product".to_string(),
            quantity: "Aant.".to_string(),
        }
    }
}

impl ColumnNames {
    /// All consumed columns, in table order
    pub fn required(&self) -> [&str; 6] {
        [
            self.order_number.as_str(),
            self.item_code.as_str(),
            self.customer_name.as_str(),
            self.reference.as_str(),
            self.product.as_str(),
            self.quantity.as_str(),
        ]
    }

    pub fn is_required(&self, header: &str) -> bool {
        self.required().contains(&header)
    }
}
