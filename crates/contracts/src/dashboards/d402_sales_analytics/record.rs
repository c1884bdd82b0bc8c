use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{CustomerType, Product, Region};

/// One sale line item as read from the source sheet.
///
/// Field names on the wire follow the sheet's column headers, so a record
/// serializes back into the same shape it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesRecord {
    #[serde(rename = "OrderID")]
    pub order_id: String,

    // Dates
    pub date: NaiveDateTime,
    pub order_date: NaiveDateTime,
    pub delivery_date: NaiveDateTime,

    // Dimensions
    pub region: Region,
    pub product: Product,
    pub customer_type: CustomerType,
    pub payment_method: String,

    // Sums
    pub quantity: u32,
    pub unit_price: f64,
    /// Authoritative revenue of the line, never recomputed from price and quantity
    pub total_price: f64,
    /// Fraction, 0.1 = 10%
    pub discount: f64,
    pub shipping_cost: f64,

    // Info fields
    pub returned: bool,
    pub store_location: String,
    pub salesperson: String,
    pub customer_name: String,
    pub region_manager: String,
    pub promotion: String,
}

impl SalesRecord {
    /// Calendar month of `date` in "YYYY-MM" form
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
