use chrono::NaiveDate;
use contracts::dashboards::d402_sales_analytics::SalesRecord;
use contracts::enums::{CustomerType, Product, Region};

/// Minimal record: retail, one unit, paid by credit card, not returned
pub(crate) fn record(
    order_id: &str,
    date: &str,
    region: Region,
    product: Product,
    total_price: f64,
) -> SalesRecord {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    SalesRecord {
        order_id: order_id.to_string(),
        date,
        order_date: date,
        delivery_date: date,
        region,
        product,
        customer_type: CustomerType::Retail,
        payment_method: "Credit Card".to_string(),
        quantity: 1,
        unit_price: total_price,
        total_price,
        discount: 0.0,
        shipping_cost: 0.0,
        returned: false,
        store_location: "Main Street".to_string(),
        salesperson: "Alice".to_string(),
        customer_name: "Customer".to_string(),
        region_manager: "Bob".to_string(),
        promotion: "None".to_string(),
    }
}

pub(crate) fn three_record_scenario() -> Vec<SalesRecord> {
    let mut phone = record("ORD-2", "2023-02-10", Region::East, Product::Phone, 500.0);
    phone.returned = true;
    vec![
        record("ORD-1", "2023-02-01", Region::East, Product::Laptop, 1000.0),
        phone,
        record("ORD-3", "2023-03-15", Region::West, Product::Laptop, 300.0),
    ]
}
