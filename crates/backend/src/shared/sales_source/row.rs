use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use contracts::dashboards::d402_sales_analytics::SalesRecord;
use contracts::enums::{CustomerType, Product, Region};
use std::collections::HashMap;
use thiserror::Error;

/// One cell as read from the sheet, independent of the file format
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// Sheet row keyed by column header
pub type RawRow = HashMap<String, RawCell>;

/// Why a row was dropped before reaching the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("Missing required fields")]
    MissingRequired,

    #[error("Invalid {0}")]
    InvalidField(&'static str),
}

const TEXT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const TEXT_DAY_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

impl RawCell {
    /// Text cell trimmed, or a number/bool rendered as text
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            RawCell::Number(n) => Some(n.to_string()),
            RawCell::Bool(b) => Some(b.to_string()),
            RawCell::DateTime(dt) => Some(dt.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) if n.is_finite() => Some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            RawCell::DateTime(dt) => Some(*dt),
            RawCell::Number(serial) => excel_serial_to_datetime(*serial),
            RawCell::Text(s) => parse_text_datetime(s.trim()),
            _ => None,
        }
    }

    /// Booleans and yes/no, true/false, 1/0 spellings; anything else is false
    pub fn as_bool(&self) -> bool {
        match self {
            RawCell::Bool(b) => *b,
            RawCell::Number(n) => *n != 0.0,
            RawCell::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            ),
            _ => false,
        }
    }
}

/// Excel stores dates as days since 1899-12-30
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(Duration::milliseconds(millis))
}

fn parse_text_datetime(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in TEXT_DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in TEXT_DAY_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(s, format) {
            return day.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a RawCell {
    row.get(column).unwrap_or(&RawCell::Empty)
}

fn text(row: &RawRow, column: &str) -> String {
    cell(row, column).as_text().unwrap_or_default()
}

fn number_or_zero(row: &RawRow, column: &str) -> f64 {
    cell(row, column).as_number().unwrap_or(0.0)
}

/// Validate a sheet row and turn it into a record.
///
/// `OrderID` and a numeric `TotalPrice` are required, as are a readable
/// `Date` and known `Region`, `Product` and `CustomerType` codes.
pub fn parse_record(row: &RawRow) -> Result<SalesRecord, RowRejection> {
    let order_id = cell(row, "OrderID")
        .as_text()
        .ok_or(RowRejection::MissingRequired)?;
    let total_price = cell(row, "TotalPrice")
        .as_number()
        .ok_or(RowRejection::MissingRequired)?;

    let date = cell(row, "Date")
        .as_datetime()
        .ok_or(RowRejection::InvalidField("Date"))?;
    let order_date = cell(row, "OrderDate").as_datetime().unwrap_or(date);
    let delivery_date = cell(row, "DeliveryDate").as_datetime().unwrap_or(date);

    let region = Region::from_code(&text(row, "Region"))
        .ok_or(RowRejection::InvalidField("Region"))?;
    let product = Product::from_code(&text(row, "Product"))
        .ok_or(RowRejection::InvalidField("Product"))?;
    let customer_type = CustomerType::from_code(&text(row, "CustomerType"))
        .ok_or(RowRejection::InvalidField("CustomerType"))?;

    let quantity = match cell(row, "Quantity") {
        // Blank quantity counts as zero units
        c if c.as_text().is_none() => 0,
        c => match c.as_number() {
            Some(q) if q >= 0.0 && q.fract() == 0.0 && q <= f64::from(u32::MAX) => q as u32,
            _ => return Err(RowRejection::InvalidField("Quantity")),
        },
    };

    Ok(SalesRecord {
        order_id,
        date,
        order_date,
        delivery_date,
        region,
        product,
        customer_type,
        payment_method: text(row, "PaymentMethod"),
        quantity,
        unit_price: number_or_zero(row, "UnitPrice"),
        total_price,
        discount: number_or_zero(row, "Discount"),
        shipping_cost: number_or_zero(row, "ShippingCost"),
        returned: cell(row, "Returned").as_bool(),
        store_location: text(row, "StoreLocation"),
        salesperson: text(row, "Salesperson"),
        customer_name: text(row, "CustomerName"),
        region_manager: text(row, "RegionManager"),
        promotion: text(row, "Promotion"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> RawRow {
        let mut row = RawRow::new();
        row.insert("OrderID".into(), RawCell::Text("ORD-7".into()));
        row.insert("Date".into(), RawCell::Text("2023-02-14".into()));
        row.insert("Region".into(), RawCell::Text("West".into()));
        row.insert("Product".into(), RawCell::Text("Tablet".into()));
        row.insert("CustomerType".into(), RawCell::Text("Wholesale".into()));
        row.insert("Quantity".into(), RawCell::Number(3.0));
        row.insert("UnitPrice".into(), RawCell::Number(200.0));
        row.insert("TotalPrice".into(), RawCell::Number(540.0));
        row.insert("Discount".into(), RawCell::Number(0.1));
        row.insert("PaymentMethod".into(), RawCell::Text(" Cash ".into()));
        row.insert("Returned".into(), RawCell::Text("No".into()));
        row
    }

    #[test]
    fn test_parse_valid_row() {
        let record = parse_record(&valid_row()).unwrap();
        assert_eq!(record.order_id, "ORD-7");
        assert_eq!(record.month_key(), "2023-02");
        assert_eq!(record.order_date, record.date);
        assert_eq!(record.region, Region::West);
        assert_eq!(record.product, Product::Tablet);
        assert_eq!(record.customer_type, CustomerType::Wholesale);
        assert_eq!(record.quantity, 3);
        assert_eq!(record.total_price, 540.0);
        assert_eq!(record.payment_method, "Cash");
        assert!(!record.returned);
        assert_eq!(record.shipping_cost, 0.0);
        assert_eq!(record.salesperson, "");
    }

    #[test]
    fn test_missing_identity_or_revenue_is_rejected() {
        let mut row = valid_row();
        row.insert("OrderID".into(), RawCell::Text("  ".into()));
        assert_eq!(parse_record(&row), Err(RowRejection::MissingRequired));

        let mut row = valid_row();
        row.insert("TotalPrice".into(), RawCell::Text("n/a".into()));
        assert_eq!(parse_record(&row), Err(RowRejection::MissingRequired));

        let mut row = valid_row();
        row.remove("TotalPrice");
        assert_eq!(parse_record(&row), Err(RowRejection::MissingRequired));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut row = valid_row();
        row.insert("Region".into(), RawCell::Text("Atlantis".into()));
        assert_eq!(parse_record(&row), Err(RowRejection::InvalidField("Region")));

        let mut row = valid_row();
        row.insert("Quantity".into(), RawCell::Number(-1.0));
        assert_eq!(parse_record(&row), Err(RowRejection::InvalidField("Quantity")));

        let mut row = valid_row();
        row.insert("Quantity".into(), RawCell::Text("three".into()));
        assert_eq!(parse_record(&row), Err(RowRejection::InvalidField("Quantity")));
    }

    #[test]
    fn test_blank_quantity_is_zero() {
        let mut row = valid_row();
        row.insert("Quantity".into(), RawCell::Text(" ".into()));
        assert_eq!(parse_record(&row).unwrap().quantity, 0);

        let mut row = valid_row();
        row.remove("Quantity");
        assert_eq!(parse_record(&row).unwrap().quantity, 0);
    }

    #[test]
    fn test_date_cells() {
        // 44971 = 2023-02-14
        let dt = RawCell::Number(44971.5).as_datetime().unwrap();
        assert_eq!(dt.to_string(), "2023-02-14 12:00:00");

        let dt = RawCell::Text("02/14/2023".into()).as_datetime().unwrap();
        assert_eq!(dt.to_string(), "2023-02-14 00:00:00");

        let dt = RawCell::Text("2023-02-14T08:15:00Z".into()).as_datetime().unwrap();
        assert_eq!(dt.to_string(), "2023-02-14 08:15:00");

        assert!(RawCell::Text("yesterday".into()).as_datetime().is_none());
        assert!(RawCell::Empty.as_datetime().is_none());
    }

    #[test]
    fn test_returned_flag_spellings() {
        assert!(RawCell::Bool(true).as_bool());
        assert!(RawCell::Text("TRUE".into()).as_bool());
        assert!(RawCell::Text("yes".into()).as_bool());
        assert!(RawCell::Number(1.0).as_bool());
        assert!(!RawCell::Text("false".into()).as_bool());
        assert!(!RawCell::Text("No".into()).as_bool());
        assert!(!RawCell::Empty.as_bool());
    }
}
