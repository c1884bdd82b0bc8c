use contracts::dashboards::d402_sales_analytics::{DrillDownFilter, SalesRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Columns of the drill-down detail export
pub const EXPORT_HEADERS: [&str; 14] = [
    "#",
    "Order ID",
    "Date",
    "Customer",
    "Product",
    "Region",
    "Type",
    "Quantity",
    "Unit Price",
    "Discount",
    "Total",
    "Returned",
    "Payment Method",
    "Salesperson",
];

/// Render records as the detail-table CSV.
///
/// The header line is written bare; every data cell is quoted.
pub fn export_csv(records: &[SalesRecord]) -> Result<String, ExportError> {
    let mut buffer = EXPORT_HEADERS.join(",").into_bytes();
    buffer.push(b'\n');
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buffer);

        for (index, record) in records.iter().enumerate() {
            writer.write_record(export_row(index + 1, record))?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buffer)?)
}

fn export_row(number: usize, record: &SalesRecord) -> [String; 14] {
    [
        number.to_string(),
        record.order_id.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        record.customer_name.clone(),
        record.product.code().to_string(),
        record.region.code().to_string(),
        record.customer_type.code().to_string(),
        record.quantity.to_string(),
        record.unit_price.to_string(),
        record.discount.to_string(),
        record.total_price.to_string(),
        if record.returned { "Yes" } else { "No" }.to_string(),
        record.payment_method.clone(),
        record.salesperson.clone(),
    ]
}

/// Download name: `sales-<value>-<timestamp_ms>.csv`
pub fn export_file_name(filter: Option<&DrillDownFilter>, timestamp_ms: i64) -> String {
    let value = filter
        .map(|f| f.value.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or("data");
    let safe: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("sales-{}-{}.csv", safe, timestamp_ms)
}
