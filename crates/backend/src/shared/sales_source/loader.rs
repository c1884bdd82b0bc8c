use calamine::{open_workbook_auto, Data, Reader};
use contracts::dashboards::d402_sales_analytics::SalesRecord;
use std::path::{Path, PathBuf};

use super::row::{parse_record, RawCell, RawRow, RowRejection};
use super::SalesSourceError;
use crate::shared::config::{get_data_dir, SalesDataConfig};

/// Result of reading the sales file
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub path: PathBuf,
    pub records: Vec<SalesRecord>,
    /// Rows dropped by validation
    pub skipped: usize,
}

/// Data rows with their 1-based sheet row number
struct SheetRows {
    rows: Vec<(usize, RawRow)>,
    malformed: usize,
}

/// Locate the sales file, copying it from the project directory into the
/// data directory when only the project copy exists.
pub fn resolve_data_file(config: &SalesDataConfig) -> Result<PathBuf, SalesSourceError> {
    let data_dir = get_data_dir(config).map_err(|e| SalesSourceError::Config(e.to_string()))?;
    let project_dir = std::env::current_dir()?;
    resolve_data_file_in(&data_dir, &project_dir, &config.file_name)
}

pub fn resolve_data_file_in(
    data_dir: &Path,
    project_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, SalesSourceError> {
    let data_file = data_dir.join(file_name);
    if data_file.exists() {
        return Ok(data_file);
    }

    let project_file = project_dir.join(file_name);
    if project_file.exists() {
        std::fs::create_dir_all(data_dir)?;
        std::fs::copy(&project_file, &data_file)?;
        tracing::info!(
            "Copied sales data file {} to {}",
            project_file.display(),
            data_file.display()
        );
        return Ok(data_file);
    }

    Err(SalesSourceError::NotFound {
        file_name: file_name.to_string(),
        data_dir: data_dir.to_path_buf(),
        project_dir: project_dir.to_path_buf(),
    })
}

/// Read and validate every row of the sales file.
///
/// Invalid rows are logged and skipped; only file-level problems fail.
pub fn load_sales_records(path: &Path) -> Result<LoadReport, SalesSourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let sheet = match extension.as_deref() {
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => read_workbook_rows(path)?,
        Some("csv") => read_csv_rows(path)?,
        _ => return Err(SalesSourceError::UnsupportedFormat(path.to_path_buf())),
    };

    let (records, rejected) = parse_rows(sheet.rows);
    let skipped = rejected + sheet.malformed;

    tracing::info!(
        "Loaded {} sales records from {} ({} rows skipped)",
        records.len(),
        path.display(),
        skipped
    );

    Ok(LoadReport {
        path: path.to_path_buf(),
        records,
        skipped,
    })
}

/// Validate rows, returning the records and the number of rejected rows
pub fn parse_rows(rows: Vec<(usize, RawRow)>) -> (Vec<SalesRecord>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0;

    for (row_number, row) in rows {
        if row.values().all(|c| *c == RawCell::Empty) {
            continue;
        }
        match parse_record(&row) {
            Ok(record) => records.push(record),
            Err(RowRejection::MissingRequired) => {
                tracing::warn!("Row {}: Missing required fields, skipping", row_number);
                rejected += 1;
            }
            Err(e) => {
                tracing::warn!("Row {}: {}, skipping", row_number, e);
                rejected += 1;
            }
        }
    }

    (records, rejected)
}

fn read_workbook_rows(path: &Path) -> Result<SheetRows, SalesSourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SalesSourceError::EmptyWorkbook(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    // rows() starts at the first used cell, which may sit below row 1
    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => {
            return Ok(SheetRows {
                rows: Vec::new(),
                malformed: 0,
            })
        }
    };

    let rows = lines
        .enumerate()
        .map(|(index, line)| {
            let row: RawRow = headers
                .iter()
                .zip(line.iter())
                .map(|(header, value)| (header.clone(), workbook_cell(value)))
                .collect();
            (header_row + index + 1, row)
        })
        .collect();

    Ok(SheetRows { rows, malformed: 0 })
}

fn workbook_cell(value: &Data) -> RawCell {
    match value {
        Data::Empty => RawCell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => RawCell::DateTime(dt),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::Error(_) => RawCell::Empty,
    }
}

fn read_csv_rows(path: &Path) -> Result<SheetRows, SalesSourceError> {
    let contents = std::fs::read_to_string(path)?;
    // Strip UTF-8 BOM if present
    let text = contents.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut malformed = 0;

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Row {}: malformed CSV record ({}), skipping", index + 2, e);
                malformed += 1;
                continue;
            }
        };

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| {
                let cell = if value.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(value.to_string())
                };
                (header.clone(), cell)
            })
            .collect();
        rows.push((index + 2, row));
    }

    Ok(SheetRows { rows, malformed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{CustomerType, Region};

    const HEADER: &str = "Date,OrderDate,DeliveryDate,Region,Product,Quantity,UnitPrice,TotalPrice,Discount,ShippingCost,StoreLocation,CustomerType,Salesperson,CustomerName,RegionManager,PaymentMethod,Promotion,Returned,OrderID";

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("\u{FEFF}{}\n{}", HEADER, body)).unwrap();
        path
    }

    #[test]
    fn test_load_csv_skips_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            "2023-02-01,2023-01-30,2023-02-03,East,Laptop,2,500,1000,0,15,Boston,Retail,Alice,ACME,Bob,Credit Card,None,false,ORD-1\n\
             2023-02-10,2023-02-09,2023-02-12,East,Phone,1,500,500,0,5,Boston,Wholesale,Alice,Initech,Bob,Cash,Spring,true,ORD-2\n\
             2023-02-11,2023-02-09,2023-02-12,East,Phone,1,500,,0,5,Boston,Retail,Alice,Initech,Bob,Cash,Spring,true,ORD-3\n\
             2023-02-12,2023-02-09,2023-02-12,East,Phone,1,500,500,0,5,Boston,Retail,Alice,Initech,Bob,Cash,Spring,true,\n\
             2023-02-13,2023-02-09,2023-02-12,Mars,Phone,1,500,500,0,5,Boston,Retail,Alice,Initech,Bob,Cash,Spring,true,ORD-5\n\
             ,,,,,,,,,,,,,,,,,,\n\
             2023-03-15,2023-03-14,2023-03-18,West,Laptop,1,300,300,0,8,Denver,Retail,Carol,Globex,Dan,Credit Card,None,false,ORD-6\n",
        );

        let report = load_sales_records(&path).unwrap();
        let ids: Vec<&str> = report.records.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-2", "ORD-6"]);
        assert_eq!(report.skipped, 3);

        let second = &report.records[1];
        assert!(second.returned);
        assert_eq!(second.customer_type, CustomerType::Wholesale);
        assert_eq!(second.region, Region::East);
        assert_eq!(second.order_date.to_string(), "2023-02-09 00:00:00");
    }

    fn write_xlsx(path: &Path) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        let header = [
            "Date", "Region", "Product", "Quantity", "TotalPrice", "CustomerType",
            "PaymentMethod", "Returned", "OrderID",
        ];
        // Header on row 3, leaving two blank rows above it
        for (col, name) in header.iter().enumerate() {
            sheet.get_cell_mut((col as u32 + 1, 3u32)).set_value(*name);
        }

        // 44971 = 2023-02-14, stored as a native date cell
        sheet.get_cell_mut((1u32, 4u32)).set_value_number(44971);
        sheet
            .get_style_mut((1u32, 4u32))
            .get_number_format_mut()
            .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_YYYYMMDD);
        sheet.get_cell_mut((2u32, 4u32)).set_value("East");
        sheet.get_cell_mut((3u32, 4u32)).set_value("Laptop");
        sheet.get_cell_mut((4u32, 4u32)).set_value_number(2);
        sheet.get_cell_mut((5u32, 4u32)).set_value_number(1999.5);
        sheet.get_cell_mut((6u32, 4u32)).set_value("Retail");
        sheet.get_cell_mut((7u32, 4u32)).set_value("Cash");
        sheet.get_cell_mut((8u32, 4u32)).set_value_bool(true);
        sheet.get_cell_mut((9u32, 4u32)).set_value("ORD-1");

        // Unknown region
        sheet.get_cell_mut((1u32, 5u32)).set_value("2023-03-01");
        sheet.get_cell_mut((2u32, 5u32)).set_value("Mars");
        sheet.get_cell_mut((3u32, 5u32)).set_value("Desk");
        sheet.get_cell_mut((5u32, 5u32)).set_value_number(100);
        sheet.get_cell_mut((6u32, 5u32)).set_value("Retail");
        sheet.get_cell_mut((9u32, 5u32)).set_value("ORD-2");

        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn test_workbook_rows_keep_sheet_row_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.xlsx");
        write_xlsx(&path);

        let sheet = read_workbook_rows(&path).unwrap();
        let numbers: Vec<usize> = sheet.rows.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![4, 5]);
        assert_eq!(
            sheet.rows[0].1.get("Region"),
            Some(&RawCell::Text("East".into()))
        );
        assert_eq!(sheet.rows[0].1.get("Returned"), Some(&RawCell::Bool(true)));
    }

    #[test]
    fn test_load_xlsx_skips_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product-sales.xlsx");
        write_xlsx(&path);

        let report = load_sales_records(&path).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped, 1);

        let record = &report.records[0];
        assert_eq!(record.order_id, "ORD-1");
        assert_eq!(record.date.to_string(), "2023-02-14 00:00:00");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.total_price, 1999.5);
        assert!(record.returned);
    }

    #[test]
    fn test_workbook_cell_mapping() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        assert_eq!(workbook_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(workbook_cell(&Data::Float(12.5)), RawCell::Number(12.5));
        assert_eq!(workbook_cell(&Data::Int(7)), RawCell::Number(7.0));
        assert_eq!(workbook_cell(&Data::Bool(false)), RawCell::Bool(false));
        assert_eq!(
            workbook_cell(&Data::String("East".into())),
            RawCell::Text("East".into())
        );
        assert_eq!(
            workbook_cell(&Data::DateTimeIso("2023-02-14T08:00:00".into())),
            RawCell::Text("2023-02-14T08:00:00".into())
        );
        assert_eq!(
            workbook_cell(&Data::Error(calamine::CellErrorType::Div0)),
            RawCell::Empty
        );

        let serial = ExcelDateTime::new(44971.5, ExcelDateTimeType::DateTime, false);
        let cell = workbook_cell(&Data::DateTime(serial));
        assert_eq!(
            cell.as_datetime().map(|dt| dt.to_string()),
            Some("2023-02-14 12:00:00".to_string())
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            load_sales_records(&path),
            Err(SalesSourceError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_data_dir() {
        let data = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_csv(data.path(), "sales.csv", "");
        write_csv(project.path(), "sales.csv", "");

        let resolved = resolve_data_file_in(data.path(), project.path(), "sales.csv").unwrap();
        assert_eq!(resolved, data.path().join("sales.csv"));
    }

    #[test]
    fn test_resolve_copies_from_project_dir() {
        let data = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let target = data.path().join("nested");
        write_csv(project.path(), "sales.csv", "");

        let resolved = resolve_data_file_in(&target, project.path(), "sales.csv").unwrap();
        assert_eq!(resolved, target.join("sales.csv"));
        assert!(resolved.exists());
    }

    #[test]
    fn test_resolve_missing_file() {
        let data = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_data_file_in(data.path(), project.path(), "product-sales.xlsx"),
            Err(SalesSourceError::NotFound { .. })
        ));
    }
}
