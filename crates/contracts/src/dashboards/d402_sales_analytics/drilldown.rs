use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::SalesRecord;
use crate::enums::{CustomerType, Product, Region};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillDownError {
    #[error("Unknown drill-down dimension: {0}")]
    UnknownDimension(String),
}

/// Dimension a dashboard bucket can be drilled into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrillDownDimension {
    Month,
    Region,
    Product,
    CustomerType,
}

impl DrillDownDimension {
    pub fn code(&self) -> &'static str {
        match self {
            DrillDownDimension::Month => "month",
            DrillDownDimension::Region => "region",
            DrillDownDimension::Product => "product",
            DrillDownDimension::CustomerType => "customerType",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "month" => Some(DrillDownDimension::Month),
            "region" => Some(DrillDownDimension::Region),
            "product" => Some(DrillDownDimension::Product),
            "customerType" => Some(DrillDownDimension::CustomerType),
            _ => None,
        }
    }

    /// Prefix used in generated labels
    fn title(&self) -> &'static str {
        match self {
            DrillDownDimension::Month => "Month",
            DrillDownDimension::Region => "Region",
            DrillDownDimension::Product => "Product",
            DrillDownDimension::CustomerType => "Customer Type",
        }
    }

    /// Generated label, e.g. "Month: Feb 2023" or "Region: East"
    fn label(&self, value: &str) -> String {
        let shown = match self {
            DrillDownDimension::Month => month_title(value),
            _ => value.to_string(),
        };
        format!("{}: {}", self.title(), shown)
    }
}

/// "2023-02" as "Feb 2023"; unparseable values are shown unchanged
fn month_title(value: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map(|first_day| first_day.format("%b %Y").to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Selected dashboard bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillDownFilter {
    pub dimension: DrillDownDimension,
    /// Month as "YYYY-MM", otherwise the category code
    pub value: String,
    /// Display title of the detail view
    pub label: String,
}

impl DrillDownFilter {
    /// Filter for one calendar month
    pub fn for_month(year: i32, month: u32) -> Self {
        let value = format!("{:04}-{:02}", year, month);
        Self {
            dimension: DrillDownDimension::Month,
            label: DrillDownDimension::Month.label(&value),
            value,
        }
    }

    pub fn for_region(region: Region) -> Self {
        Self::for_code(DrillDownDimension::Region, region.code())
    }

    pub fn for_product(product: Product) -> Self {
        Self::for_code(DrillDownDimension::Product, product.code())
    }

    pub fn for_customer_type(customer_type: CustomerType) -> Self {
        Self::for_code(DrillDownDimension::CustomerType, customer_type.code())
    }

    fn for_code(dimension: DrillDownDimension, code: &str) -> Self {
        Self {
            dimension,
            value: code.to_string(),
            label: dimension.label(code),
        }
    }
}

/// Drill-down request as it arrives over the wire.
///
/// `dimension` stays a plain string here so that an unsupported value is
/// reported as [`DrillDownError::UnknownDimension`] instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillDownRequest {
    pub dimension: String,
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl TryFrom<DrillDownRequest> for DrillDownFilter {
    type Error = DrillDownError;

    fn try_from(request: DrillDownRequest) -> Result<Self, Self::Error> {
        let dimension = DrillDownDimension::from_code(&request.dimension)
            .ok_or_else(|| DrillDownError::UnknownDimension(request.dimension.clone()))?;
        let label = request
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| dimension.label(&request.value));
        Ok(Self {
            dimension,
            value: request.value,
            label,
        })
    }
}

/// Records behind a drill-down, ready for the detail table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownResult {
    /// `None` when the full dataset is returned
    pub filter: Option<DrillDownFilter>,
    pub total_count: usize,
    pub total_revenue: f64,
    pub records: Vec<SalesRecord>,
}
