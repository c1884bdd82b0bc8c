use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::drilldown::DrillDownFilter;

// ---------------------------------------------------------------------------
// Dashboard metrics
//
// Ratio fields are `None` (JSON null) when their denominator is zero, so an
// empty dataset renders as "no data" instead of NaN.
// ---------------------------------------------------------------------------

/// Sentinel for a customer segment without any payment method data
pub const NO_PAYMENT_METHOD: &str = "N/A";

/// Headline KPIs over the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub avg_order_value: Option<f64>,
    /// Percentage of returned records, 0..=100
    pub return_rate: Option<f64>,
}

/// One observed calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesDataPoint {
    /// First day of the month
    pub date: NaiveDate,
    pub revenue: f64,
    pub orders: usize,
    pub avg_order_value: Option<f64>,
    pub drilldown: DrillDownFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalMetrics {
    pub region: String,
    pub revenue: f64,
    pub orders: usize,
    pub avg_order_value: Option<f64>,
    pub return_rate: Option<f64>,
    /// Share of total revenue, percent
    pub revenue_share: Option<f64>,
    pub drilldown: DrillDownFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetrics {
    pub product: String,
    pub revenue: f64,
    pub units_sold: u64,
    pub avg_price: Option<f64>,
    pub return_rate: Option<f64>,
    pub revenue_share: Option<f64>,
    pub drilldown: DrillDownFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegmentMetrics {
    /// "Retail" or "Wholesale"
    pub segment: String,
    pub revenue: f64,
    pub orders: usize,
    pub avg_order_value: Option<f64>,
    pub top_payment_method: String,
    pub revenue_share: Option<f64>,
    pub drilldown: DrillDownFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodMetrics {
    pub payment_method: String,
    pub count: usize,
    pub revenue: f64,
    /// Share of all orders (not of the group), percent
    pub percentage: Option<f64>,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub summary: SummaryMetrics,
    pub time_series: Vec<TimeSeriesDataPoint>,
    pub regional: Vec<RegionalMetrics>,
    pub products: Vec<ProductMetrics>,
    pub customer_segments: Vec<CustomerSegmentMetrics>,
    pub payment_methods: Vec<PaymentMethodMetrics>,
}
