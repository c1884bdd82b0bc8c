use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d402_sales_analytics::{
    CustomerSegmentMetrics, DashboardData, DrillDownFilter, PaymentMethodMetrics,
    ProductMetrics, RegionalMetrics, SalesRecord, SummaryMetrics, TimeSeriesDataPoint,
    NO_PAYMENT_METHOD,
};
use contracts::enums::{CustomerType, Product, Region};
use std::collections::HashMap;
use std::hash::Hash;

/// Build every metric family of the sales dashboard from the loaded records.
///
/// Pure and deterministic: the same records in the same order always give
/// bit-identical output.
pub fn calculate_dashboard_data(records: &[SalesRecord]) -> DashboardData {
    let summary = calculate_summary(records);
    let total_revenue = summary.total_revenue;

    DashboardData {
        time_series: calculate_time_series(records),
        regional: calculate_regional_metrics(records, total_revenue),
        products: calculate_product_metrics(records, total_revenue),
        customer_segments: calculate_customer_segments(records, total_revenue),
        payment_methods: calculate_payment_methods(records),
        summary,
    }
}

// ---------------------------------------------------------------------------
// Accumulators
// ---------------------------------------------------------------------------

/// Running totals of one group
#[derive(Debug, Default, Clone)]
struct Totals {
    revenue: f64,
    orders: usize,
    returned: usize,
    units: u64,
}

impl Totals {
    fn add(&mut self, record: &SalesRecord) {
        self.revenue += record.total_price;
        self.orders += 1;
        self.units += u64::from(record.quantity);
        if record.returned {
            self.returned += 1;
        }
    }

    fn avg_order_value(&self) -> Option<f64> {
        ratio(self.revenue, self.orders as f64)
    }

    fn return_rate(&self) -> Option<f64> {
        percent(self.returned as f64, self.orders as f64)
    }
}

/// Groups keyed by `K`, iterated in first-seen key order
struct Groups<K, A> {
    index: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K: Eq + Hash + Clone, A: Default> Groups<K, A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut A {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.entries.push((key.clone(), A::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    fn into_entries(self) -> Vec<(K, A)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone, A: Default> Default for Groups<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

fn percent(part: f64, whole: f64) -> Option<f64> {
    ratio(part, whole).map(|r| r * 100.0)
}

// ---------------------------------------------------------------------------
// Metric families
// ---------------------------------------------------------------------------

pub fn calculate_summary(records: &[SalesRecord]) -> SummaryMetrics {
    let mut totals = Totals::default();
    for record in records {
        totals.add(record);
    }

    SummaryMetrics {
        total_revenue: totals.revenue,
        total_orders: totals.orders,
        avg_order_value: totals.avg_order_value(),
        return_rate: totals.return_rate(),
    }
}

/// Monthly revenue. Only months that have records are emitted, ascending.
pub fn calculate_time_series(records: &[SalesRecord]) -> Vec<TimeSeriesDataPoint> {
    let mut months: Groups<(i32, u32), Totals> = Groups::new();
    for record in records {
        months
            .entry((record.date.year(), record.date.month()))
            .add(record);
    }

    let mut months = months.into_entries();
    months.sort_by_key(|(key, _)| *key);

    months
        .into_iter()
        .filter_map(|((year, month), totals)| {
            let date = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(TimeSeriesDataPoint {
                date,
                revenue: totals.revenue,
                orders: totals.orders,
                avg_order_value: totals.avg_order_value(),
                drilldown: DrillDownFilter::for_month(year, month),
            })
        })
        .collect()
}

pub fn calculate_regional_metrics(
    records: &[SalesRecord],
    total_revenue: f64,
) -> Vec<RegionalMetrics> {
    let mut regions: Groups<Region, Totals> = Groups::new();
    for record in records {
        regions.entry(record.region).add(record);
    }

    let mut rows: Vec<RegionalMetrics> = regions
        .into_entries()
        .into_iter()
        .map(|(region, totals)| RegionalMetrics {
            region: region.code().to_string(),
            revenue: totals.revenue,
            orders: totals.orders,
            avg_order_value: totals.avg_order_value(),
            return_rate: totals.return_rate(),
            revenue_share: percent(totals.revenue, total_revenue),
            drilldown: DrillDownFilter::for_region(region),
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

pub fn calculate_product_metrics(
    records: &[SalesRecord],
    total_revenue: f64,
) -> Vec<ProductMetrics> {
    let mut products: Groups<Product, Totals> = Groups::new();
    for record in records {
        products.entry(record.product).add(record);
    }

    let mut rows: Vec<ProductMetrics> = products
        .into_entries()
        .into_iter()
        .map(|(product, totals)| ProductMetrics {
            product: product.code().to_string(),
            revenue: totals.revenue,
            units_sold: totals.units,
            avg_price: ratio(totals.revenue, totals.units as f64),
            return_rate: totals.return_rate(),
            revenue_share: percent(totals.revenue, total_revenue),
            drilldown: DrillDownFilter::for_product(product),
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

#[derive(Default)]
struct SegmentTotals {
    totals: Totals,
    payments: Groups<String, usize>,
}

/// Most frequent payment method, earliest seen wins a tie
fn top_payment_method(payments: Groups<String, usize>) -> String {
    let mut payments = payments.into_entries();
    payments.sort_by(|a, b| b.1.cmp(&a.1));
    payments
        .into_iter()
        .next()
        .map(|(method, _)| method)
        .filter(|method| !method.is_empty())
        .unwrap_or_else(|| NO_PAYMENT_METHOD.to_string())
}

pub fn calculate_customer_segments(
    records: &[SalesRecord],
    total_revenue: f64,
) -> Vec<CustomerSegmentMetrics> {
    let mut segments: Groups<CustomerType, SegmentTotals> = Groups::new();
    for record in records {
        let segment = segments.entry(record.customer_type);
        segment.totals.add(record);
        *segment.payments.entry(record.payment_method.clone()) += 1;
    }

    let mut rows: Vec<CustomerSegmentMetrics> = segments
        .into_entries()
        .into_iter()
        .map(|(customer_type, SegmentTotals { totals, payments })| CustomerSegmentMetrics {
            segment: customer_type.code().to_string(),
            revenue: totals.revenue,
            orders: totals.orders,
            avg_order_value: totals.avg_order_value(),
            top_payment_method: top_payment_method(payments),
            revenue_share: percent(totals.revenue, total_revenue),
            drilldown: DrillDownFilter::for_customer_type(customer_type),
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

/// Payment method distribution; `percentage` is relative to all orders
pub fn calculate_payment_methods(records: &[SalesRecord]) -> Vec<PaymentMethodMetrics> {
    let total_orders = records.len() as f64;

    let mut methods: Groups<&str, Totals> = Groups::new();
    for record in records {
        methods.entry(record.payment_method.as_str()).add(record);
    }

    let mut rows: Vec<PaymentMethodMetrics> = methods
        .into_entries()
        .into_iter()
        .map(|(method, totals)| PaymentMethodMetrics {
            payment_method: method.to_string(),
            count: totals.orders,
            revenue: totals.revenue,
            percentage: percent(totals.orders as f64, total_orders),
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}
