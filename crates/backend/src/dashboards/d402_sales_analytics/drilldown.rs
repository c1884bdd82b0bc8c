use contracts::dashboards::d402_sales_analytics::{
    DrillDownDimension, DrillDownFilter, DrillDownResult, SalesRecord,
};

/// Does the record belong to the selected dashboard bucket
pub fn matches_filter(record: &SalesRecord, filter: &DrillDownFilter) -> bool {
    match filter.dimension {
        DrillDownDimension::Month => record.month_key() == filter.value,
        DrillDownDimension::Region => record.region.code() == filter.value,
        DrillDownDimension::Product => record.product.code() == filter.value,
        DrillDownDimension::CustomerType => record.customer_type.code() == filter.value,
    }
}

/// Records of one bucket, in their original order
pub fn filter_sales_data(records: &[SalesRecord], filter: &DrillDownFilter) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|record| matches_filter(record, filter))
        .cloned()
        .collect()
}

/// Detail view for a bucket, or for the whole dataset when `filter` is `None`
pub fn build_drilldown_result(
    records: &[SalesRecord],
    filter: Option<DrillDownFilter>,
) -> DrillDownResult {
    let records = match &filter {
        Some(filter) => filter_sales_data(records, filter),
        None => records.to_vec(),
    };

    DrillDownResult {
        total_count: records.len(),
        total_revenue: records.iter().map(|r| r.total_price).sum(),
        filter,
        records,
    }
}
