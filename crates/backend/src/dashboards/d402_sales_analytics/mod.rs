pub mod aggregator;
pub mod drilldown;
pub mod export;

#[cfg(test)]
pub(crate) mod test_support;
