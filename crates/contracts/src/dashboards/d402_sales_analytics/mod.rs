pub mod drilldown;
pub mod dto;
pub mod record;

pub use drilldown::*;
pub use dto::*;
pub use record::*;
