pub mod customer_type;
pub mod product;
pub mod region;

pub use customer_type::CustomerType;
pub use product::Product;
pub use region::Region;
