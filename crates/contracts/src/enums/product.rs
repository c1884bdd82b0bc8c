use serde::{Deserialize, Serialize};
use std::fmt;

/// Product catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Laptop,
    Phone,
    Desk,
    Chair,
    Monitor,
    Printer,
    Tablet,
}

impl Product {
    pub fn code(&self) -> &'static str {
        match self {
            Product::Laptop => "Laptop",
            Product::Phone => "Phone",
            Product::Desk => "Desk",
            Product::Chair => "Chair",
            Product::Monitor => "Monitor",
            Product::Printer => "Printer",
            Product::Tablet => "Tablet",
        }
    }

    pub fn all() -> Vec<Product> {
        vec![
            Product::Laptop,
            Product::Phone,
            Product::Desk,
            Product::Chair,
            Product::Monitor,
            Product::Printer,
            Product::Tablet,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Laptop" => Some(Product::Laptop),
            "Phone" => Some(Product::Phone),
            "Desk" => Some(Product::Desk),
            "Chair" => Some(Product::Chair),
            "Monitor" => Some(Product::Monitor),
            "Printer" => Some(Product::Printer),
            "Tablet" => Some(Product::Tablet),
            _ => None,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
