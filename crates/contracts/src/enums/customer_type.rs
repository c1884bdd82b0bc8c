use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    Retail,
    Wholesale,
}

impl CustomerType {
    pub fn code(&self) -> &'static str {
        match self {
            CustomerType::Retail => "Retail",
            CustomerType::Wholesale => "Wholesale",
        }
    }

    pub fn all() -> Vec<CustomerType> {
        vec![CustomerType::Retail, CustomerType::Wholesale]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Retail" => Some(CustomerType::Retail),
            "Wholesale" => Some(CustomerType::Wholesale),
            _ => None,
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
