use serde::{Deserialize, Serialize};

/// Filters sent with every search request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchParams {
    /// Home types to include (apartment, loft, house, ...)
    pub home_types: Vec<String>,
    /// Whether shared homes are wanted
    pub shared: bool,
    /// Upper bound on monthly cost, in `currency`
    pub max_monthly_cost: i64,
    pub currency: String,
    /// Area identifiers such as "no/oslo"
    pub area_identifiers: Vec<String>,
    pub rental_types: Vec<String>,
    pub markets: Vec<String>,
    /// Page size; only the first page is ever requested
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            home_types: vec!["apartment".to_string(), "loft".to_string()],
            shared: false,
            max_monthly_cost: 20_000,
            currency: "NOK".to_string(),
            area_identifiers: vec!["no/oslo".to_string()],
            rental_types: vec!["long_term".to_string()],
            markets: vec![
                "sweden".to_string(),
                "norway".to_string(),
                "finland".to_string(),
            ],
            limit: 60,
        }
    }
}
