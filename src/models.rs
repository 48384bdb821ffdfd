//! Normalized record shape shared by the fetch and aggregation layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One market observation for a commodity on a given arrival date.
///
/// Prices are in rupees per quintal as reported upstream and are always
/// finite: records with unparseable prices are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: String,
    pub commodity: String,
    pub variety: String,
    pub market: String,
    pub state: String,
    pub district: String,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    pub arrival_date: Option<NaiveDate>,
}

impl PriceRecord {
    /// Case-insensitive substring match of `needle` against the market name.
    pub fn market_matches(&self, needle: &str) -> bool {
        self.market.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
pub(crate) fn record(commodity: &str, market: &str, modal: f64) -> PriceRecord {
    PriceRecord {
        id: format!("{market}/{commodity}"),
        commodity: commodity.to_string(),
        variety: "Other".to_string(),
        market: market.to_string(),
        state: "Gujarat".to_string(),
        district: "Amreli".to_string(),
        min_price: modal - 100.0,
        max_price: modal + 100.0,
        modal_price: modal,
        arrival_date: None,
    }
}
