use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::PriceRecord;

/// Per-crop aggregate over whatever records matched a query.
///
/// Always rebuilt from scratch; an empty input yields zeroed means and empty
/// lists rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CropSummary {
    pub name: String,
    pub avg_min_price: f64,
    pub avg_max_price: f64,
    pub avg_modal_price: f64,
    pub markets: Vec<String>,
    pub price_data: Vec<PriceRecord>,
}

impl CropSummary {
    pub fn from_records(name: &str, records: Vec<PriceRecord>) -> Self {
        let mins: Vec<f64> = records.iter().map(|r| r.min_price).collect();
        let maxes: Vec<f64> = records.iter().map(|r| r.max_price).collect();
        let modals: Vec<f64> = records.iter().map(|r| r.modal_price).collect();

        CropSummary {
            name: name.to_string(),
            avg_min_price: mean(&mins),
            avg_max_price: mean(&maxes),
            avg_modal_price: mean(&modals),
            markets: distinct_markets(&records),
            price_data: records,
        }
    }

    /// The "no data" sentinel for `name`.
    pub fn empty(name: &str) -> Self {
        CropSummary {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_data.is_empty()
    }

    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// Flattens the summary into a CSV-friendly row.
    pub fn to_row(&self) -> SummaryRow {
        SummaryRow {
            generated_at: Utc::now(),
            crop: self.name.clone(),
            avg_min_price: self.avg_min_price,
            avg_max_price: self.avg_max_price,
            avg_modal_price: self.avg_modal_price,
            market_count: self.market_count(),
            record_count: self.price_data.len(),
        }
    }
}

/// One line of the summary CSV written by [`crate::output::append_record`].
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub generated_at: DateTime<Utc>,
    pub crop: String,
    pub avg_min_price: f64,
    pub avg_max_price: f64,
    pub avg_modal_price: f64,
    pub market_count: usize,
    pub record_count: usize,
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Distinct market names in order of first occurrence.
pub fn distinct_markets(records: &[PriceRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.market.as_str()))
        .map(|r| r.market.clone())
        .collect()
}
