//! Two-point modal price trend between the oldest and newest observation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::PriceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTrend {
    pub percent_change: f64,
    pub direction: Direction,
    pub first_modal_price: Option<f64>,
    pub last_modal_price: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl PriceTrend {
    /// Builds the trend from records already sorted oldest first.
    pub fn from_sorted(records: &[PriceRecord]) -> Self {
        let change = percent_change(records);
        PriceTrend {
            percent_change: change,
            direction: direction(change),
            first_modal_price: records.first().map(|r| r.modal_price),
            last_modal_price: records.last().map(|r| r.modal_price),
            first_date: records.first().and_then(|r| r.arrival_date),
            last_date: records.last().and_then(|r| r.arrival_date),
        }
    }

    /// Absolute change formatted to two decimals, e.g. `"50.00%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.percent_change.abs())
    }
}

/// `(last - first) / first * 100` over modal prices.
///
/// Returns 0.0 with fewer than two records or when the first modal price is 0.
pub fn percent_change(sorted: &[PriceRecord]) -> f64 {
    if sorted.len() < 2 {
        return 0.0;
    }
    let first = sorted[0].modal_price;
    let last = sorted[sorted.len() - 1].modal_price;
    if first == 0.0 {
        return 0.0;
    }
    (last - first) / first * 100.0
}

/// Non-negative change counts as up.
pub fn direction(percent_change: f64) -> Direction {
    if percent_change >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Returns the dated records sorted oldest first. Undated records are left out.
/// Records sharing a date keep their source order.
pub fn sort_chronologically(records: &[PriceRecord]) -> Vec<PriceRecord> {
    let mut dated: Vec<PriceRecord> = records
        .iter()
        .filter(|r| r.arrival_date.is_some())
        .cloned()
        .collect();
    dated.sort_by_key(|r| r.arrival_date);
    dated
}
