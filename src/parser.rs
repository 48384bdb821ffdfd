//! JSON parser for the data.gov.in mandi price resource.
//!
//! The upstream sends every field as a string. Prices are validated here:
//! a record whose min, max or modal price is not a finite number is dropped
//! with a warning instead of leaking NaN into downstream averages.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::PriceRecord;

/// Top-level response body.
///
/// Records are kept as raw JSON so one badly typed record cannot fail the page.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub records: Vec<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<Value>,
}

/// A record exactly as the upstream returns it.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub commodity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub variety: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub district: Option<String>,
    #[serde(default)]
    pub min_price: Option<RawNumber>,
    #[serde(default)]
    pub max_price: Option<RawNumber>,
    #[serde(default)]
    pub modal_price: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub arrival_date: Option<String>,
}

/// Prices normally arrive as strings, but plain JSON numbers are accepted too.
/// Anything else lands in `Other` and is rejected when the record is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

/// Reads a text field, stringifying scalars and treating containers as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A record that could not be normalized: a price that is not a finite
/// number, or a record that is not a JSON object at all.
#[derive(Debug, Error, PartialEq)]
#[error("field '{field}' is not valid: '{value}'")]
pub struct InvalidRecord {
    pub field: &'static str,
    pub value: String,
}

fn parse_price(field: &'static str, raw: Option<&RawNumber>) -> Result<f64, InvalidRecord> {
    let parsed = match raw {
        Some(RawNumber::Number(n)) => Some(*n),
        Some(RawNumber::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(RawNumber::Other(_)) | None => None,
    };

    parsed.filter(|v| v.is_finite()).ok_or_else(|| InvalidRecord {
        field,
        value: match raw {
            Some(RawNumber::Number(n)) => n.to_string(),
            Some(RawNumber::Text(s)) => s.clone(),
            Some(RawNumber::Other(v)) => v.to_string(),
            None => String::new(),
        },
    })
}

/// Parses an arrival date in the upstream `dd/mm/yyyy` form, falling back to ISO.
pub fn parse_arrival_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

impl TryFrom<Value> for PriceRecord {
    type Error = InvalidRecord;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = RawRecord::deserialize(value).map_err(|e| InvalidRecord {
            field: "record",
            value: e.to_string(),
        })?;
        PriceRecord::try_from(raw)
    }
}

impl TryFrom<RawRecord> for PriceRecord {
    type Error = InvalidRecord;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let min_price = parse_price("min_price", raw.min_price.as_ref())?;
        let max_price = parse_price("max_price", raw.max_price.as_ref())?;
        let modal_price = parse_price("modal_price", raw.modal_price.as_ref())?;

        let commodity = raw.commodity.unwrap_or_default();
        let variety = raw.variety.unwrap_or_default();
        let market = raw.market.unwrap_or_default();
        let arrival_raw = raw.arrival_date.unwrap_or_default();
        let arrival_date = parse_arrival_date(&arrival_raw);
        if arrival_date.is_none() && !arrival_raw.is_empty() {
            debug!(arrival_date = %arrival_raw, "Unparseable arrival date");
        }

        let id = raw
            .timestamp
            .and_then(|t| match t {
                Value::String(s) if !s.is_empty() => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("{market}/{commodity}/{variety}/{arrival_raw}"));

        Ok(PriceRecord {
            id,
            commodity,
            variety,
            market,
            state: raw.state.unwrap_or_default(),
            district: raw.district.unwrap_or_default(),
            min_price,
            max_price,
            modal_price,
            arrival_date,
        })
    }
}

/// Decodes a response body into normalized [`PriceRecord`]s, preserving
/// upstream order.
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] if the body is not JSON or has no
/// `records` array.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<PriceRecord>, FetchError> {
    let envelope: ApiEnvelope = serde_json::from_slice(bytes)?;

    if envelope.status.as_deref() == Some("error") {
        warn!(
            message = envelope.message.as_deref().unwrap_or(""),
            "Upstream reported an error status"
        );
    }

    let received = envelope.records.len();
    let records: Vec<PriceRecord> = envelope
        .records
        .into_iter()
        .filter_map(|raw| match PriceRecord::try_from(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Dropping invalid record");
                None
            }
        })
        .collect();

    debug!(
        received,
        kept = records.len(),
        total = ?envelope.total,
        "Records parsed"
    );

    Ok(records)
}
