//! Search criteria and request URL construction.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::models::PriceRecord;

/// Records requested per call. The upstream is never paged past this.
pub const PAGE_LIMIT: u32 = 100;

/// Optional crop and city filters entered by the user.
///
/// Blank strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub crop: Option<String>,
    pub city: Option<String>,
}

impl SearchCriteria {
    pub fn new(crop: Option<String>, city: Option<String>) -> Self {
        Self { crop, city }
    }

    pub fn crop(crop: impl Into<String>) -> Self {
        Self {
            crop: Some(crop.into()),
            city: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn crop_filter(&self) -> Option<&str> {
        non_blank(self.crop.as_deref())
    }

    pub fn city_filter(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    /// True when neither filter is set: the caller gets the default page.
    pub fn is_unfiltered(&self) -> bool {
        self.crop_filter().is_none() && self.city_filter().is_none()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Builds the request URL for `criteria` against `base_url`.
///
/// The crop goes to the upstream verbatim as an exact-match commodity filter.
/// The city is not sent: the upstream cannot filter on it, see
/// [`filter_by_city`]. The API key is added later by the auth wrapper.
pub fn build_url(base_url: &str, criteria: &SearchCriteria) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("format", "json")
            .append_pair("limit", &PAGE_LIMIT.to_string());
        if let Some(crop) = criteria.crop_filter() {
            pairs.append_pair("filters[commodity]", crop);
        }
    }
    Ok(url)
}

/// Keeps only records whose market contains `city`, case-insensitively.
/// Source order is preserved. `None` or a blank city keeps everything.
pub fn filter_by_city(records: Vec<PriceRecord>, city: Option<&str>) -> Vec<PriceRecord> {
    match non_blank(city) {
        Some(city) => records
            .into_iter()
            .filter(|r| r.market_matches(city))
            .collect(),
        None => records,
    }
}
