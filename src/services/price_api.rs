//! Trait for the price data source seen by the UI.

use async_trait::async_trait;

use crate::catalog;
use crate::error::FetchError;
use crate::models::PriceRecord;
use crate::query::SearchCriteria;
use crate::stats::CropSummary;

/// Abstraction over a commodity price provider (e.g., data.gov.in).
///
/// `list_prices` is the only required method; enumeration and aggregation are
/// derived from it. An empty `Ok` means the provider had no matching records.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Returns up to one page of records matching `criteria`, in provider order.
    async fn list_prices(&self, criteria: &SearchCriteria) -> Result<Vec<PriceRecord>, FetchError>;

    /// Distinct commodity names from the default page, sorted ascending.
    async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
        let records = self.list_prices(&SearchCriteria::default()).await?;
        Ok(catalog::categories(&records))
    }

    /// Distinct market names from the default page, sorted ascending.
    async fn list_markets(&self) -> Result<Vec<String>, FetchError> {
        let records = self.list_prices(&SearchCriteria::default()).await?;
        Ok(catalog::markets(&records))
    }

    /// Fetches `crop` (optionally narrowed to `city`) and aggregates it.
    async fn crop_summary(&self, crop: &str, city: Option<&str>) -> Result<CropSummary, FetchError> {
        let criteria = SearchCriteria::new(Some(crop.to_string()), city.map(str::to_string));
        let records = self.list_prices(&criteria).await?;
        Ok(CropSummary::from_records(crop, records))
    }
}
