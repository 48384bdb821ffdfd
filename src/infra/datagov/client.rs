use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::models::PriceRecord;
use crate::parser::parse_records;
use crate::query::{SearchCriteria, build_url, filter_by_city};
use crate::services::price_api::PriceApi;

/// [`PriceApi`] backed by the data.gov.in mandi price resource.
pub struct DataGovClient<C> {
    http: C,
    base_url: String,
}

impl DataGovClient<UrlParam<BasicClient>> {
    /// Builds a client with the configured timeouts and the API key attached
    /// as the `api-key` query parameter.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let basic = BasicClient::with_timeouts(config.timeout(), config.connect_timeout())?;
        let http = UrlParam::data_gov(basic, config.api_key.clone());
        Ok(Self::new(http, config.base_url.clone()))
    }
}

impl<C: HttpClient> DataGovClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, criteria: &SearchCriteria) -> Result<Vec<PriceRecord>, FetchError> {
        let url = build_url(&self.base_url, criteria)?;
        let bytes = fetch_bytes(&self.http, url).await?;
        parse_records(&bytes)
    }
}

#[async_trait]
impl<C: HttpClient> PriceApi for DataGovClient<C> {
    #[tracing::instrument(
        skip(self, criteria),
        fields(crop = ?criteria.crop_filter(), city = ?criteria.city_filter())
    )]
    async fn list_prices(&self, criteria: &SearchCriteria) -> Result<Vec<PriceRecord>, FetchError> {
        match self.fetch_page(criteria).await {
            Ok(records) => {
                let received = records.len();
                let records = filter_by_city(records, criteria.city_filter());
                info!(received, kept = records.len(), "Prices fetched");
                Ok(records)
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Price fetch failed");
                Err(e)
            }
        }
    }
}
