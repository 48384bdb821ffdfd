//! Loads the crop cards shown on the dashboard.

use std::sync::Arc;

use tracing::{Instrument, error, info, warn};

use crate::cancel::CancelToken;
use crate::catalog::leading_commodities;
use crate::error::FetchError;
use crate::query::SearchCriteria;
use crate::services::price_api::PriceApi;
use crate::stats::CropSummary;

/// Number of crop cards shown when no crop is searched for.
pub const DEFAULT_CARD_COUNT: usize = 6;

/// Resolves `criteria` into crop summaries:
///
/// - a crop: one summary for that crop, narrowed to the city if given;
/// - only a city: the first `top` commodities traded in matching markets;
/// - neither: the first `top` commodities of the default page.
///
/// Per-crop summaries are fetched concurrently and returned in commodity
/// order. A crop whose fetch fails is logged and left out; if every crop
/// fails the first error is returned. Cancelling `token` abandons all
/// outstanding fetches.
#[tracing::instrument(skip(api, criteria, token), fields(crop = ?criteria.crop_filter(), city = ?criteria.city_filter()))]
pub async fn load_dashboard<A>(
    api: Arc<A>,
    criteria: &SearchCriteria,
    top: usize,
    token: &CancelToken,
) -> Result<Vec<CropSummary>, FetchError>
where
    A: PriceApi + 'static,
{
    let city = criteria.city_filter().map(str::to_string);

    if let Some(crop) = criteria.crop_filter() {
        let summary = token.run(api.crop_summary(crop, city.as_deref())).await?;
        return Ok(if summary.is_empty() { vec![] } else { vec![summary] });
    }

    let page = if criteria.is_unfiltered() {
        info!("Loading default page");
        SearchCriteria::default()
    } else {
        SearchCriteria::new(None, city.clone())
    };
    let records = token.run(api.list_prices(&page)).await?;
    let crops = leading_commodities(&records, top);
    if crops.is_empty() {
        info!("No commodities to summarize");
        return Ok(vec![]);
    }

    info!(crops = crops.len(), "Fetching crop summaries");

    let mut tasks = vec![];
    for crop in crops {
        let api = api.clone();
        let city = city.clone();
        let token = token.clone();
        let span = tracing::info_span!("crop_summary", crop = %crop);

        let task = tokio::spawn(
            async move {
                let result = token.run(api.crop_summary(&crop, city.as_deref())).await;
                (crop, result)
            }
            .instrument(span),
        );
        tasks.push(task);
    }

    let mut summaries = Vec::new();
    let mut first_error = None;
    for task in tasks {
        match task.await {
            Ok((_, Ok(summary))) => summaries.push(summary),
            Ok((_, Err(FetchError::Cancelled))) => return Err(FetchError::Cancelled),
            Ok((crop, Err(e))) => {
                warn!(crop = %crop, error = %e, "Crop summary failed, skipping");
                first_error.get_or_insert(e);
            }
            Err(e) => error!(error = %e, "Crop summary task panicked"),
        }
    }

    match first_error {
        Some(e) if summaries.is_empty() => Err(e),
        _ => Ok(summaries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelScope;
    use crate::models::{PriceRecord, record};
    use crate::query::filter_by_city;
    use async_trait::async_trait;

    struct StaticApi {
        records: Vec<PriceRecord>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl PriceApi for StaticApi {
        async fn list_prices(
            &self,
            criteria: &SearchCriteria,
        ) -> Result<Vec<PriceRecord>, FetchError> {
            if let Some(crop) = criteria.crop_filter() {
                if self.failing.iter().any(|f| *f == crop) {
                    return Err(FetchError::Status {
                        status: 500,
                        body: String::new(),
                    });
                }
            }
            let records = self
                .records
                .iter()
                .filter(|r| criteria.crop_filter().is_none_or(|c| r.commodity == c))
                .cloned()
                .collect();
            Ok(filter_by_city(records, criteria.city_filter()))
        }
    }

    fn api(failing: Vec<&'static str>) -> Arc<StaticApi> {
        Arc::new(StaticApi {
            records: vec![
                record("Wheat", "Rajkot", 2000.0),
                record("Cotton", "Amreli", 6500.0),
                record("Wheat", "Khanna", 2200.0),
                record("Onion", "Rajkot", 1200.0),
                record("Bajra", "Surat", 2400.0),
            ],
            failing,
        })
    }

    fn names(summaries: &[CropSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_page_top_crops_in_order() {
        let token = CancelToken::never();
        let summaries = load_dashboard(api(vec![]), &SearchCriteria::default(), 3, &token)
            .await
            .unwrap();

        assert_eq!(names(&summaries), vec!["Wheat", "Cotton", "Onion"]);
        assert_eq!(summaries[0].avg_modal_price, 2100.0);
        assert_eq!(summaries[0].markets, vec!["Rajkot", "Khanna"]);
    }

    #[tokio::test]
    async fn test_city_only_narrows_each_summary() {
        let token = CancelToken::never();
        let criteria = SearchCriteria::new(None, Some("rajkot".into()));
        let summaries = load_dashboard(api(vec![]), &criteria, DEFAULT_CARD_COUNT, &token)
            .await
            .unwrap();

        assert_eq!(names(&summaries), vec!["Wheat", "Onion"]);
        assert_eq!(summaries[0].markets, vec!["Rajkot"]);
        assert_eq!(summaries[0].avg_modal_price, 2000.0);
    }

    #[tokio::test]
    async fn test_crop_search_returns_single_card() {
        let token = CancelToken::never();
        let criteria = SearchCriteria::crop("Wheat").with_city("KHANNA");
        let summaries = load_dashboard(api(vec![]), &criteria, DEFAULT_CARD_COUNT, &token)
            .await
            .unwrap();

        assert_eq!(names(&summaries), vec!["Wheat"]);
        assert_eq!(summaries[0].markets, vec!["Khanna"]);
        assert_eq!(summaries[0].avg_modal_price, 2200.0);
    }

    #[tokio::test]
    async fn test_blank_filters_load_default_page() {
        let token = CancelToken::never();
        let criteria = SearchCriteria::new(Some(" ".into()), Some(String::new()));
        let summaries = load_dashboard(api(vec![]), &criteria, 2, &token)
            .await
            .unwrap();
        assert_eq!(names(&summaries), vec!["Wheat", "Cotton"]);
    }

    #[tokio::test]
    async fn test_crop_search_without_matches_is_empty() {
        let token = CancelToken::never();
        let criteria = SearchCriteria::crop("Maize");
        let summaries = load_dashboard(api(vec![]), &criteria, DEFAULT_CARD_COUNT, &token)
            .await
            .unwrap();
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_failed_crop_is_skipped() {
        let token = CancelToken::never();
        let summaries = load_dashboard(api(vec!["Cotton"]), &SearchCriteria::default(), 3, &token)
            .await
            .unwrap();
        assert_eq!(names(&summaries), vec!["Wheat", "Onion"]);
    }

    #[tokio::test]
    async fn test_all_crops_failing_returns_error() {
        let token = CancelToken::never();
        let result = load_dashboard(api(vec!["Wheat"]), &SearchCriteria::default(), 1, &token).await;
        assert!(result.unwrap_err().is_status());
    }

    #[tokio::test]
    async fn test_cancelled_scope_returns_cancelled() {
        let scope = CancelScope::new();
        let token = scope.token();
        scope.cancel();

        let result = load_dashboard(api(vec![]), &SearchCriteria::default(), 3, &token).await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
