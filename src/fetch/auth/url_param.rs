use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// Query parameter name data.gov.in expects the API key under.
pub const DATA_GOV_KEY_PARAM: &str = "api-key";

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// The key is added at send time, so URLs built elsewhere (and logged) never
/// carry the credential.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    /// Wraps `inner` so every request carries `api-key=<key>`.
    pub fn data_gov(inner: C, key: String) -> Self {
        Self {
            inner,
            param_name: DATA_GOV_KEY_PARAM.to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}
