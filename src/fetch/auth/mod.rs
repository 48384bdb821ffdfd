//! Credential-injecting [`HttpClient`](crate::fetch::HttpClient) wrappers.

mod url_param;

pub use url_param::UrlParam;
