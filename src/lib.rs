//! Client for the data.gov.in mandi (market) commodity price API.
//!
//! Builds filtered queries, normalizes the returned records and aggregates
//! per-crop statistics for presentation code. The [`PriceApi`] trait is the
//! boundary the UI talks to; [`DataGovClient`] is the live implementation.

pub mod cancel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod models;
pub mod output;
pub mod parser;
pub mod query;
pub mod services;
pub mod stats;
pub mod trend;

pub use cancel::{CancelScope, CancelToken};
pub use config::ApiConfig;
pub use error::{FetchError, FetchOutcome};
pub use infra::datagov::DataGovClient;
pub use models::PriceRecord;
pub use query::SearchCriteria;
pub use services::PriceApi;
pub use stats::CropSummary;
pub use trend::PriceTrend;
