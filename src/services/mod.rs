//! The data contract exposed to presentation code.

pub mod dashboard;
pub mod price_api;

pub use dashboard::load_dashboard;
pub use price_api::PriceApi;
