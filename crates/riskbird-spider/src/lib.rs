pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod invest;
pub mod pipeline;
pub mod search;
pub mod token;
pub mod tui;

pub use crate::api::{Registry, RiskbirdClient};
pub use crate::config::Credentials;
pub use crate::error::SpiderError;
pub use crate::invest::{CompanyResult, InvestmentRecord};

/// Shortcut for required API elements.
pub mod http {
    pub use reqwest::Client as HttpClient;

    /// Registry host; every endpoint path is joined onto it.
    pub const BASE_URL: &str = "https://www.riskbird.com";

    /// The `code` the JSON endpoints return on success.
    pub const SUCCESS_CODE: i64 = 20000;
}

/// Format the time passed since `time`, for trailing log output.
pub fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
