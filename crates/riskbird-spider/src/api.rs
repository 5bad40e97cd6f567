use crate::config::{Credentials, Settings};
use crate::error::SpiderError;
use crate::http::*;
use crate::invest::{self, InvestmentRecord};
use crate::{search, token};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, ORIGIN};
use tracing::{debug, trace};

/// A registry lookup is made up of the following calls, in order:
/// 1. search: free-text name → canonical name
/// 2. profile: canonical name → lookup token
/// 3. listing: lookup token → investment relationships
///
/// The pipeline only talks to the registry through this trait, so any stage can be stubbed.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn resolve(&self, company: &str) -> Result<String, SpiderError>;

    async fn fetch_token(&self, canonical_name: &str) -> Result<String, SpiderError>;

    /// Unfiltered; the pipeline applies the ratio threshold.
    async fn fetch_investments(&self, token: &str) -> Result<Vec<InvestmentRecord>, SpiderError>;
}

/// The live riskbird.com client.
#[derive(Clone, Debug)]
pub struct RiskbirdClient {
    http_client: HttpClient,
    base_url: String,
}

impl RiskbirdClient {
    pub fn new(settings: &Settings) -> Result<Self, SpiderError> {
        Ok(Self {
            http_client: build_client(settings)?,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Registry for RiskbirdClient {
    async fn resolve(&self, company: &str) -> Result<String, SpiderError> {
        search::resolve(&self.http_client, &self.base_url, company).await
    }

    async fn fetch_token(&self, canonical_name: &str) -> Result<String, SpiderError> {
        token::fetch_token(&self.http_client, &self.base_url, canonical_name).await
    }

    async fn fetch_investments(&self, token: &str) -> Result<Vec<InvestmentRecord>, SpiderError> {
        invest::fetch_investments(&self.http_client, &self.base_url, token).await
    }
}

fn build_client(settings: &Settings) -> Result<HttpClient, SpiderError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("App-Device", HeaderValue::from_static("WEB"));
    headers.insert(
        ORIGIN,
        HeaderValue::from_str(&settings.base_url)
            .map_err(|err| SpiderError::Config(format!("invalid base_url, error({err})")))?,
    );

    let mut builder = reqwest::ClientBuilder::new().timeout(settings.timeout);
    match &settings.credentials {
        Some(Credentials { user_agent, cookie }) => {
            trace!("attaching credentials to registry client");
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie).map_err(|err| {
                    debug!("riskbird_cookie is not a valid header value, error({err})");
                    SpiderError::Config(format!("invalid riskbird_cookie, error({err})"))
                })?,
            );
            builder = builder.user_agent(user_agent.as_str());
        }
        None => trace!("building registry client without credentials"),
    }

    builder
        .default_headers(headers)
        .build()
        .map_err(SpiderError::Http)
}
