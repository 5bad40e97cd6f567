#![allow(dead_code)]

use async_trait::async_trait;
use riskbird_spider::config::{Credentials, Settings};
use riskbird_spider::{InvestmentRecord, Registry, SpiderError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn record(name: &str, ratio: &str) -> InvestmentRecord {
    InvestmentRecord {
        ent_name: name.to_string(),
        funder_ratio: ratio.to_string(),
    }
}

// stub registry
// ----------------------------------------------------------------------------

/// In-memory registry; a missing key makes that stage fail.
#[derive(Default)]
pub struct StubRegistry {
    pub names: HashMap<String, String>,
    pub tokens: HashMap<String, String>,
    pub listings: HashMap<String, Vec<InvestmentRecord>>,
    pub calls: Mutex<Vec<String>>,
}

impl StubRegistry {
    pub fn with_company(
        mut self,
        query: &str,
        canonical: &str,
        token: &str,
        listing: Vec<InvestmentRecord>,
    ) -> Self {
        self.names.insert(query.to_string(), canonical.to_string());
        self.tokens.insert(canonical.to_string(), token.to_string());
        self.listings.insert(token.to_string(), listing);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Registry for StubRegistry {
    async fn resolve(&self, company: &str) -> Result<String, SpiderError> {
        self.record_call(format!("resolve:{company}"));
        self.names
            .get(company)
            .cloned()
            .ok_or_else(|| SpiderError::Resolution {
                company: company.to_string(),
                reason: "no stubbed match".to_string(),
            })
    }

    async fn fetch_token(&self, canonical_name: &str) -> Result<String, SpiderError> {
        self.record_call(format!("token:{canonical_name}"));
        self.tokens
            .get(canonical_name)
            .cloned()
            .ok_or_else(|| SpiderError::Token {
                company: canonical_name.to_string(),
                reason: "no stubbed token".to_string(),
            })
    }

    async fn fetch_investments(&self, token: &str) -> Result<Vec<InvestmentRecord>, SpiderError> {
        self.record_call(format!("list:{token}"));
        self.listings
            .get(token)
            .cloned()
            .ok_or_else(|| SpiderError::Listing {
                token: token.to_string(),
                reason: "no stubbed listing".to_string(),
            })
    }
}

// mock riskbird.com
// ----------------------------------------------------------------------------

pub const USER_AGENT: &str = "riskbird-test-agent";
pub const COOKIE: &str = "SESSION=abc123";

pub fn settings_for(server: &MockServer) -> Settings {
    Settings {
        credentials: Some(Credentials {
            user_agent: USER_AGENT.to_string(),
            cookie: COOKIE.to_string(),
        }),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    }
}

/// Mounts the search endpoint, answering any query with `canonical` as the top hit.
pub async fn mount_search(server: &MockServer, canonical: &str) {
    Mock::given(method("POST"))
        .and(path("/riskbird-api/newSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 20000,
            "msg": "success",
            "data": { "list": [{ "ENTNAME": canonical }] }
        })))
        .mount(server)
        .await;
}

/// Mounts a profile page embedding `token`, for any entity name.
pub async fn mount_profile(server: &MockServer, token: &str) {
    let html = format!(
        "<html><head><script>window.__NUXT__={{orderNo:\"{token}\"}}</script></head><body></body></html>"
    );
    Mock::given(method("GET"))
        .and(path_regex(r"^/ent/.+\.html$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts the investment listing for `token`.
pub async fn mount_listing(server: &MockServer, token: &str, api_data: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/riskbird-api/companyInfo/list"))
        .and(body_partial_json(serde_json::json!({
            "orderNo": token,
            "extractType": "companyInvest",
            "size": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 20000,
            "data": { "apiData": api_data }
        })))
        .mount(server)
        .await;
}
