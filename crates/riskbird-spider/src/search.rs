use crate::error::SpiderError;
use crate::http::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const SEARCH_PATH: &str = "/riskbird-api/newSearch";

// scrape
// ----------------------------------------------------------------------------

/// Resolve a free-text company name to the canonical name of the top search hit.
pub(crate) async fn resolve(
    http_client: &HttpClient,
    base_url: &str,
    company: &str,
) -> Result<String, SpiderError> {
    let time = std::time::Instant::now();

    trace!("searching registry for \"{company}\"");
    let body = http_client
        .post(format!("{base_url}{SEARCH_PATH}"))
        .json(&SearchRequest::new(company))
        .send()
        .await
        .map_err(|err| {
            debug!("failed to search for \"{company}\", error({err})");
            SpiderError::resolution(company, err)
        })?
        .text()
        .await
        .map_err(|err| SpiderError::resolution(company, err))?;

    let response: SearchResponse = serde_json::from_str(&body).map_err(|err| {
        debug!("failed to parse search response for \"{company}\", error({err})");
        SpiderError::resolution(company, err)
    })?;

    let name = response.first_match(company)?;
    debug!(
        "\"{company}\" resolved to \"{name}\". {}",
        crate::time_elapsed(time)
    );

    Ok(name)
}

// ser
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query_type: &'static str,
    search_key: &'a str,
    page_no: u32,
    range: u32,
    select_condition_data: &'static str,
}

impl<'a> SearchRequest<'a> {
    fn new(search_key: &'a str) -> Self {
        Self {
            query_type: "1",
            search_key,
            page_no: 1,
            range: 10,
            select_condition_data: "",
        }
    }
}

// de
// ----------------------------------------------------------------------------
//
//  {
//      "code": 20000,
//      "msg": "...",
//      "data": {
//          "list": [
//              { "ENTNAME": "北京百度网讯科技有限公司", ... },
//              ...
//          ]
//      }
//  }
#[derive(Debug, Deserialize)]
struct SearchResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    list: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "ENTNAME")]
    ent_name: String,
}

impl SearchResponse {
    fn first_match(self, company: &str) -> Result<String, SpiderError> {
        if self.code != SUCCESS_CODE {
            let reason = format!(
                "search returned code {} ({})",
                self.code,
                self.msg.as_deref().unwrap_or("no message")
            );
            debug!("{reason} for \"{company}\"");
            return Err(SpiderError::resolution(company, reason));
        }

        self.data
            .and_then(|data| data.list.into_iter().next())
            .map(|hit| hit.ent_name)
            .ok_or_else(|| SpiderError::resolution(company, "search returned no results"))
    }
}
