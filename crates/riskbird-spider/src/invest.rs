use crate::error::SpiderError;
use crate::http::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const LIST_PATH: &str = "/riskbird-api/companyInfo/list";

/// Page size of the relationship listing; large enough that one page holds every branch.
const PAGE_SIZE: u32 = 2000;

/// One company the queried entity has invested in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub ent_name: String,
    /// Ownership as received, e.g. `"51.5%"`.
    pub funder_ratio: String,
}

impl InvestmentRecord {
    /// The ownership percentage as a number.
    pub fn ratio(&self) -> Result<f64, SpiderError> {
        parse_ratio(&self.funder_ratio)
    }
}

/// The output record for one queried company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyResult {
    pub company: String,
    pub investment_branches: Vec<InvestmentRecord>,
}

/// Parse a percent-suffixed ratio such as `"99.5%"`.
///
/// At most one trailing `%` is stripped, and a missing one is tolerated. Anything that is not a
/// finite, non-negative number is an error.
pub fn parse_ratio(raw: &str) -> Result<f64, SpiderError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    match number.parse::<f64>() {
        Ok(ratio) if ratio.is_finite() && ratio >= 0.0 => Ok(ratio),
        _ => Err(SpiderError::Ratio(raw.to_string())),
    }
}

/// Keep the records whose ratio is at least `min_ratio`.
///
/// One malformed ratio fails the whole listing rather than being coerced.
pub fn filter_by_ratio(
    records: Vec<InvestmentRecord>,
    min_ratio: f64,
) -> Result<Vec<InvestmentRecord>, SpiderError> {
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if record.ratio()? >= min_ratio {
            kept.push(record);
        }
    }
    Ok(kept)
}

// scrape
// ----------------------------------------------------------------------------

/// Fetch every "company invests in" relationship for the entity behind `token`.
pub(crate) async fn fetch_investments(
    http_client: &HttpClient,
    base_url: &str,
    token: &str,
) -> Result<Vec<InvestmentRecord>, SpiderError> {
    let time = std::time::Instant::now();

    trace!("listing investments for {token}");
    let body = http_client
        .post(format!("{base_url}{LIST_PATH}"))
        .header("Xs-Content-Type", "application/json")
        .json(&ListRequest::new(token))
        .send()
        .await
        .map_err(|err| {
            debug!("failed to list investments for {token}, error({err})");
            SpiderError::listing(token, err)
        })?
        .text()
        .await
        .map_err(|err| SpiderError::listing(token, err))?;

    let response: ListResponse = serde_json::from_str(&body).map_err(|err| {
        debug!("failed to parse investment listing for {token}, error({err})");
        SpiderError::listing(token, err)
    })?;

    let records = response.into_records(token)?;
    debug!(
        "{} investments listed for {token}. {}",
        records.len(),
        crate::time_elapsed(time)
    );

    Ok(records)
}

// ser
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    page: u32,
    size: u32,
    order_no: &'a str,
    extract_type: &'static str,
    sort_field: &'static str,
}

impl<'a> ListRequest<'a> {
    fn new(order_no: &'a str) -> Self {
        Self {
            page: 1,
            size: PAGE_SIZE,
            order_no,
            extract_type: "companyInvest",
            sort_field: "",
        }
    }
}

// de
// ----------------------------------------------------------------------------
//
//  {
//      "code": 20000,
//      "data": {
//          "apiData": [
//              { "entName": "...", "funderRatio": "100%", ... },
//              ...
//          ]
//      }
//  }
#[derive(Debug, Deserialize)]
struct ListResponse {
    code: Option<i64>,
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    api_data: Vec<InvestmentRecord>,
}

impl ListResponse {
    fn into_records(self, token: &str) -> Result<Vec<InvestmentRecord>, SpiderError> {
        if let Some(code) = self.code.filter(|code| *code != SUCCESS_CODE) {
            return Err(SpiderError::listing(
                token,
                format!("listing returned code {code}"),
            ));
        }
        self.data
            .map(|data| data.api_data)
            .ok_or_else(|| SpiderError::listing(token, "listing response has no data"))
    }
}
