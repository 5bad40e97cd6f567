use crate::error::SpiderError;
use crate::http::*;
use regex::Regex;
use tracing::{debug, trace, warn};

lazy_static::lazy_static! {
    /// The lookup token (`orderNo`) is embedded somewhere in the profile page markup.
    static ref ORDER_NO: Regex = Regex::new(r"WEB\d+").expect("valid order number pattern");
}

/// Characters that change the meaning of the profile page URL when they appear in a name.
const URL_RESERVED: [char; 3] = ['/', '?', '#'];

/// Fetch the profile page of `company` and pull its lookup token out of the markup.
///
/// The name is placed into the path as-is, without percent-escaping.
pub(crate) async fn fetch_token(
    http_client: &HttpClient,
    base_url: &str,
    company: &str,
) -> Result<String, SpiderError> {
    let time = std::time::Instant::now();

    if company.contains(&URL_RESERVED[..]) {
        warn!("company name \"{company}\" contains URL-reserved characters; profile lookup may miss");
    }

    let url = profile_url(base_url, company);
    trace!("fetching profile page {url}");
    let page = http_client
        .get(&url)
        .send()
        .await
        .map_err(|err| {
            debug!("failed to fetch profile page for \"{company}\", error({err})");
            SpiderError::token(company, err)
        })?
        .text()
        .await
        .map_err(|err| SpiderError::token(company, err))?;

    let token = extract_token(&page)
        .ok_or_else(|| SpiderError::token(company, "no order number on profile page"))?;
    debug!(
        "lookup token for \"{company}\": {token}. {}",
        crate::time_elapsed(time)
    );

    Ok(token.to_string())
}

pub(crate) fn profile_url(base_url: &str, company: &str) -> String {
    format!("{base_url}/ent/{company}.html")
}

/// First `WEB<digits>` occurrence in `page`, verbatim.
pub fn extract_token(page: &str) -> Option<&str> {
    ORDER_NO.find(page).map(|m| m.as_str())
}
