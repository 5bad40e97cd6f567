use crate::api::Registry;
use crate::error::SpiderError;
use crate::invest::{filter_by_ratio, CompanyResult, InvestmentRecord};
use crate::tui::BatchProgress;
use tracing::{debug, error, info};

/// Default minimum ownership percentage.
pub const DEFAULT_FUNDER_RATIO: f64 = 99.0;

/// Run resolve → token → listing for one company.
///
/// Stops at the first failing stage. A company without qualifying investments is still `Ok`,
/// with an empty `investment_branches`.
pub async fn run_company<R: Registry + ?Sized>(
    registry: &R,
    company: &str,
    min_ratio: f64,
) -> Result<CompanyResult, SpiderError> {
    let time = std::time::Instant::now();

    let canonical_name = registry.resolve(company).await?;
    let token = registry.fetch_token(&canonical_name).await?;
    let investment_branches = list_investments(registry, &token, min_ratio).await?;

    debug!(
        "\"{company}\" processed, {} branches kept. {}",
        investment_branches.len(),
        crate::time_elapsed(time)
    );

    Ok(CompanyResult {
        company: company.to_string(),
        investment_branches,
    })
}

/// Fetch the relationships behind `token` and keep those with ratio ≥ `min_ratio`.
pub async fn list_investments<R: Registry + ?Sized>(
    registry: &R,
    token: &str,
    min_ratio: f64,
) -> Result<Vec<InvestmentRecord>, SpiderError> {
    let records = registry.fetch_investments(token).await?;
    filter_by_ratio(records, min_ratio).map_err(|err| SpiderError::Listing {
        token: token.to_string(),
        reason: err.to_string(),
    })
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Companies with at least one qualifying investment, in input order.
    pub results: Vec<CompanyResult>,
    pub processed: usize,
    /// Companies that failed at some stage.
    pub failed: usize,
}

/// Run every company in order, one at a time.
///
/// A failing company is logged and skipped; it never stops the batch.
pub async fn run_batch<R: Registry + ?Sized>(
    registry: &R,
    companies: &[String],
    min_ratio: f64,
    progress: &BatchProgress,
) -> BatchReport {
    let time = std::time::Instant::now();
    let mut report = BatchReport::default();

    for company in companies {
        info!("processing company: {company}");
        progress.start(company);
        report.processed += 1;

        match run_company(registry, company, min_ratio).await {
            Ok(result) if result.investment_branches.is_empty() => {
                info!("no qualifying investment branches for {company}");
                progress.succeeded();
            }
            Ok(result) => {
                progress.succeeded();
                report.results.push(result);
            }
            Err(err) => {
                error!("{err}");
                progress.failed();
                report.failed += 1;
            }
        }
    }

    progress.finish();
    info!(
        "batch finished: {} processed, {} matched, {} failed. {}",
        report.processed,
        report.results.len(),
        report.failed,
        crate::time_elapsed(time)
    );

    report
}
