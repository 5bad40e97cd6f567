use crate::cli::Cli;
use indicatif::MultiProgress;
use riskbird_spider::config::Settings;
use riskbird_spider::tui::BatchProgress;
use riskbird_spider::{fs, pipeline, CompanyResult, RiskbirdClient};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// Load credentials, then run the lookup for one company or a batch file.
pub(crate) async fn run(cli: Cli, multi: &MultiProgress, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    // 1. credentials; a bad config degrades to unauthenticated requests
    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{err}");
            Settings::default()
        }
    }
    .with_timeout(cli.timeout.map(Duration::from_secs));

    // 2. registry client
    let registry = match RiskbirdClient::new(&settings) {
        Ok(registry) => registry,
        Err(err) => {
            error!("{err}");
            RiskbirdClient::new(&Settings {
                credentials: None,
                ..settings
            })?
        }
    };
    debug!("registry client built for {}", registry.base_url());

    // 3. single company or batch file
    let results = match input_mode(&cli.input) {
        InputMode::Batch(path) => run_batch(&cli, &path, &registry, multi, tui).await?,
        InputMode::Single(company) => run_single(&cli, &company, &registry).await,
    };

    // 4. output
    if results.is_empty() {
        info!("no companies match the criteria");
    } else {
        emit(&cli, &results).await;
    }

    debug!("riskbird finished. {}", riskbird_spider::time_elapsed(time));
    Ok(())
}

/// What the positional argument names.
#[derive(Debug, PartialEq)]
enum InputMode {
    Single(String),
    Batch(PathBuf),
}

/// An existing file is a batch list; anything else is a company name.
fn input_mode(input: &str) -> InputMode {
    let path = Path::new(input);
    if path.is_file() {
        InputMode::Batch(path.to_path_buf())
    } else {
        InputMode::Single(input.to_string())
    }
}

async fn run_single(cli: &Cli, company: &str, registry: &RiskbirdClient) -> Vec<CompanyResult> {
    info!("processing single company: {company}");
    match pipeline::run_company(registry, company, cli.funder_ratio).await {
        Ok(result) if result.investment_branches.is_empty() => vec![],
        Ok(result) => vec![result],
        Err(err) => {
            error!("{err}");
            vec![]
        }
    }
}

async fn run_batch(
    cli: &Cli,
    path: &Path,
    registry: &RiskbirdClient,
    multi: &MultiProgress,
    tui: bool,
) -> anyhow::Result<Vec<CompanyResult>> {
    let companies = match fs::read_company_list(path).await {
        Ok(companies) => companies,
        Err(err) => {
            error!("{err}");
            vec![]
        }
    };
    if companies.is_empty() {
        error!("no companies read from {}", path.display());
        return Ok(vec![]);
    }

    let progress = if tui {
        BatchProgress::new(multi, companies.len())?
    } else {
        BatchProgress::hidden()
    };

    let report = pipeline::run_batch(registry, &companies, cli.funder_ratio, &progress).await;
    Ok(report.results)
}

async fn emit(cli: &Cli, results: &[CompanyResult]) {
    let outcome = match &cli.output_file {
        Some(path) => fs::write_output(path, results, cli.append).await,
        None => fs::print_output(results),
    };
    if let Err(err) = outcome {
        error!("{err}");
    }
}
