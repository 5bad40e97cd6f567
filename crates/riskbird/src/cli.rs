use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Look up a company's investment branches on riskbird.com, filtered by ownership ratio.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// A single company name, or the path to a file with one company name per line.
    pub input: String,

    /// Write results to this file instead of printing them.
    #[arg(long = "output_file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Minimum funder ratio (percent) an investment branch must hold.
    #[arg(long = "funder_ratio", value_name = "RATIO", default_value_t = riskbird_spider::pipeline::DEFAULT_FUNDER_RATIO)]
    pub funder_ratio: f64,

    /// Append to the output file instead of overwriting it.
    #[arg(long, requires = "output_file")]
    pub append: bool,

    /// INI file holding the `[riskbird]` credentials.
    #[arg(short, long, value_name = "PATH", default_value = "config.ini")]
    pub config: PathBuf,

    /// Request timeout in seconds; overrides `timeout_secs` from the config file.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Sets the level of tracing.
    ///
    /// If no level is provided, console output and progress bars are used.
    #[arg(short, long)]
    pub trace: Option<TraceLevel>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
