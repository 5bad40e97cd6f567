mod cli;
mod console;
mod run;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use indicatif::MultiProgress;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// plain tracing output at the requested level; no progress bars
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    // if no trace level provided, use console output & progress bars
    let multi = MultiProgress::new();
    let tui = match cli.trace {
        Some(trace_level) => {
            preprocess(match trace_level {
                TraceLevel::DEBUG => Level::DEBUG,
                TraceLevel::ERROR => Level::ERROR,
                TraceLevel::INFO => Level::INFO,
                TraceLevel::TRACE => Level::TRACE,
                TraceLevel::WARN => Level::WARN,
            })?;
            false
        }
        None => {
            console::init(multi.clone())?;
            true
        }
    };
    trace!("command line input recorded: {cli:?}");

    run::run(cli, &multi, tui).await
}
