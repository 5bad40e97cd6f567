use crate::error::SpiderError;
use crate::invest::CompanyResult;
use serde::Serialize;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace};

/// Read a batch file: one company name per line, trimmed, blank lines skipped.
pub async fn read_company_list(path: impl AsRef<Path>) -> Result<Vec<String>, SpiderError> {
    let path = path.as_ref();
    trace!("reading company list: {}", path.display());
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| SpiderError::file_io(path, err))?;

    let companies: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| {
            if line.is_empty() {
                debug!("skipping blank line in {}", path.display());
            }
            !line.is_empty()
        })
        .map(str::to_string)
        .collect();

    debug!("{} companies read from {}", companies.len(), path.display());
    Ok(companies)
}

/// Pretty-print each result as 4-space indented JSON, one after another, newline terminated.
///
/// Non-ASCII names are written as-is.
pub fn render(results: &[CompanyResult]) -> Result<String, SpiderError> {
    let mut out = Vec::new();
    for result in results {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        result.serialize(&mut ser)?;
        out.push(b'\n');
    }
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write `results` to `path`, truncating it unless `append` is set.
pub async fn write_output(
    path: impl AsRef<Path>,
    results: &[CompanyResult],
    append: bool,
) -> Result<(), SpiderError> {
    let path = path.as_ref();
    let rendered = render(results)?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .await
        .map_err(|err| SpiderError::file_io(path, err))?;
    file.write_all(rendered.as_bytes())
        .await
        .map_err(|err| SpiderError::file_io(path, err))?;
    file.flush()
        .await
        .map_err(|err| SpiderError::file_io(path, err))?;

    info!("results written to {}", path.display());
    Ok(())
}

/// Print `results` to standard output in the same format as the file sink.
pub fn print_output(results: &[CompanyResult]) -> Result<(), SpiderError> {
    print!("{}", render(results)?);
    Ok(())
}

/// Read back a file written by [`write_output`].
pub async fn read_results(path: impl AsRef<Path>) -> Result<Vec<CompanyResult>, SpiderError> {
    let path = path.as_ref();
    trace!("reading results file: {}", path.display());
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| SpiderError::file_io(path, err))?;

    serde_json::Deserializer::from_str(&contents)
        .into_iter::<CompanyResult>()
        .map(|result| result.map_err(SpiderError::from))
        .collect()
}
