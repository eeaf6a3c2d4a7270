use std::path::Path;

use chrono::Local;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::config::{Credentials, RunConfig};
use crate::filter::Filters;
use crate::paginate::{AggregatedResult, FetchOutcome, Paginator};
use crate::request::HttpTransport;
use crate::{info_time, warn_time, Result};

/// One full run: credentials, filters, every page, then the output file.
/// The file is written for complete and partial results alike, never when page 0 fails.
pub async fn run(config: &RunConfig, filters: &Filters) -> Result<FetchOutcome> {
    let start_time = Local::now();

    let credentials = Credentials::load(&config.config_path).await?;
    let params = filters.build()?;

    let transport = HttpTransport::new(config.endpoint.as_str(), credentials.headers()?);
    let paginator = Paginator::new(transport).with_delay(config.page_delay);
    let outcome = paginator.fetch_all(params).await?;

    write_result(&config.output_path, &outcome.result).await?;
    let FetchOutcome { result, failure } = &outcome;
    match failure {
        None => info_time!(
            start_time,
            "Done! Retrieved {} items. Data saved to {}",
            result.items.len(),
            config.output_path.display()
        ),
        Some(failure) => warn_time!(
            "Incomplete! Retrieved {} of {} items, stopped at page {}. Data saved to {}",
            result.items.len(),
            result.total,
            failure.page,
            config.output_path.display()
        ),
    }

    Ok(outcome)
}

/// Writes the result as pretty JSON (2-space indent), replacing any previous file.
pub async fn write_result(path: &Path, result: &AggregatedResult) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(result)?;
    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}
