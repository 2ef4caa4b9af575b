//! End-to-end execution of a scrape.

use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::fmt;

use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::scraper::MetadataScraper;
use crate::store::ObjectStore;
use crate::writer::CsvMetadataWriter;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing matched the prefix; no file was created.
    NoMatches,
    /// The CSV file was written.
    Written { path: PathBuf, rows: usize },
}

/// Initialize logging. Fails if a global subscriber is already installed.
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr); // keep stdout for the report

    subscriber.try_init().map_err(anyhow::Error::msg)?;

    Ok(())
}

/// Scrape `store` and write the CSV file described by `config`.
///
/// The output file is only opened once every metadata fetch has succeeded.
pub async fn execute<S: ObjectStore>(config: &Config, store: S) -> Result<Outcome> {
    let mut scraper = MetadataScraper::new(store).with_concurrency(config.concurrency);
    scraper.configure(config.short_filename);

    let start_time = std::time::Instant::now();
    let metadata = scraper.get_all_metadata(config.prefix.as_deref()).await?;
    info!(
        entries = metadata.len(),
        "scraped metadata in {:.2}s",
        start_time.elapsed().as_secs_f32()
    );

    if metadata.is_empty() {
        return Ok(Outcome::NoMatches);
    }

    let path = config.output_path();
    let mut writer = CsvMetadataWriter::create(&path, &metadata)?;
    let rows = writer.write()?;
    writer.close()?;

    info!(path = %path.display(), rows, "wrote metadata");
    Ok(Outcome::Written { path, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_fails() {
        let _ = init_logging(LogLevel::Warn);
        assert!(init_logging(LogLevel::Debug).is_err());
    }
}
