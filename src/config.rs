use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{ConfigError, Result, ScrapeError};

const ACCESS_KEY_PLACEHOLDER: &str = "<your-access-key-here>";
const SECRET_KEY_PLACEHOLDER: &str = "<your-secret-access-key-here>";
const BUCKET_NAME_PLACEHOLDER: &str = "<bucket-name>";

/// Scrape user-defined S3 object metadata into a CSV file.
///
/// Lists every object under the prefix, fetches its metadata and writes one
/// row per object to `<output-dir>/<last prefix segment>.csv`.
#[derive(clap::Parser, Debug)]
#[command(name = "scrape-metadata", version, about, long_about = None)]
pub struct Config {
    /// Only scrape keys starting with this prefix
    #[clap(short, long)]
    pub prefix: Option<String>,

    /// Emit only the last path segment of each key (file.jpg instead of photos/2016-04-22/file.jpg)
    #[clap(short, long)]
    pub short_filename: bool,

    /// AWS access key ID
    #[clap(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub(crate) access_key: Option<String>,

    /// AWS secret access key
    #[clap(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub(crate) secret_key: Option<String>,

    /// Bucket to scrape
    #[clap(long, env)]
    pub(crate) bucket_name: Option<String>,

    /// AWS region
    #[clap(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom S3 endpoint URL (LocalStack, MinIO)
    #[clap(long, env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Directory the CSV file is written to; must already exist
    #[clap(long, default_value = "metadata")]
    pub output_dir: PathBuf,

    /// Number of metadata requests in flight at once
    #[clap(long, default_value = "1", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Log level
    #[clap(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Connection settings handed to the object store.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
}

impl Config {
    /// Check the required connection values, reporting every missing one.
    pub fn validate(&self) -> Vec<ConfigError> {
        let required = [
            (&self.access_key, ACCESS_KEY_PLACEHOLDER, "AWS_ACCESS_KEY_ID", "access-key"),
            (&self.secret_key, SECRET_KEY_PLACEHOLDER, "AWS_SECRET_ACCESS_KEY", "secret-key"),
            (&self.bucket_name, BUCKET_NAME_PLACEHOLDER, "BUCKET_NAME", "bucket-name"),
        ];

        required
            .into_iter()
            .filter(|(value, placeholder, _, _)| !is_set(value.as_deref(), placeholder))
            .map(|(_, _, env, flag)| ConfigError::NotSet(env, flag))
            .collect()
    }

    pub fn s3_settings(&self) -> Result<S3Settings> {
        if let Some(err) = self.validate().into_iter().next() {
            return Err(ScrapeError::Config(err));
        }

        Ok(S3Settings {
            access_key: self.access_key.clone().unwrap_or_default(),
            secret_key: self.secret_key.clone().unwrap_or_default(),
            bucket: self.bucket_name.clone().unwrap_or_default(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        })
    }

    /// Path of the CSV file for this run.
    pub fn output_path(&self) -> PathBuf {
        let stem = crate::metadata::output_stem(self.prefix.as_deref());
        self.output_dir.join(format!("{stem}.csv"))
    }
}

fn is_set(value: Option<&str>, placeholder: &str) -> bool {
    matches!(value.map(str::trim), Some(v) if !v.is_empty() && v != placeholder)
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> std::result::Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Log level argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
