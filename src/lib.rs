//! Scrape user-defined S3 object metadata into a CSV file.
//!
//! The pipeline is list → fetch → tabulate → write:
//! - [`store`] lists keys and reads their metadata ([`ObjectStore`], [`S3Store`])
//! - [`scraper`] builds a [`MetadataSet`] keyed by display filename
//! - [`writer`] renders the set as CSV
//! - [`run`] wires them together for the binary

pub mod config;
pub mod error;
pub mod metadata;
pub mod run;
pub mod scraper;
pub mod store;
pub mod writer;

pub use config::{Config, LogLevel, S3Settings};
pub use error::{ConfigError, Result, ScrapeError};
pub use metadata::{display_filename, output_stem, Fields, MetadataSet};
pub use run::{execute, init_logging, Outcome};
pub use scraper::MetadataScraper;
pub use store::{create_s3_client, ObjectStore, S3Store};
pub use writer::CsvMetadataWriter;
