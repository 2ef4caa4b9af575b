use clap::Parser;
use tracing::info;

use s3_metadata_scraper::{execute, init_logging, Config, Outcome, S3Store};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::parse();

    init_logging(config.log_level)?;

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", error);
        }
        std::process::exit(1);
    }

    let settings = config.s3_settings()?;
    info!(bucket = %settings.bucket, region = %settings.region, "connecting to S3");
    let store = S3Store::connect(&settings).await;

    match execute(&config, store).await? {
        Outcome::NoMatches => {
            println!("There are no keys which match the given prefix.");
        }
        Outcome::Written { path, rows } => {
            println!("Wrote metadata for {} objects to {}", rows, path.display());
        }
    }

    Ok(())
}
