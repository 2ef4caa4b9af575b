//! Object store access: listing keys and reading their user metadata.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use tracing::{debug, trace};

use crate::config::S3Settings;
use crate::error::{Result, ScrapeError};
use crate::metadata::Fields;

/// Backend the scraper reads from.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every key under `prefix` (every key in the bucket when `None`), in
    /// listing order.
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    /// User-defined metadata attached to `key`.
    async fn fetch_metadata(&self, key: &str) -> Result<Fields>;
}

/// [`ObjectStore`] over a single S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build the SDK client from explicit settings and bind it to the bucket.
    pub async fn connect(settings: &S3Settings) -> Self {
        let client = create_s3_client(settings).await;
        Self::new(client, settings.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(&self.bucket);

            if let Some(prefix) = prefix {
                req = req.prefix(prefix);
            }

            if let Some(ref token) = continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req.send().await.map_err(|e| ScrapeError::List {
                prefix: prefix.map(str::to_string),
                message: aws_sdk_s3::error::DisplayErrorContext(e).to_string(),
            })?;

            let page: Vec<String> = resp
                .contents()
                .iter()
                .filter_map(|obj| obj.key().map(str::to_string))
                .collect();
            trace!(bucket = %self.bucket, count = page.len(), "Listed page");
            keys.extend(page);

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(str::to_string);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(bucket = %self.bucket, prefix = ?prefix, keys = keys.len(), "Listing complete");
        Ok(keys)
    }

    async fn fetch_metadata(&self, key: &str) -> Result<Fields> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch {
                key: format!("s3://{}/{}", self.bucket, key),
                message: aws_sdk_s3::error::DisplayErrorContext(e).to_string(),
            })?;

        Ok(resp.metadata().cloned().map(Fields::from).unwrap_or_default())
    }
}

/// Create an S3 client from connection settings.
pub async fn create_s3_client(settings: &S3Settings) -> Client {
    use aws_config::Region;

    let credentials = aws_sdk_s3::config::Credentials::new(
        &settings.access_key,
        &settings.secret_key,
        None,
        None,
        "scrape-metadata",
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint) = &settings.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let aws_config = loader.load().await;

    // Path-style addressing for custom endpoints (LocalStack, MinIO)
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(settings.endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}
