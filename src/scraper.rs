//! Collects the metadata of every object under a prefix.

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::metadata::{display_filename, MetadataSet};
use crate::store::ObjectStore;

pub struct MetadataScraper<S> {
    store: S,
    short_filename: bool,
    concurrency: usize,
}

impl<S: ObjectStore> MetadataScraper<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            short_filename: false,
            concurrency: 1,
        }
    }

    /// Render display filenames as the last path segment of each key instead
    /// of the full key. Applies to every later scrape.
    pub fn configure(&mut self, short_filename: bool) {
        self.short_filename = short_filename;
    }

    /// Number of metadata requests kept in flight (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// List every key under `prefix` and fetch the metadata of each one.
    ///
    /// Entries are keyed by display filename in listing order. The first
    /// backend error aborts the scrape.
    #[instrument(skip(self), fields(short_filename = self.short_filename))]
    pub async fn get_all_metadata(&self, prefix: Option<&str>) -> Result<MetadataSet> {
        let keys = self.store.list_keys(prefix).await?;
        info!(keys = keys.len(), "Fetching object metadata");

        // `buffered` yields in input order, so the result is the same for any
        // concurrency.
        let fetched: Vec<_> = stream::iter(keys)
            .map(|key| async move {
                let fields = self.store.fetch_metadata(&key).await?;
                Ok::<_, crate::error::ScrapeError>((key, fields))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut results = MetadataSet::new();
        for (key, fields) in fetched {
            let filename = display_filename(&key, self.short_filename);
            debug!(key = %key, fields = fields.len(), "Fetched metadata");
            if results.insert(filename, fields).is_some() {
                warn!(key = %key, filename, "Display filename collides with an earlier key; keeping the later one");
            }
        }

        Ok(results)
    }
}
