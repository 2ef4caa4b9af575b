use std::fs;
use std::path::Path;

use async_trait::async_trait;
use clap::Parser;
use s3_metadata_scraper::{execute, Config, Fields, ObjectStore, Outcome, Result, ScrapeError};
use tempfile::TempDir;

/// Bucket contents served from memory, listed in insertion order.
struct FakeBucket {
    objects: Vec<(String, Fields)>,
    broken_key: Option<String>,
}

impl FakeBucket {
    fn new(objects: Vec<(&str, Vec<(&str, &str)>)>) -> Self {
        Self {
            objects: objects
                .into_iter()
                .map(|(key, fields)| (key.to_string(), fields.into_iter().collect()))
                .collect(),
            broken_key: None,
        }
    }
}

#[async_trait]
impl ObjectStore for FakeBucket {
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        Ok(self
            .objects
            .iter()
            .map(|(key, _)| key.clone())
            .filter(|key| prefix.map_or(true, |p| key.starts_with(p)))
            .collect())
    }

    async fn fetch_metadata(&self, key: &str) -> Result<Fields> {
        if self.broken_key.as_deref() == Some(key) {
            return Err(ScrapeError::Fetch {
                key: key.to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self
            .objects
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, fields)| fields.clone())
            .unwrap_or_default())
    }
}

fn photo_bucket() -> FakeBucket {
    FakeBucket::new(vec![
        ("photos/2016-04-22/a.jpg", vec![("camera", "X")]),
        ("photos/2016-04-22/b.jpg", vec![("iso", "100")]),
        ("photos/2016-05-01/c.jpg", vec![("camera", "Y"), ("iso", "400")]),
    ])
}

fn config(output_dir: &Path, extra: &[&str]) -> Config {
    let output_dir = output_dir.to_str().unwrap();
    let args = [
        "scrape-metadata",
        "--access-key",
        "AKIATEST",
        "--secret-key",
        "secrettest",
        "--bucket-name",
        "photos-bucket",
        "--output-dir",
        output_dir,
    ]
    .into_iter()
    .chain(extra.iter().copied());
    Config::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn test_writes_csv_named_after_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(temp_dir.path(), &["-p", "photos/2016-04-22/", "-s"]);

    let outcome = execute(&config, photo_bucket()).await.unwrap();

    let expected_path = temp_dir.path().join("2016-04-22.csv");
    assert_eq!(
        outcome,
        Outcome::Written {
            path: expected_path.clone(),
            rows: 2
        }
    );
    assert_eq!(
        fs::read_to_string(expected_path).unwrap(),
        "filename,camera,iso\na.jpg,X,\nb.jpg,,100\n"
    );
}

#[tokio::test]
async fn test_full_keys_without_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(temp_dir.path(), &[]);

    execute(&config, photo_bucket()).await.unwrap();

    let contents = fs::read_to_string(temp_dir.path().join("output.csv")).unwrap();
    assert_eq!(
        contents,
        "filename,camera,iso\n\
         photos/2016-04-22/a.jpg,X,\n\
         photos/2016-04-22/b.jpg,,100\n\
         photos/2016-05-01/c.jpg,Y,400\n"
    );
}

#[tokio::test]
async fn test_no_matches_creates_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(temp_dir.path(), &["--prefix", "videos/"]);

    let outcome = execute(&config, photo_bucket()).await.unwrap();

    assert_eq!(outcome, Outcome::NoMatches);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_backend_error_leaves_no_partial_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(temp_dir.path(), &["--concurrency", "4"]);
    let mut bucket = photo_bucket();
    bucket.broken_key = Some("photos/2016-04-22/b.jpg".to_string());

    let err = execute(&config, bucket).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Fetch { .. }));
    assert!(!temp_dir.path().join("output.csv").exists());
}

#[tokio::test]
async fn test_missing_output_dir_is_not_created() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("metadata");
    let config = config(&missing, &[]);

    let err = execute(&config, photo_bucket()).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Io(_)));
    assert!(!missing.exists());
}
