//! Object storage collaborator.
//!
//! Media blobs live in a Supabase-style storage service; the API only ever
//! needs to delete them when media records or category subtrees are
//! hard-deleted. Deletion is best-effort: a storage failure is logged and
//! swallowed, never allowed to block or roll back the database mutation.

use async_trait::async_trait;

use shopkit_core::storage::object_ref_from_public_url;

/// Object storage endpoint configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage service (e.g. `https://xyz.supabase.co`).
    pub url: String,
    /// Service-role key sent as a bearer token.
    pub service_key: String,
}

impl StorageConfig {
    /// Load storage configuration from `STORAGE_URL` / `STORAGE_SERVICE_KEY`.
    ///
    /// # Panics
    ///
    /// Panics if either variable is missing; blob cleanup cannot run
    /// without them and misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let url = std::env::var("STORAGE_URL").expect("STORAGE_URL must be set");
        let service_key =
            std::env::var("STORAGE_SERVICE_KEY").expect("STORAGE_SERVICE_KEY must be set");
        Self { url, service_key }
    }
}

/// Storage operations the API depends on.
///
/// A trait so tests can substitute a recording fake for the HTTP client.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Delete a batch of objects from `bucket`.
    async fn delete_objects(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;
}

/// Failure from the storage service.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// HTTP client for a Supabase-style storage API.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn delete_objects(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        // DELETE /storage/v1/object/{bucket} with {"prefixes": [...]}
        let url = format!("{}/storage/v1/object/{bucket}", self.config.url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.service_key)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Status(response.status()));
        }
        Ok(())
    }
}

/// Resolve the storage references for a set of media file URLs and issue one
/// best-effort delete batch per bucket.
///
/// URLs that do not match the public-object layout are skipped with a log
/// line; storage failures are logged and swallowed. The database remains the
/// source of truth for deletion success.
pub async fn delete_blobs_best_effort(storage: &dyn ObjectStorage, file_urls: &[String]) {
    use std::collections::HashMap;

    let mut by_bucket: HashMap<String, Vec<String>> = HashMap::new();
    for url in file_urls {
        match object_ref_from_public_url(url) {
            Some(r) => by_bucket.entry(r.bucket).or_default().push(r.path),
            None => {
                tracing::warn!(url = %url, "Skipping blob with unrecognized public URL");
            }
        }
    }

    for (bucket, paths) in by_bucket {
        if let Err(err) = storage.delete_objects(&bucket, &paths).await {
            tracing::warn!(
                bucket = %bucket,
                count = paths.len(),
                error = %err,
                "Storage blob deletion failed; continuing"
            );
        } else {
            tracing::debug!(bucket = %bucket, count = paths.len(), "Deleted storage blobs");
        }
    }
}
