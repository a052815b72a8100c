//! # Manifest Fetching and Caching
//!
//! Retrieval of the two YAML manifests from GitHub with a
//! content-addressed on-disk cache.
//!
//! ## Cache
//!
//! Each fetched document is cached under the cache directory in a file
//! named by the SHA-1 of its `repo:ref:path` triple. Cache entries that
//! fail to read or parse are discarded with a warning and refetched; that
//! recovery is silent as far as callers are concerned.
//!
//! ## Version routing
//!
//! Canasta's recommended revisions live in one file per MediaWiki version
//! (`1.43.yaml`, `1.44.yaml`, ...). [`Fetcher::fetch_canasta_revisions`]
//! selects the file dynamically from the version detected in the Taqasta
//! manifest, defaulting to [`DEFAULT_MEDIAWIKI_VERSION`].

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_yaml::Value;
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::version::{detect_mediawiki_version, DEFAULT_MEDIAWIKI_VERSION};

/// GitHub repository holding Taqasta's bundle definition.
pub const TAQASTA_REPO: &str = "WikiTeq/Taqasta";

/// Path of the bundle definition within the Taqasta repository.
pub const TAQASTA_VALUES_FILE: &str = "values.yml";

/// GitHub repository holding Canasta's recommended revisions.
pub const CANASTA_REPO: &str = "CanastaWiki/RecommendedRevisions";

const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches YAML files from GitHub repositories with on-disk caching.
#[derive(Debug)]
pub struct Fetcher {
    cache_dir: PathBuf,
    client: Client,
}

impl Fetcher {
    /// Create a fetcher rooted at the given cache directory, creating the
    /// directory if needed. Failure to create it is fatal.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| Error::Cache {
            message: format!(
                "cannot create cache directory {}: {e}",
                cache_dir.display()
            ),
        })?;

        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("canasta-diff/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network {
                url: RAW_CONTENT_BASE.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { cache_dir, client })
    }

    /// The cache file for a `repo:ref:path` triple.
    pub fn cache_path(&self, repo: &str, git_ref: &str, file_path: &str) -> PathBuf {
        let cache_key = format!("{repo}:{git_ref}:{file_path}");
        let mut hasher = Sha1::new();
        hasher.update(cache_key.as_bytes());
        self.cache_dir
            .join(format!("{:x}.yaml", hasher.finalize()))
    }

    /// Fetch a YAML document, preferring the local cache.
    ///
    /// A corrupted cache entry is removed and the document refetched.
    /// Fetched content that fails to parse as YAML is fatal; parsed
    /// documents are re-serialized into the cache.
    pub fn fetch(&self, repo: &str, git_ref: &str, file_path: &str) -> Result<Value> {
        let cache_path = self.cache_path(repo, git_ref, file_path);

        if cache_path.exists() {
            let cached = fs::read_to_string(&cache_path)
                .map_err(Error::from)
                .and_then(|text| serde_yaml::from_str::<Value>(&text).map_err(Error::from));
            match cached {
                Ok(value) => {
                    log::debug!("cache hit for {repo}/{git_ref}/{file_path}");
                    return Ok(value);
                }
                Err(e) => {
                    log::warn!(
                        "discarding corrupt cache entry {}: {e}",
                        cache_path.display()
                    );
                    let _ = fs::remove_file(&cache_path);
                }
            }
        }

        log::debug!("fetching {repo}/{git_ref}/{file_path}");
        let content = self.fetch_from_github(repo, git_ref, file_path)?;
        let value: Value = serde_yaml::from_str(&content).map_err(|source| Error::InvalidYaml {
            location: format!("{repo}/{git_ref}/{file_path}"),
            source,
        })?;

        fs::write(&cache_path, serde_yaml::to_string(&value)?)?;
        Ok(value)
    }

    /// Fetch Taqasta's `values.yml` at the given git reference.
    pub fn fetch_taqasta_values(&self, git_ref: &str) -> Result<Value> {
        self.fetch(TAQASTA_REPO, git_ref, TAQASTA_VALUES_FILE)
    }

    /// Fetch Canasta's recommended revisions at the given git reference,
    /// selecting the file for the MediaWiki version detected in the Taqasta
    /// manifest (default when no manifest is supplied).
    pub fn fetch_canasta_revisions(&self, git_ref: &str, taqasta: Option<&Value>) -> Result<Value> {
        let mw_version = taqasta
            .map(detect_mediawiki_version)
            .unwrap_or_else(|| DEFAULT_MEDIAWIKI_VERSION.to_string());
        self.fetch(CANASTA_REPO, git_ref, &format!("{mw_version}.yaml"))
    }

    fn fetch_from_github(&self, repo: &str, git_ref: &str, file_path: &str) -> Result<String> {
        let url = format!("{RAW_CONTENT_BASE}/{repo}/{git_ref}/{file_path}");
        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                Error::Timeout { url: url.clone() }
            } else {
                Error::Network {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })?;
        let response = response.error_for_status().map_err(|e| Error::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        response.text().map_err(|e| Error::Network {
            url,
            message: e.to_string(),
        })
    }
}
