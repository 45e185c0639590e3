//! Filesystem-backed address cache: one JSON file per postcode.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::{AddressKeyCache, AddressMap};

/// Directory name under the user's home used when no root is configured.
const DEFAULT_DIR: &str = ".bin_days";

/// Distinguishes temp files of concurrent writers within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileAddressCache {
    root: PathBuf,
}

impl FileAddressCache {
    /// Cache rooted at `root`, created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at `~/.bin_days`.
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(Self::new(home.join(DEFAULT_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `postcode`. Anything outside `[A-Za-z0-9_-]`
    /// becomes `_`, so postcodes can never escape the cache root.
    fn record_path(&self, postcode: &str) -> PathBuf {
        let stem: String = postcode
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{stem}.json"))
    }

    async fn read_record(&self, path: &Path) -> Result<Option<AddressMap>> {
        let body = match tokio::fs::read_to_string(path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        parse_record(&body)
            .map(Some)
            .with_context(|| format!("corrupt cache record {}", path.display()))
    }
}

/// Deserialize a record, naming the offending JSON path on failure.
fn parse_record(body: &str) -> Result<AddressMap> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(jd).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if path.is_empty() || path == "." {
            anyhow::anyhow!(inner)
        } else {
            anyhow::anyhow!("at path '{path}': {inner}")
        }
    })
}

#[async_trait]
impl AddressKeyCache for FileAddressCache {
    async fn lookup(&self, postcode: &str, house_number: &str) -> Option<String> {
        let path = self.record_path(postcode);
        match self.read_record(&path).await {
            Ok(Some(record)) => record.get(house_number).cloned(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = ?e, postcode, "ignoring unreadable address cache record");
                None
            }
        }
    }

    async fn store(&self, postcode: &str, addresses: &AddressMap) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create cache dir {}", self.root.display()))?;

        let path = self.record_path(postcode);
        // Per-writer temp name so concurrent refreshes never share a file
        let tmp = path.with_extension(format!(
            "json.{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let body = serde_json::to_vec_pretty(addresses)?;

        // Write then rename, so readers see either the old or the new record
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to replace {}", path.display()));
        }

        debug!(postcode, count = addresses.len(), path = %path.display(), "address cache record written");
        Ok(())
    }
}
