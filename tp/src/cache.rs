//! Response cache
//!
//! Directory-backed store of raw generator output, one file per week, plus
//! the assembled plan once a build finishes. The cache is what makes a build
//! resumable: a week that reached disk is never paid for twice.
//!
//! ```text
//! {cache_dir}/
//! ├── week_1.json   # {"raw_response": "..."}
//! ├── week_2.json
//! └── plan.json     # serialized Plan
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::Plan;

const PLAN_FILE: &str = "plan.json";

/// Cache failures
#[derive(Debug, Error)]
pub enum CacheError {
    /// The entry exists but cannot be read back as an envelope
    #[error("Corrupt cache entry {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Cache I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CacheError::Corrupt { .. })
    }

    fn io(path: &Path, source: io::Error) -> Self {
        CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// On-disk envelope for one raw response
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    // older caches wrote the provider-specific key
    #[serde(alias = "openai_response")]
    raw_response: String,
}

/// Per-run store of raw generator responses keyed by week number
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Cache rooted directly at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(?dir, "ResponseCache::new: called");
        Self { dir }
    }

    /// Cache namespaced under `root/<run_id>` so concurrent builds never share keys
    pub fn for_run(root: impl AsRef<Path>, run_id: &str) -> Self {
        debug!(%run_id, "ResponseCache::for_run: called");
        Self::new(root.as_ref().join(run_id))
    }

    /// Fresh time-ordered run id
    pub fn new_run_id() -> String {
        Uuid::now_v7().to_string()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `week`
    pub fn week_path(&self, week: u32) -> PathBuf {
        self.dir.join(format!("week_{}.json", week))
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dir.join(PLAN_FILE)
    }

    /// Raw response cached for `week`, if any
    pub fn get(&self, week: u32) -> Result<Option<String>, CacheError> {
        let path = self.week_path(week);
        debug!(%week, ?path, "ResponseCache::get: called");

        let Some(content) = read_if_exists(&path)? else {
            debug!(%week, "ResponseCache::get: miss");
            return Ok(None);
        };

        let envelope: Envelope = serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(%week, "ResponseCache::get: hit");
        Ok(Some(envelope.raw_response))
    }

    /// Store the raw response for `week`, replacing any previous entry
    pub fn put(&self, week: u32, raw: &str) -> Result<(), CacheError> {
        let path = self.week_path(week);
        debug!(%week, ?path, raw_len = raw.len(), "ResponseCache::put: called");

        let envelope = Envelope {
            raw_response: raw.to_string(),
        };
        let data = serde_json::to_vec_pretty(&envelope).map_err(|e| CacheError::io(&path, e.into()))?;
        atomic_write(&path, &data)
    }

    /// Drop the entry for `week`; a missing entry is not an error
    pub fn remove(&self, week: u32) -> Result<(), CacheError> {
        let path = self.week_path(week);
        debug!(%week, ?path, "ResponseCache::remove: called");
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(&path, e)),
        }
    }

    /// Store the assembled plan
    pub fn put_plan(&self, plan: &Plan) -> Result<(), CacheError> {
        let path = self.plan_path();
        debug!(?path, weeks = plan.weeks.len(), "ResponseCache::put_plan: called");
        let data = serde_json::to_vec_pretty(plan).map_err(|e| CacheError::io(&path, e.into()))?;
        atomic_write(&path, &data)?;
        info!("Saved plan '{}' to {}", plan.name, path.display());
        Ok(())
    }

    /// Previously assembled plan, if one was saved
    pub fn get_plan(&self) -> Result<Option<Plan>, CacheError> {
        let path = self.plan_path();
        debug!(?path, "ResponseCache::get_plan: called");
        let Some(content) = read_if_exists(&path)? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::Corrupt {
                path,
                reason: e.to_string(),
            })
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>, CacheError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        // non-UTF-8 bytes mean a damaged entry, not an I/O fault
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(CacheError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

/// Write through a temp file in the same directory, then rename over `path`
///
/// Readers see either the old entry or the new one, never a partial write.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), CacheError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CacheError::io(dir, e))?;
    tmp.write_all(data).map_err(|e| CacheError::io(path, e))?;
    tmp.persist(path).map_err(|e| CacheError::io(path, e.error))?;
    Ok(())
}
