//! Score caching for repeated runs
//!
//! A cached report is reused only while both the transcript content and the engine
//! fingerprint (rubric plus collaborators) are unchanged, so a slow grammar checker
//! is not re-run for transcripts that have not been edited.

use crate::ScoredTranscript;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_VERSION: u32 = 1;
const CACHE_FILENAME: &str = ".vaani-cache.json";

/// Cache entry for a single transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// SHA256 hash of the transcript content
    content_hash: String,
    /// Engine fingerprint the result was produced with
    engine_fingerprint: String,
    result: ScoredTranscript,
    /// Seconds since the Unix epoch
    cached_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    /// Map of file path to cache entry
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Cache manager for scored transcripts
pub struct ScoreCache {
    cache_path: PathBuf,
    data: CacheData,
    /// Whether the cache has been modified since load
    dirty: bool,
    enabled: bool,
}

impl ScoreCache {
    /// Load (or start) the cache stored under `project_root`
    pub fn new(project_root: &Path) -> Self {
        let cache_path = project_root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path).unwrap_or_default();

        Self {
            cache_path,
            data,
            dirty: false,
            enabled: true,
        }
    }

    /// Create a disabled cache (no-op)
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            data: CacheData::default(),
            dirty: false,
            enabled: false,
        }
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;

        if data.version != CACHE_VERSION {
            tracing::debug!(path = %path.display(), "discarding cache with old version");
            return None;
        }

        Some(data)
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        if !self.enabled || !self.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;

        Ok(())
    }

    fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Get cached result if still valid
    pub fn get(&self, path: &Path, content: &str, fingerprint: &str) -> Option<ScoredTranscript> {
        if !self.enabled {
            return None;
        }

        let key = path.to_string_lossy().to_string();
        let entry = self.data.entries.get(&key)?;

        if entry.engine_fingerprint != fingerprint {
            return None;
        }
        if entry.content_hash != Self::hash_content(content) {
            return None;
        }

        Some(entry.result.clone())
    }

    /// Store a scored transcript
    pub fn set(&mut self, path: &Path, content: &str, fingerprint: &str, result: ScoredTranscript) {
        if !self.enabled {
            return;
        }

        let key = path.to_string_lossy().to_string();
        let entry = CacheEntry {
            content_hash: Self::hash_content(content),
            engine_fingerprint: fingerprint.to_string(),
            result,
            cached_at: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        self.data.entries.insert(key, entry);
        self.dirty = true;
    }

    /// Remove entries for transcripts that no longer exist on disk
    pub fn cleanup(&mut self) {
        if !self.enabled {
            return;
        }

        let before = self.data.entries.len();
        self.data.entries.retain(|k, _| Path::new(k).is_file());
        if self.data.entries.len() != before {
            self.dirty = true;
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.data.entries.len(),
            enabled: self.enabled,
        }
    }

    /// Clear all cached entries
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.dirty = true;
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub enabled: bool,
}
