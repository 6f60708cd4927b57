//! Seed Story Pool
//!
//! Loads the fixed set of seed stories once at startup and hands them out
//! round-robin. The cursor is shared across all in-flight pipeline runs.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::domain::SeedStory;

/// Seed pool errors
#[derive(Debug, Error)]
pub enum SeedPoolError {
    #[error("No seed stories found in {0}")]
    Empty(String),

    #[error("Failed to read seed directory {0}: {1}")]
    IoError(String, String),
}

/// Round-robin pool of seed stories
pub struct SeedPool {
    seeds: Vec<SeedStory>,
    cursor: AtomicUsize,
}

impl SeedPool {
    /// Load all `*.json` seeds from `dir`
    ///
    /// Files that fail to parse are skipped with a warning. Fails when no
    /// seed loads at all; the process must not start without sources.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SeedPoolError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| SeedPoolError::IoError(dir.display().to_string(), e.to_string()))?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // read_dir order is platform-dependent; sort for a stable rotation
        paths.sort();

        let mut seeds = Vec::new();
        for path in paths {
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| serde_json::from_str::<SeedStory>(&raw).map_err(|e| e.to_string()))
            {
                Ok(seed) => seeds.push(seed),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable seed story");
                }
            }
        }

        if seeds.is_empty() {
            return Err(SeedPoolError::Empty(dir.display().to_string()));
        }

        tracing::info!(count = seeds.len(), dir = %dir.display(), "Seed stories loaded");
        Ok(Self {
            seeds,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a pool from already-loaded seeds; fails when empty
    pub fn from_seeds(seeds: Vec<SeedStory>) -> Result<Self, SeedPoolError> {
        if seeds.is_empty() {
            return Err(SeedPoolError::Empty("<memory>".to_string()));
        }
        Ok(Self {
            seeds,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Next seed in load order, wrapping after the last one
    ///
    /// Atomic read-increment-return: concurrent callers each claim a
    /// distinct successor index.
    pub fn next(&self) -> SeedStory {
        let index = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some((current + 1) % self.seeds.len())
            })
            .expect("cursor update never fails");
        self.seeds[index].clone()
    }
}
