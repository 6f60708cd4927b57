//! On-Disk Story Cache
//!
//! Persists generated stories under `<root>/<storyId>/`: the script JSON at
//! `<storyId>.json` and one `<index>.wav` per dialogue turn. The count of
//! wav files against the dialogue length decides whether synthesis is still
//! pending, so a crash mid-synthesis resumes cheaply from a directory
//! listing.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::domain::GeneratedStory;

/// Story store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// File-system story cache, keyed by seed story id
pub struct StoryStore {
    root: PathBuf,
}

impl StoryStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-story output directory
    pub fn story_dir(&self, story_id: &str) -> PathBuf {
        self.root.join(story_id)
    }

    /// Script JSON path: `<root>/<id>/<id>.json`
    pub fn script_path(&self, story_id: &str) -> PathBuf {
        self.story_dir(story_id).join(format!("{story_id}.json"))
    }

    /// Audio artifact path for one turn: `<root>/<id>/<index>.wav`
    pub fn audio_path(&self, story_id: &str, index: usize) -> PathBuf {
        self.story_dir(story_id).join(format!("{index}.wav"))
    }

    /// Load a cached script, or `None` when absent
    ///
    /// Malformed or unreadable JSON is a cache miss, not an error; the
    /// caller regenerates and overwrites it.
    pub async fn load_script(&self, story_id: &str) -> Option<GeneratedStory> {
        let path = self.script_path(story_id);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        match serde_json::from_str(&raw) {
            Ok(story) => Some(story),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Cached script is malformed, treating as cache miss"
                );
                None
            }
        }
    }

    /// Persist the script JSON, creating the story directory first
    pub async fn save_script(&self, story: &GeneratedStory) -> Result<(), StoreError> {
        let path = self.script_path(&story.original.id);
        let dir = path.parent().expect("script path has a parent");
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        let json = serde_json::to_vec_pretty(story)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Script persisted");
        Ok(())
    }

    /// Number of per-turn audio artifacts already on disk
    ///
    /// A directory listing, never per-file content inspection. A missing
    /// story directory counts as zero.
    pub async fn audio_count(&self, story_id: &str) -> Result<usize, StoreError> {
        let dir = self.story_dir(story_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::IoError(e.to_string())),
        };

        let mut count = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?
        {
            if entry.path().extension().is_some_and(|ext| ext == "wav") {
                count += 1;
            }
        }
        Ok(count)
    }
}
