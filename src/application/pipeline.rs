//! Story Generation Pipeline
//!
//! Orchestrates one story generation end to end: pick the next seed, check
//! the disk cache, otherwise stream a script from the language model, parse
//! it into turns, persist it, then synthesize whatever audio is missing.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{parse_dialogue, GeneratedStory};
use crate::infrastructure::storage::{SeedPool, StoreError, StoryStore};

use super::ports::{CompletionRequest, LlmError, LlmPort, SpeechPort, TtsError};
use super::prompts::{build_user_prompt, STORY_SYSTEM_PROMPT};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Script generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Audio synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("Story storage failed: {0}")]
    Storage(#[from] StoreError),
}

/// Story generation pipeline
///
/// Stateless apart from its collaborators; safe to call from multiple
/// tasks. Concurrent runs for the same story id race benignly on disk
/// (last-writer-wins script, idempotent audio).
pub struct StoryPipeline {
    seeds: Arc<SeedPool>,
    store: Arc<StoryStore>,
    llm: Arc<dyn LlmPort>,
    tts: Arc<dyn SpeechPort>,
    llm_defaults: CompletionRequest,
}

impl StoryPipeline {
    pub fn new(
        seeds: Arc<SeedPool>,
        store: Arc<StoryStore>,
        llm: Arc<dyn LlmPort>,
        tts: Arc<dyn SpeechPort>,
        llm_defaults: CompletionRequest,
    ) -> Self {
        Self {
            seeds,
            store,
            llm,
            tts,
            llm_defaults,
        }
    }

    /// Generate (or load) the next story, audio included
    pub async fn generate(&self) -> Result<GeneratedStory, PipelineError> {
        let seed = self.seeds.next();

        // Cache hit: skip the model call entirely, just complete the audio.
        if let Some(cached) = self.store.load_script(&seed.id).await {
            tracing::info!(story_id = %seed.id, "Story already on disk, loading");
            self.synthesize_missing(&cached).await?;
            return Ok(cached);
        }

        tracing::info!(story_id = %seed.id, title = %seed.title, "Generating script");

        let request = CompletionRequest {
            system_prompt: STORY_SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(&seed),
            ..self.llm_defaults.clone()
        };
        let content = self.llm.complete(&request).await?;

        let dialogue = parse_dialogue(&content);
        tracing::info!(
            story_id = %seed.id,
            turns = dialogue.len(),
            content_len = content.len(),
            "Script generated"
        );

        let story = GeneratedStory {
            original: seed,
            content,
            dialogue,
        };

        self.store.save_script(&story).await?;
        self.synthesize_missing(&story).await?;

        Ok(story)
    }

    /// Synthesize per-turn audio unless the directory already holds one
    /// artifact per turn
    ///
    /// When the counts differ every index is (re)synthesized; rewriting a
    /// correct file is harmless and the loop stays resumable after a crash.
    /// The first failing turn aborts the rest of the loop.
    async fn synthesize_missing(&self, story: &GeneratedStory) -> Result<(), PipelineError> {
        let story_id = &story.original.id;
        let existing = self.store.audio_count(story_id).await?;
        if existing == story.dialogue.len() {
            tracing::debug!(story_id = %story_id, "Audio already complete");
            return Ok(());
        }

        tracing::info!(
            story_id = %story_id,
            existing,
            expected = story.dialogue.len(),
            "Synthesizing audio"
        );

        for (index, turn) in story.dialogue.iter().enumerate() {
            let output_path = self.store.audio_path(story_id, index);
            self.tts
                .synthesize(&turn.text, turn.speaker.voice(), &output_path)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DialogueTurn, SeedStory, Speaker};
    use crate::infrastructure::llm::FakeLlmClient;
    use crate::infrastructure::tts::FakeTtsClient;

    const SCRIPT: &str = "Man: I can't believe it\nWoman: Wait, what happened?";

    fn seed(id: &str) -> SeedStory {
        SeedStory {
            id: id.to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            author: "A".to_string(),
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<StoryStore>,
        llm: Arc<FakeLlmClient>,
        tts: Arc<FakeTtsClient>,
        pipeline: StoryPipeline,
    }

    fn fixture(llm: FakeLlmClient, tts: FakeTtsClient) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let seeds = Arc::new(SeedPool::from_seeds(vec![seed("s1")]).unwrap());
        let store = Arc::new(StoryStore::new(dir.path()));
        let llm = Arc::new(llm);
        let tts = Arc::new(tts);
        let pipeline = StoryPipeline::new(
            seeds,
            store.clone(),
            llm.clone(),
            tts.clone(),
            CompletionRequest::default(),
        );
        Fixture {
            _dir: dir,
            store,
            llm,
            tts,
            pipeline,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_generation() {
        let f = fixture(FakeLlmClient::new(SCRIPT), FakeTtsClient::new());

        let story = f.pipeline.generate().await.unwrap();

        assert_eq!(story.original.id, "s1");
        assert_eq!(story.content, SCRIPT);
        assert_eq!(
            story.dialogue,
            vec![
                DialogueTurn::new(Speaker::Man, "I can't believe it"),
                DialogueTurn::new(Speaker::Woman, "Wait, what happened?"),
            ]
        );

        // script and both audio artifacts persisted
        assert!(f.store.script_path("s1").exists());
        assert!(f.store.audio_path("s1", 0).exists());
        assert!(f.store.audio_path("s1", 1).exists());
        assert_eq!(f.llm.calls(), 1);
        assert_eq!(f.tts.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_model_call() {
        let f = fixture(FakeLlmClient::new("unused"), FakeTtsClient::new());

        let cached = GeneratedStory {
            original: seed("s1"),
            content: SCRIPT.to_string(),
            dialogue: parse_dialogue(SCRIPT),
        };
        f.store.save_script(&cached).await.unwrap();

        let story = f.pipeline.generate().await.unwrap();

        assert_eq!(f.llm.calls(), 0);
        assert_eq!(story.dialogue, cached.dialogue);
        assert_eq!(story.content, SCRIPT);
    }

    #[tokio::test]
    async fn test_complete_audio_skips_synthesis() {
        let f = fixture(FakeLlmClient::new("unused"), FakeTtsClient::new());

        let cached = GeneratedStory {
            original: seed("s1"),
            content: SCRIPT.to_string(),
            dialogue: parse_dialogue(SCRIPT),
        };
        f.store.save_script(&cached).await.unwrap();
        tokio::fs::write(f.store.audio_path("s1", 0), b"riff").await.unwrap();
        tokio::fs::write(f.store.audio_path("s1", 1), b"riff").await.unwrap();

        f.pipeline.generate().await.unwrap();
        assert_eq!(f.tts.calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_audio_resynthesizes_every_index() {
        let f = fixture(FakeLlmClient::new("unused"), FakeTtsClient::new());

        let cached = GeneratedStory {
            original: seed("s1"),
            content: SCRIPT.to_string(),
            dialogue: parse_dialogue(SCRIPT),
        };
        f.store.save_script(&cached).await.unwrap();
        // one of two artifacts present, e.g. after a crash mid-synthesis
        tokio::fs::write(f.store.audio_path("s1", 0), b"riff").await.unwrap();

        f.pipeline.generate().await.unwrap();
        assert_eq!(f.tts.calls(), 2);
        assert!(f.store.audio_path("s1", 1).exists());
    }

    #[tokio::test]
    async fn test_malformed_cached_script_regenerates() {
        let f = fixture(FakeLlmClient::new(SCRIPT), FakeTtsClient::new());

        tokio::fs::create_dir_all(f.store.story_dir("s1")).await.unwrap();
        tokio::fs::write(f.store.script_path("s1"), "{broken").await.unwrap();

        let story = f.pipeline.generate().await.unwrap();
        assert_eq!(f.llm.calls(), 1);
        assert_eq!(story.dialogue.len(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let f = fixture(FakeLlmClient::failing(), FakeTtsClient::new());
        let err = f.pipeline.generate().await.unwrap_err();
        assert!(matches!(err, PipelineError::Generation(_)));
    }

    #[tokio::test]
    async fn test_synthesis_failure_aborts_the_run() {
        let f = fixture(FakeLlmClient::new(SCRIPT), FakeTtsClient::failing());

        let err = f.pipeline.generate().await.unwrap_err();
        assert!(matches!(err, PipelineError::Synthesis(_)));
        // first failing turn aborts the loop
        assert_eq!(f.tts.calls(), 1);
        // the script itself is still persisted, so the next run resumes
        assert!(f.store.script_path("s1").exists());
    }

    #[tokio::test]
    async fn test_script_with_no_turns_needs_no_audio() {
        let f = fixture(FakeLlmClient::new("no markers here"), FakeTtsClient::new());
        let story = f.pipeline.generate().await.unwrap();
        assert!(story.dialogue.is_empty());
        assert_eq!(f.tts.calls(), 0);
    }
}
