//! Story Domain Types
//!
//! Core data model: seed stories, dialogue turns and generated stories.

use serde::{Deserialize, Serialize};

/// Seed story loaded from the stories directory
///
/// Immutable input. The `id` doubles as the on-disk cache key for
/// everything generated from this seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
}

/// Speaker of a dialogue turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Man,
    Woman,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Man => "man",
            Speaker::Woman => "woman",
        }
    }

    /// Voice model used to narrate this speaker
    pub fn voice(&self) -> Voice {
        match self {
            Speaker::Man => Voice::Male,
            Speaker::Woman => Voice::Female,
        }
    }
}

/// TTS voice selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Male,
    Female,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Male => "male",
            Voice::Female => "female",
        }
    }
}

/// One utterance within a generated dialogue
///
/// `text` is never empty or whitespace-only; the parser drops such turns.
/// `audio_url` stays unset on disk and is resolved per-request by the HTTP
/// layer from the story id and turn index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
    #[serde(rename = "audioUrl", default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl DialogueTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            audio_url: None,
        }
    }
}

/// Fully generated story: the unit of work and the unit of caching
///
/// `content` keeps the raw model output for auditing. `dialogue` is derived
/// deterministically from `content`, in speaking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStory {
    pub original: SeedStory,
    pub content: String,
    pub dialogue: Vec<DialogueTurn>,
}

impl GeneratedStory {
    /// Copy of this story with per-turn audio URLs resolved against a base URL
    ///
    /// URL shape: `<base>/stories/<storyId>/<turnIndex>.wav`
    pub fn with_audio_urls(&self, base_url: &str) -> GeneratedStory {
        let base = base_url.trim_end_matches('/');
        let mut story = self.clone();
        for (index, turn) in story.dialogue.iter_mut().enumerate() {
            turn.audio_url = Some(format!(
                "{}/stories/{}/{}.wav",
                base, self.original.id, index
            ));
        }
        story
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> SeedStory {
        SeedStory {
            id: "s1".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            author: "A".to_string(),
        }
    }

    #[test]
    fn test_speaker_voice_mapping() {
        assert_eq!(Speaker::Man.voice(), Voice::Male);
        assert_eq!(Speaker::Woman.voice(), Voice::Female);
    }

    #[test]
    fn test_speaker_serializes_lowercase() {
        let json = serde_json::to_string(&Speaker::Man).unwrap();
        assert_eq!(json, "\"man\"");
        let back: Speaker = serde_json::from_str("\"woman\"").unwrap();
        assert_eq!(back, Speaker::Woman);
    }

    #[test]
    fn test_turn_wire_field_names() {
        let mut turn = DialogueTurn::new(Speaker::Woman, "hi");
        turn.audio_url = Some("http://x/stories/s1/0.wav".to_string());
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["speaker"], "woman");
        assert_eq!(json["audioUrl"], "http://x/stories/s1/0.wav");
    }

    #[test]
    fn test_turn_deserializes_without_audio_url() {
        let turn: DialogueTurn =
            serde_json::from_str(r#"{"speaker":"man","text":"hey"}"#).unwrap();
        assert_eq!(turn.audio_url, None);
    }

    #[test]
    fn test_with_audio_urls() {
        let story = GeneratedStory {
            original: seed(),
            content: String::new(),
            dialogue: vec![
                DialogueTurn::new(Speaker::Man, "a"),
                DialogueTurn::new(Speaker::Woman, "b"),
            ],
        };

        let resolved = story.with_audio_urls("http://localhost:4000/");
        assert_eq!(
            resolved.dialogue[0].audio_url.as_deref(),
            Some("http://localhost:4000/stories/s1/0.wav")
        );
        assert_eq!(
            resolved.dialogue[1].audio_url.as_deref(),
            Some("http://localhost:4000/stories/s1/1.wav")
        );
        // source story is untouched
        assert_eq!(story.dialogue[0].audio_url, None);
    }
}
