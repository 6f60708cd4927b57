//! Domain Layer
//!
//! Pure story types plus the dialogue parser and speech-text sanitizer.
//! No I/O here; everything is deterministic and unit-testable.

pub mod dialogue;
pub mod sanitizer;
pub mod story;

pub use dialogue::parse_dialogue;
pub use sanitizer::clean_for_speech;
pub use story::{DialogueTurn, GeneratedStory, SeedStory, Speaker, Voice};
