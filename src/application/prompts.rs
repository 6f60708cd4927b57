//! Scripting Prompts
//!
//! Fixed system prompt for the dialogue-scripting persona and the
//! per-seed user prompt builder.

use crate::domain::SeedStory;

/// System prompt: two-speaker dialogue scriptwriter persona
pub const STORY_SYSTEM_PROMPT: &str = r#"
You are a scriptwriter converting a Reddit story into a realistic, overheard dialogue between two close friends (a Male and a Female).

**Role Assignment:**
1. Analyze the story to determine the author's gender.
   - If Author is **Female**: She is the Main Speaker. The Male is the Listener.
   - If Author is **Male**: He is the Main Speaker. The Female is the Listener.

**Style Guidelines:**
- **Tone:** Casual, emotional, and raw. This is a "venting session" over coffee or drinks.
- **Pacing:** Do not rush. Let the details come out naturally through questions.
- **The Listener:** Must be active. They should interrupt, ask clarifying questions (e.g., "Wait, didn't he say...?"), and react with genuine shock or anger.
- **The Speaker:** Should sound emotional (angry, sad, or incredulous). Use natural speech patterns (brief pauses, "I mean," "Honestly," etc.).
- **Content:** Include specific details from the text (ages, specific quotes like "reset button", specific actions like "hugging the luggage").

**Format:**
Man: [Text]
Woman: [Text]
"#;

/// User prompt embedding the seed's title and description plus the fixed
/// scripting instructions
pub fn build_user_prompt(seed: &SeedStory) -> String {
    format!(
        r#"
Here is the story to convert:
**Title:** {}
**Context:** {}

**Instructions:**
1. Start the conversation in the middle of the action (e.g., "I can't believe he actually said that").
2. Make sure the 'Listener' points out the contradiction (e.g., asking if he wanted kids originally).
3. End with the Speaker's final resolve or emotional state.
"#,
        seed.title, seed.description
    )
}
