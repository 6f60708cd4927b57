//! Text Sanitizer
//!
//! Strips markup, URLs and emoji from dialogue text before speech
//! synthesis. The stored dialogue text is never mutated; cleaning is
//! applied to a copy at synthesis time.

use std::sync::LazyLock;

use regex::Regex;

/// http/https/ftp URLs
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?|ftp)://\S+").expect("valid url regex"));

/// Bracketed spans, e.g. citations like [1] or [source]
static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid bracket regex"));

/// Emoji ranges the speech engine tends to choke on
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]",
    )
    .expect("valid emoji regex")
});

/// Symbols that should not be spoken
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#><{}]").expect("valid symbol regex"));

/// Runs of whitespace, including newlines
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Clean text for the speech engine
///
/// Removes, in order: URLs, inline-code backticks, emphasis markers,
/// underscores (replaced with spaces so identifiers stay readable),
/// bracketed spans, emoji, disruptive symbols; then collapses whitespace
/// runs to a single space and trims. Pure and idempotent. May return an
/// empty string, which callers must treat as "nothing to say".
pub fn clean_for_speech(text: &str) -> String {
    let cleaned = URL_RE.replace_all(text, "");
    let cleaned = cleaned.replace('`', "");
    let cleaned = cleaned.replace('*', "");
    let cleaned = cleaned.replace('_', " ");
    let cleaned = BRACKET_RE.replace_all(&cleaned, "");
    let cleaned = EMOJI_RE.replace_all(&cleaned, "");
    let cleaned = SYMBOL_RE.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}
