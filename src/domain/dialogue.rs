//! Dialogue Parser
//!
//! Turns a raw speaker-tagged transcript into ordered dialogue turns.
//!
//! A `Tag:` label at the start of a line opens a new block that runs until
//! the next label or end of input. Only `Man:` / `Woman:` (case-insensitive)
//! blocks become turns; blocks under any other tag are discarded, as is any
//! text before the first label. Pure and deterministic, no I/O.

use std::sync::LazyLock;

use regex::Regex;

use super::story::{DialogueTurn, Speaker};

/// Speaker-tag marker at a line boundary, e.g. "Man:" or "Narrator:"
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([A-Za-z]+):").expect("valid tag regex"));

/// Parse a raw transcript into dialogue turns
///
/// Turns whose text trims to empty are dropped and do not occupy an index.
/// Input with no valid markers yields an empty sequence.
pub fn parse_dialogue(input: &str) -> Vec<DialogueTurn> {
    let markers: Vec<(usize, usize, &str)> = TAG_RE
        .captures_iter(input)
        .map(|caps| {
            let whole = caps.get(0).expect("match");
            let tag = caps.get(1).expect("tag group");
            (whole.start(), whole.end(), tag.as_str())
        })
        .collect();

    let mut turns = Vec::new();

    for (i, &(_, text_start, tag)) in markers.iter().enumerate() {
        let speaker = if tag.eq_ignore_ascii_case("man") {
            Speaker::Man
        } else if tag.eq_ignore_ascii_case("woman") {
            Speaker::Woman
        } else {
            continue;
        };

        let text_end = markers
            .get(i + 1)
            .map(|&(start, _, _)| start)
            .unwrap_or(input.len());

        let text = input[text_start..text_end].trim();
        if text.is_empty() {
            continue;
        }

        turns.push(DialogueTurn::new(speaker, text));
    }

    turns
}
