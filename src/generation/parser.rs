//! Lexical extraction of embedded source files from model text
//!
//! Model output wraps source files in fenced code blocks tagged with a
//! language (```` ```html ````, ```` ```css ````, ```` ```js ````). The
//! parser pulls those blocks out with compiled-once patterns; it is not a
//! language parser, and malformed or missing fences degrade gracefully
//! instead of raising. Parsing is a pure function of its inputs — there is
//! deliberately no cached parser instance to share or invalidate.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::generation::{GenerationError, OutputKind, ParsedFileSet};

static HTML_FENCE: Lazy<Regex> = Lazy::new(|| fence_pattern("html"));
static CSS_FENCE: Lazy<Regex> = Lazy::new(|| fence_pattern("css"));
static JS_FENCE: Lazy<Regex> = Lazy::new(|| fence_pattern("js|javascript"));

fn fence_pattern(tag: &str) -> Regex {
    // (?is): case-insensitive tag match, dot spans lines; non-greedy body
    // so the first closing fence ends the block.
    Regex::new(&format!(r"(?is)```[ \t]*(?:{tag})[ \t]*\r?\n(.*?)```"))
        .expect("fence pattern is a valid regex")
}

/// First fenced block for `pattern`, trimmed; `None` when absent or blank.
fn extract_block(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse one completed model text into a [`ParsedFileSet`] for `kind`.
///
/// `FrameworkProject` content is scaffolded rather than parsed, so that
/// kind yields an empty set; the orchestrator routes its text elsewhere.
pub fn parse(text: &str, kind: OutputKind) -> Result<ParsedFileSet, GenerationError> {
    match kind {
        OutputKind::SingleFile => parse_single_file(text),
        OutputKind::MultiFile => parse_multi_file(text),
        OutputKind::FrameworkProject => Ok(ParsedFileSet::default()),
    }
}

/// Single HTML document: first ```` ```html ```` block wins; with no fence
/// at all the entire trimmed text is taken verbatim. Only genuinely empty
/// input fails.
fn parse_single_file(text: &str) -> Result<ParsedFileSet, GenerationError> {
    let html = extract_block(&HTML_FENCE, text)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .ok_or_else(GenerationError::primary_empty)?;

    Ok(ParsedFileSet {
        html: Some(html),
        ..ParsedFileSet::default()
    })
}

/// HTML/CSS/JS triplet: each slot is populated independently from its own
/// fenced block (first match of each wins). Absent slots stay empty — they
/// are never defaulted to the whole text — but the primary `html` slot
/// must end up non-empty.
fn parse_multi_file(text: &str) -> Result<ParsedFileSet, GenerationError> {
    let files = ParsedFileSet {
        html: extract_block(&HTML_FENCE, text),
        css: extract_block(&CSS_FENCE, text),
        js: extract_block(&JS_FENCE, text),
    };

    if !files.has_primary() {
        return Err(GenerationError::primary_empty());
    }
    Ok(files)
}
