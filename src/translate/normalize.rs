//! Script heuristics and translation post-processing.
//! Decides when a string can skip translation, and trims verbose
//! food-database names down to a short display phrase.
//!
//! The heuristics are tuned for an English provider and a Japanese display
//! language. Callers go through these functions only, so swapping in a real
//! language detector touches nothing else.

use std::sync::LazyLock;

use regex::Regex;

/// ASCII letters, digits, whitespace and basic punctuation.
static PROVIDER_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s.,!?-]*$").unwrap());

/// Digits, whitespace and punctuation only.
static NUMERIC_OR_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\p{P}]*$").unwrap());

/// Kana or kanji anywhere in the string.
static DISPLAY_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Hiragana}\p{Katakana}\p{Han}]").unwrap());

static ASCII_LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());

/// Innermost parenthesized clause, ASCII or full-width, with the whitespace
/// before it. Applied repeatedly to peel nested clauses.
static PAREN_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[(（][^()（）]*[)）]").unwrap());

/// An opening parenthesis never closed: drop it and the rest of the string.
static UNCLOSED_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[(（].*$").unwrap());

const COMMAS: [char; 3] = [',', '、', '，'];

/// Maximum words kept by [`post_process_translation`].
const MAX_WORDS: usize = 2;

/// True when `text` already reads as provider-language input and can be sent as-is.
pub fn looks_like_provider_language(text: &str) -> bool {
    PROVIDER_TEXT.is_match(text)
}

/// True for empty, whitespace-only, or purely numeric/punctuation strings.
pub fn needs_no_translation(text: &str) -> bool {
    text.trim().is_empty() || NUMERIC_OR_PUNCT.is_match(text)
}

/// True when `text` already contains display-language script.
pub fn contains_display_script(text: &str) -> bool {
    DISPLAY_SCRIPT.is_match(text)
}

/// True when `text` is made only of ASCII letters and whitespace.
pub fn is_ascii_letters_only(text: &str) -> bool {
    ASCII_LETTERS.is_match(text)
}

/// Shorten a raw translation to a display-friendly phrase.
///
/// Drops parenthesized clauses, everything after the first comma, and keeps at
/// most the first two words. Falls back to the trimmed input if nothing is left.
pub fn post_process_translation(text: &str) -> String {
    let without_parens = strip_parenthesized(text);
    let head = without_parens
        .split(|c| COMMAS.contains(&c))
        .next()
        .unwrap_or_default()
        .trim();

    let words: Vec<&str> = head.split_whitespace().collect();
    let shortened = if words.len() > MAX_WORDS {
        words[..MAX_WORDS].join(" ")
    } else {
        head.to_string()
    };

    if shortened.is_empty() {
        return text.trim().to_string();
    }
    shortened
}

fn strip_parenthesized(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let stripped = PAREN_CLAUSE.replace_all(&out, "").into_owned();
        if stripped.len() == out.len() {
            break;
        }
        out = stripped;
    }
    UNCLOSED_PAREN.replace(&out, "").into_owned()
}
