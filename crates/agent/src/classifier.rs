//! Pattern classifier — maps an utterance to an [`Intent`].
//!
//! Pure functions over the input string. Patterns are compiled once.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// What the user is asking for in one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// A weather request, with the location if one could be extracted
    Weather { location: Option<String> },
    /// A question about the user's own personal data
    PersonalDataRefusal,
    /// A request for help with something harmful
    HarmRefusal,
    /// Anything else
    Generic,
}

impl Intent {
    /// Stable label for logs and usage counters.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weather { .. } => "weather",
            Self::PersonalDataRefusal => "personal_data_refusal",
            Self::HarmRefusal => "harm_refusal",
            Self::Generic => "generic",
        }
    }
}

static WEATHER_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bweather\s+in\s+([A-Za-z][A-Za-z\s'-]+)\??$").expect("valid pattern")
});
static TRAILING_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s+([A-Za-z][A-Za-z\s'-]+)\??$").expect("valid pattern")
});
static BIRTHPLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwhat\s+city\s+was\s+i\s+born\s+in\b").expect("valid pattern")
});
static HARM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhack\b|\bhacking\b|\bwithout permission\b").expect("valid pattern")
});

/// Classify an utterance.
///
/// Weather is checked first and wins even when a refusal pattern also
/// matches.
pub fn classify(utterance: &str) -> Intent {
    let text = utterance.trim();

    if text.to_lowercase().contains("weather") {
        return Intent::Weather {
            location: extract_location(text),
        };
    }
    if is_word_match(&BIRTHPLACE, text) {
        return Intent::PersonalDataRefusal;
    }
    if is_word_match(&HARM, text) {
        return Intent::HarmRefusal;
    }
    Intent::Generic
}

/// Best-effort location extraction from the end of an utterance.
///
/// Tries `weather in <place>` first, then any trailing `in <place>`.
pub fn extract_location(utterance: &str) -> Option<String> {
    let text = utterance.trim();
    [&*WEATHER_IN, &*TRAILING_IN]
        .into_iter()
        .find_map(|re| capture_after_word_start(re, text))
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
}

// regex-lite's `\b` only knows ASCII word characters, so a match next to a
// letter like `é` has to be re-checked here.

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `index` sits between a word character and a non-word character.
fn is_word_boundary(text: &str, index: usize) -> bool {
    let before = text[..index].chars().next_back().is_some_and(is_word_char);
    let after = text[index..].chars().next().is_some_and(is_word_char);
    before != after
}

/// A match of `re` that starts and ends on Unicode word boundaries.
fn is_word_match(re: &Regex, text: &str) -> bool {
    re.find_iter(text)
        .any(|m| is_word_boundary(text, m.start()) && is_word_boundary(text, m.end()))
}

/// First capture group of the leftmost match of `re` that starts on a
/// Unicode word boundary.
fn capture_after_word_start<'h>(re: &Regex, text: &'h str) -> Option<&'h str> {
    let mut from = 0;
    while let Some(caps) = re.captures_at(text, from) {
        let whole = caps.get(0)?;
        if is_word_boundary(text, whole.start()) {
            return caps.get(1).map(|m| m.as_str());
        }
        let skip = text[whole.start()..].chars().next().map_or(1, char::len_utf8);
        from = whole.start() + skip;
    }
    None
}
