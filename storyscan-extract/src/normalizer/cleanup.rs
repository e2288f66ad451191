// Artifact and filler removal
//
// Emotional/bracketed artifacts and standard disfluency fillers are always
// removed. Conversational fillers are removed only on request and only when
// frequent enough to be noise rather than content.

use crate::extractors::text::{count_phrase, strip_token, word_count};
use once_cell::sync::Lazy;
use regex::Regex;

/// `*sigh*`, `[crying]`, `{inaudible}`, short parentheticals without digits
static ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*[^*\n]{1,80}\*|\[[^\]\n]{1,80}\]|\{[^}\n]{1,80}\}|\([^()\d\n]{1,30}\)")
        .expect("artifact pattern")
});

/// "er"/"erm" only match with a lowercase tail so "ER" (emergency room) survives
const FILLER_ALTERNATION: &str = r"(?i:u+m+|u+h+|a+h+|h+m+|m+h+m+|m{2,})|[Ee]+r+m*";

/// Standard filler with an optional leading comma and trailing comma
static FILLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:,\s*)?\b({})\b,?", FILLER_ALTERNATION)).expect("filler pattern")
});

static FILLER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:{})$", FILLER_ALTERNATION)).expect("filler token pattern")
});

pub const CONVERSATIONAL_FILLERS: &[&str] = &[
    "you know",
    "i mean",
    "kind of",
    "sort of",
    "so yeah",
    "like",
    "basically",
    "actually",
    "literally",
    "right",
];

static CONVERSATIONAL_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    CONVERSATIONAL_FILLERS
        .iter()
        .map(|phrase| {
            let pattern = format!(r"(?i)(?:,\s*)?\b{}\b,?", regex::escape(phrase));
            (*phrase, Regex::new(&pattern).expect("conversational filler pattern"))
        })
        .collect()
});

/// Frequency a conversational filler must exceed before it is removed
const CONVERSATIONAL_THRESHOLD: f64 = 0.05;

/// Remove emotional/bracketed artifacts; returns the text and how many were removed
pub fn remove_artifacts(text: &str) -> (String, usize) {
    let count = ARTIFACT_RE.find_iter(text).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (ARTIFACT_RE.replace_all(text, " ").into_owned(), count)
}

/// Filler statistics over the token stream
///
/// Standard and conversational fillers both count; a multi-word
/// conversational phrase ("you know") is one filler spanning two tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillerScan {
    pub fillers: usize,
    /// Runs of two or more consecutive fillers
    pub runs: usize,
}

pub fn scan_fillers(text: &str) -> FillerScan {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let phrases = conversational_marks(&tokens);

    let mut scan = FillerScan::default();
    let mut run = 0usize;
    for (token, mark) in tokens.iter().zip(&phrases) {
        let starts_filler = match mark {
            PhraseMark::Start => true,
            PhraseMark::Continued => continue,
            PhraseMark::None => is_filler(token),
        };
        if starts_filler {
            scan.fillers += 1;
            run += 1;
            if run == 2 {
                scan.runs += 1;
            }
        } else {
            run = 0;
        }
    }
    scan
}

/// Tokens of `text` that belong to a conversational filler phrase
pub fn conversational_word_count(text: &str) -> usize {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    conversational_marks(&tokens)
        .iter()
        .filter(|m| **m != PhraseMark::None)
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhraseMark {
    None,
    Start,
    Continued,
}

fn conversational_marks(tokens: &[&str]) -> Vec<PhraseMark> {
    let words: Vec<String> = tokens.iter().map(|t| strip_token(t).to_lowercase()).collect();
    let mut marks = vec![PhraseMark::None; words.len()];

    let mut i = 0;
    while i < words.len() {
        let matched = CONVERSATIONAL_FILLERS.iter().find_map(|phrase| {
            let parts: Vec<&str> = phrase.split(' ').collect();
            let end = i + parts.len();
            (end <= words.len() && words[i..end].iter().zip(&parts).all(|(w, p)| w == p))
                .then_some(parts.len())
        });
        match matched {
            Some(len) => {
                marks[i] = PhraseMark::Start;
                marks[i + 1..i + len].iter_mut().for_each(|m| *m = PhraseMark::Continued);
                i += len;
            }
            None => i += 1,
        }
    }
    marks
}

fn is_filler(token: &str) -> bool {
    FILLER_TOKEN_RE.is_match(strip_token(token))
}

/// Remove standard fillers, appending each removed word (lowercased) to `removed`
pub fn remove_standard_fillers(text: &str, removed: &mut Vec<String>) -> String {
    for caps in FILLER_RE.captures_iter(text) {
        if let Some(word) = caps.get(1) {
            removed.push(word.as_str().to_lowercase());
        }
    }
    FILLER_RE.replace_all(text, " ").into_owned()
}

/// Remove conversational fillers whose frequency exceeds the threshold
///
/// Frequency is measured against the word count of `text` as given (after
/// standard-filler removal), so inserting standard fillers never changes
/// which conversational phrases are stripped.
pub fn remove_conversational_fillers(text: &str, removed: &mut Vec<String>) -> String {
    let total_words = word_count(text).max(1) as f64;
    let lower = text.to_lowercase();
    let mut out = text.to_string();

    for (phrase, re) in CONVERSATIONAL_RES.iter() {
        let occurrences = count_phrase(&lower, phrase);
        if occurrences == 0 {
            continue;
        }
        if occurrences as f64 / total_words > CONVERSATIONAL_THRESHOLD {
            tracing::debug!(
                phrase = *phrase,
                occurrences,
                "Removing frequent conversational filler"
            );
            for _ in 0..occurrences {
                removed.push((*phrase).to_string());
            }
            out = re.replace_all(&out, " ").into_owned();
        }
    }
    out
}
