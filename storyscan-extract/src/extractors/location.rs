// Location extractor
//
// Three patterns, results merged and deduplicated case-insensitively:
//   1. "in / from / near / live in / living in / based in" + optional fillers
//      + capitalized city (up to 3 tokens) + optional ", ST" or ", State"
//   2. "City, ST" with a known state code
//   3. Bare uppercase state codes (ambiguous codes such as OK, IN, ME excluded)
//
// Confidence by distinct count: 0 -> 0.0, 1 -> 0.5, 2 -> 0.75, 3+ -> 0.9

use crate::tables::{is_location_reject, is_state_code, is_state_name, AMBIGUOUS_STATE_CODES};
use crate::types::{ExtractionSource, ExtractorResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const CITY: &str = r"[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*){0,2}";

static PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i:\b(?:live in|living in|based in|in|from|near))\s*,?\s+(?:(?i:um|uh|like|well|you know|actually),?\s+)*({city})(?:,\s*([A-Z]{{2}}\b|[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?))?",
        city = CITY
    ))
    .expect("preposition location pattern")
});

static CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({city}),\s*([A-Z]{{2}})\b", city = CITY)).expect("city state pattern")
});

static STATE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{2})\b").expect("state code pattern"));

/// Extract location candidates with a count-based confidence
pub fn extract_locations(text: &str) -> ExtractorResult<Vec<String>> {
    let mut found: Vec<String> = Vec::new();

    for caps in PREPOSITION_RE.captures_iter(text) {
        let Some(city) = caps.get(1).and_then(|m| leading_place_tokens(m.as_str())) else {
            continue;
        };
        let state = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|s| is_state_code(s) || is_state_name(s));
        push_unique(&mut found, with_state(&city, state));
    }

    for caps in CITY_STATE_RE.captures_iter(text) {
        let (Some(city), Some(code)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if !is_state_code(code.as_str()) {
            continue;
        }
        if let Some(city) = trailing_place_tokens(city.as_str()) {
            push_unique(&mut found, with_state(&city, Some(code.as_str())));
        }
    }

    for caps in STATE_CODE_RE.captures_iter(text) {
        let Some(code) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if !is_state_code(code) || AMBIGUOUS_STATE_CODES.contains(&code) {
            continue;
        }
        let suffix = format!(", {}", code);
        if found.iter().any(|f| f.ends_with(&suffix)) {
            continue;
        }
        push_unique(&mut found, code.to_string());
    }

    let confidence = match found.len() {
        0 => 0.0,
        1 => 0.5,
        2 => 0.75,
        _ => 0.9,
    };
    debug!(count = found.len(), "Location extraction complete");

    if found.is_empty() {
        ExtractorResult::miss(ExtractionSource::LocationPatterns)
    } else {
        ExtractorResult::found(found, confidence, ExtractionSource::LocationPatterns)
    }
}

/// Keep tokens up to the first rejected word ("Denver I" -> "Denver")
fn leading_place_tokens(capture: &str) -> Option<String> {
    let tokens: Vec<&str> = capture
        .split_whitespace()
        .take_while(|t| !is_location_reject(t))
        .collect();
    (!tokens.is_empty()).then(|| tokens.join(" "))
}

/// Keep tokens after the last rejected word ("Hi Austin" -> "Austin")
fn trailing_place_tokens(capture: &str) -> Option<String> {
    let tokens: Vec<&str> = capture.split_whitespace().collect();
    let start = tokens
        .iter()
        .rposition(|t| is_location_reject(t))
        .map_or(0, |i| i + 1);
    let kept = &tokens[start..];
    (!kept.is_empty()).then(|| kept.join(" "))
}

fn with_state(city: &str, state: Option<&str>) -> String {
    match state {
        Some(state) => format!("{}, {}", city, state),
        None => city.to_string(),
    }
}

fn push_unique(found: &mut Vec<String>, candidate: String) {
    let lower = candidate.to_lowercase();
    // "Austin" is subsumed by "Austin, TX"
    if let Some(existing) = found
        .iter_mut()
        .find(|f| f.to_lowercase() == lower || lower.starts_with(&format!("{}, ", f.to_lowercase())))
    {
        if candidate.len() > existing.len() {
            *existing = candidate;
        }
        return;
    }
    if found
        .iter()
        .any(|f| f.to_lowercase().starts_with(&format!("{}, ", lower)))
    {
        return;
    }
    found.push(candidate);
}
