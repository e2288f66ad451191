// Contact extractor (emails and US phone numbers)
//
// Phones are canonicalized so repeated mentions in different formats collapse:
//   5551234567, (555) 123-4567, 555.123.4567  -> (555) 123-4567
//   +1 555 123 4567, 1-555-123-4567           -> +1 (555) 123-4567
// Deduplication is on the 10-digit core; the first representation seen wins.

use crate::types::ContactCandidates;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").expect("phone pattern")
});

/// Extract deduplicated emails and canonical phone numbers
pub fn extract_contacts(text: &str) -> ContactCandidates {
    let mut candidates = ContactCandidates::default();

    let mut seen_emails = HashSet::new();
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().trim_end_matches('.').to_lowercase();
        if seen_emails.insert(email.clone()) {
            candidates.emails.push(email);
        }
    }

    let mut seen_cores = HashSet::new();
    for m in PHONE_RE.find_iter(text) {
        if digit_adjacent(text, m.start(), m.end()) {
            continue;
        }
        let Some((core, canonical)) = canonicalize_phone(m.as_str()) else {
            continue;
        };
        if seen_cores.insert(core) {
            candidates.phones.push(canonical);
        }
    }

    debug!(
        emails = candidates.emails.len(),
        phones = candidates.phones.len(),
        "Contact extraction complete"
    );
    candidates
}

/// A digit directly before or after the match means it is part of a longer number
fn digit_adjacent(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.map_or(false, |c| c.is_ascii_digit()) || after.map_or(false, |c| c.is_ascii_digit())
}

/// Returns the 10-digit core and the canonical display form
fn canonicalize_phone(raw: &str) -> Option<(String, String)> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let (has_country_code, core) = match digits.len() {
        10 => (false, digits),
        11 if digits.starts_with('1') => (true, digits[1..].to_string()),
        _ => return None,
    };

    let formatted = format!("({}) {}-{}", &core[0..3], &core[3..6], &core[6..10]);
    let canonical = if has_country_code {
        format!("+1 {}", formatted)
    } else {
        formatted
    };
    Some((core, canonical))
}
