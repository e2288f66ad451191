//! Sentence segmentation and phrase matching helpers
//!
//! Phrase matching is word-boundary aware: "rent" matches "rent money" but
//! not "parents" or "current".

/// Sentence body plus the terminator that ended it ("" for trailing text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub body: String,
    pub terminator: String,
}

impl Segment {
    /// Ellipsis or dash terminators mark a trailed-off fragment
    pub fn ends_in_fragment_marker(&self) -> bool {
        matches!(self.terminator.as_str(), "..." | "…" | "--" | "—")
    }

    pub fn render(&self) -> String {
        format!("{}{}", self.body, self.terminator)
    }
}

/// Split text into sentence segments
///
/// Terminators: `...` (any run of 3+ dots), `…`, `--`, `—`, and runs of `.!?`
/// followed by whitespace or end of text. A period inside a token
/// (`me@mail.com`, `$1,500.50`) does not split.
pub fn split_segments(text: &str) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut body = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let terminator = if c == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            let end = run_end(&chars, i, |ch| ch == '.');
            Some(("...".to_string(), end))
        } else if c == '…' || c == '—' {
            Some((c.to_string(), i + 1))
        } else if c == '-' && chars.get(i + 1) == Some(&'-') {
            let end = run_end(&chars, i, |ch| ch == '-');
            Some(("--".to_string(), end))
        } else if matches!(c, '.' | '!' | '?') {
            let end = run_end(&chars, i, |ch| matches!(ch, '.' | '!' | '?'));
            if end == chars.len() || chars[end].is_whitespace() {
                Some((chars[i..end].iter().collect(), end))
            } else {
                None
            }
        } else {
            None
        };

        match terminator {
            Some((term, next)) => {
                push_segment(&mut segments, &body, term);
                body.clear();
                i = next;
            }
            None => {
                body.push(c);
                i += 1;
            }
        }
    }
    push_segment(&mut segments, &body, String::new());
    segments
}

fn run_end(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

fn push_segment(segments: &mut Vec<Segment>, body: &str, terminator: String) {
    let body = body.trim();
    if body.is_empty() {
        return;
    }
    segments.push(Segment {
        body: body.to_string(),
        terminator,
    });
}

/// Split text into rendered sentences (terminators kept)
pub fn split_sentences(text: &str) -> Vec<String> {
    split_segments(text).iter().map(Segment::render).collect()
}

/// Count whitespace-separated tokens containing at least one letter or digit
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .count()
}

/// Trim surrounding punctuation from a token, keeping inner apostrophes and hyphens
pub fn strip_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Count word-bounded occurrences of a lowercase phrase in lowercased text
pub fn count_phrase(haystack: &str, phrase: &str) -> usize {
    phrase_positions(haystack, phrase).len()
}

pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    !phrase_positions(haystack, phrase).is_empty()
}

/// Phrases from `phrases` present in `haystack`, in table order
pub fn matched_phrases<'a>(haystack: &str, phrases: &[&'a str]) -> Vec<&'a str> {
    phrases
        .iter()
        .copied()
        .filter(|p| contains_phrase(haystack, p))
        .collect()
}

/// Replace every word-bounded occurrence of `phrase` with spaces
pub fn blank_phrase(haystack: &str, phrase: &str) -> String {
    let mut out = haystack.to_string();
    for start in phrase_positions(haystack, phrase) {
        out.replace_range(start..start + phrase.len(), &" ".repeat(phrase.len()));
    }
    out
}

fn phrase_positions(haystack: &str, phrase: &str) -> Vec<usize> {
    if phrase.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(phrase)
        .filter(|(start, _)| {
            let before_ok = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = haystack[start + phrase.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .map(|(start, _)| start)
        .collect()
}
