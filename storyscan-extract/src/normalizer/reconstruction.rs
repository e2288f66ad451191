// Fragment reconstruction
//
// Merges sentence fragments that speech-to-text split apart:
// - incomplete introductions ("My name is... Sarah.")
// - hanging conjunctions ("I lost my job and. Now I can't pay rent.")
// - ellipsis / dash trail-offs ("I was going to -- pay it.")
//
// Each merge is recorded as "<rule>: '<left>' + '<right>'".

use crate::extractors::text::{strip_token, Segment};

const INTRO_ENDINGS: &[&str] = &["my name is", "my name's", "i am", "i'm", "this is", "call me"];

const HANGING_CONJUNCTIONS: &[&str] = &["and", "but", "so", "because", "or"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeRule {
    IncompleteIntro,
    HangingConjunction,
    FragmentMarker,
}

impl MergeRule {
    fn label(self) -> &'static str {
        match self {
            Self::IncompleteIntro => "incomplete_intro",
            Self::HangingConjunction => "hanging_conjunction",
            Self::FragmentMarker => "fragment_marker",
        }
    }
}

fn ends_with_intro(body: &str) -> bool {
    let lower = body.trim_end_matches(',').trim().to_lowercase();
    INTRO_ENDINGS.iter().any(|intro| {
        lower == *intro
            || lower
                .strip_suffix(intro)
                .map_or(false, |head| head.ends_with(|c: char| !c.is_alphanumeric()))
    })
}

/// Body with its trailing conjunction removed, if it ends in one
fn strip_hanging_conjunction(body: &str) -> Option<String> {
    let trimmed = body.trim_end_matches(',').trim_end();
    let (head, last) = match trimmed.rsplit_once(char::is_whitespace) {
        Some((head, last)) => (head, last),
        None => ("", trimmed),
    };
    let last_word = strip_token(last).to_lowercase();
    if HANGING_CONJUNCTIONS.contains(&last_word.as_str()) {
        Some(head.trim_end().trim_end_matches(',').to_string())
    } else {
        None
    }
}

fn applicable_rule(segment: &Segment) -> Option<MergeRule> {
    if ends_with_intro(&segment.body) {
        Some(MergeRule::IncompleteIntro)
    } else if strip_hanging_conjunction(&segment.body).is_some() {
        Some(MergeRule::HangingConjunction)
    } else if segment.ends_in_fragment_marker() {
        Some(MergeRule::FragmentMarker)
    } else {
        None
    }
}

/// Number of segments ending in a conjunction
pub fn count_hanging_conjunctions(segments: &[Segment]) -> usize {
    segments
        .iter()
        .filter(|s| strip_hanging_conjunction(&s.body).is_some())
        .count()
}

/// Apply merge rules until none fires; returns rebuilt text and the merge log
pub fn reconstruct(mut segments: Vec<Segment>) -> (String, Vec<String>) {
    let mut log = Vec::new();
    let mut i = 0;

    while i + 1 < segments.len() {
        let Some(rule) = applicable_rule(&segments[i]) else {
            i += 1;
            continue;
        };

        let next = segments.remove(i + 1);
        let current = &mut segments[i];
        log.push(format!(
            "{}: '{}' + '{}'",
            rule.label(),
            current.render(),
            next.render()
        ));

        current.body = match rule {
            MergeRule::HangingConjunction => {
                let head = strip_hanging_conjunction(&current.body).unwrap_or_default();
                if head.is_empty() {
                    next.body
                } else {
                    format!("{}, {}", head, next.body)
                }
            }
            MergeRule::IncompleteIntro | MergeRule::FragmentMarker => {
                format!("{} {}", current.body, next.body)
            }
        };
        current.terminator = next.terminator;
        tracing::trace!(rule = rule.label(), merged = %current.body, "Reconstructed fragment");
    }

    let text = segments
        .iter()
        .map(Segment::render)
        .collect::<Vec<_>>()
        .join(" ");
    (text, log)
}
