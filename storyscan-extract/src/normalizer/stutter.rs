// Stutter and elongation collapse
//
// "i i i need" -> "i need", "I-I-I" -> "I", "w-w-want" -> "want", "soooo" -> "so"

/// Split a token into its core and trailing punctuation
fn split_trailing(token: &str) -> (&str, &str) {
    let core = token.trim_end_matches(|c: char| !c.is_alphanumeric());
    (core, &token[core.len()..])
}

fn ends_sentence(trailing: &str) -> bool {
    trailing.contains(['.', '!', '?', '…'])
}

/// Collapse consecutive repeated tokens and hyphen stutters
///
/// Returns the rewritten text and the number of stutter runs collapsed.
/// Tokens containing digits never collapse (`555 555 1234` is a phone number).
pub fn collapse_stutters(text: &str) -> (String, usize) {
    let mut out: Vec<String> = Vec::new();
    let mut previous_key: Option<String> = None;
    let mut in_run = false;
    let mut count = 0;

    for raw in text.split_whitespace() {
        let token = match collapse_hyphen_stutter(raw) {
            Some(collapsed) => {
                count += 1;
                collapsed
            }
            None => raw.to_string(),
        };

        let (core, trailing) = split_trailing(&token);
        let key = core.to_lowercase();
        let collapsible = !key.is_empty() && !key.chars().any(|c| c.is_ascii_digit());

        if collapsible && previous_key.as_deref() == Some(key.as_str()) {
            if !in_run {
                count += 1;
                in_run = true;
            }
            if let Some(last) = out.last_mut() {
                if !trailing.is_empty() && !last.ends_with(trailing) {
                    last.push_str(trailing);
                }
            }
            if ends_sentence(trailing) {
                previous_key = None;
            }
            continue;
        }

        in_run = false;
        previous_key = if collapsible && !ends_sentence(trailing) {
            Some(key)
        } else {
            None
        };
        out.push(token);
    }

    (out.join(" "), count)
}

/// `I-I-I` → `I`, `w-w-want` → `want`; `so-so` and `re-read` are left alone
fn collapse_hyphen_stutter(token: &str) -> Option<String> {
    let (core, trailing) = split_trailing(token);
    if !core.contains('-') {
        return None;
    }
    let parts: Vec<&str> = core.split('-').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty() || !p.chars().all(char::is_alphabetic)) {
        return None;
    }

    let first = parts[0].to_lowercase();
    let all_equal = parts.iter().all(|p| p.to_lowercase() == first);
    if all_equal && (parts.len() >= 3 || first.chars().count() == 1) {
        return Some(format!("{}{}", parts[0], trailing));
    }

    // Single-letter false starts before the full word
    let last = parts[parts.len() - 1];
    let last_lower = last.to_lowercase();
    let prefixes = &parts[..parts.len() - 1];
    let false_starts = prefixes.iter().all(|p| {
        p.chars().count() == 1 && last_lower.starts_with(&p.to_lowercase()) && last.chars().count() > 1
    });
    if false_starts {
        return Some(format!("{}{}", last, trailing));
    }
    None
}

/// Collapse any alphabetic character repeated 3+ times to a single occurrence
///
/// Returns the rewritten text and the number of tokens changed. Emails, URLs
/// and tokens with digits are untouched.
pub fn collapse_elongations(text: &str) -> (String, usize) {
    let mut count = 0;
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|token| {
            let (core, _) = split_trailing(token);
            if core.contains(['@', '.', '/']) || core.chars().any(|c| c.is_ascii_digit()) {
                return token.to_string();
            }
            let collapsed = collapse_token(token);
            if collapsed != token {
                count += 1;
            }
            collapsed
        })
        .collect();
    (tokens.join(" "), count)
}

fn collapse_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut j = i + 1;
        if c.is_alphabetic() {
            let lower: String = c.to_lowercase().collect();
            while j < chars.len() && chars[j].to_lowercase().collect::<String>() == lower {
                j += 1;
            }
        }
        if j - i >= 3 {
            out.push(c);
        } else {
            out.extend(&chars[i..j]);
        }
        i = j;
    }
    out
}
