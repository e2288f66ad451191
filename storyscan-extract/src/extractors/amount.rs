// Goal amount extractor
//
// Ordered patterns, first resolved match wins (not best match):
//   1. range            "between $2,000 and $3,000"         -> upper bound   0.90
//   2. dollar sign      "$1,500", "$5k", "$2 thousand"                       0.90
//   3. spelled compound "two thousand five hundred"                          0.80
//   4. spelled dollars  "fifteen hundred dollars", "one hundred fifty bucks" 0.75
//   5. context spelled  "need about twenty-eight hundred"                    0.70
//   6. thousand         "5k", "3 thousand"                                   0.80
//   7. dollars          "800 dollars", "300 bucks"                           0.85
//   8. context numeric  "need 1200", "owe around 950"                        0.60
//
// A match whose value cannot be resolved, or falls outside (0, 10,000,000],
// is discarded and scanning continues. Spelled patterns take an optional
// tail below the unit ("two hundred and fifty"); an unreadable tail adds 0.

use crate::tables::{resolve_spelled, resolve_spelled_prefix, MAX_GOAL_AMOUNT};
use crate::types::{ExtractionSource, ExtractorResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

const NUM: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";
const SPELLED: &str = r"[a-z]+(?:-[a-z]+)?(?:\s+[a-z]+(?:-[a-z]+)?)?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountPattern {
    Range,
    DollarSign,
    SpelledCompound,
    SpelledDollars,
    ContextSpelled,
    Thousand,
    Dollars,
    ContextNumeric,
}

impl AmountPattern {
    const ORDER: [AmountPattern; 8] = [
        Self::Range,
        Self::DollarSign,
        Self::SpelledCompound,
        Self::SpelledDollars,
        Self::ContextSpelled,
        Self::Thousand,
        Self::Dollars,
        Self::ContextNumeric,
    ];

    fn confidence(self) -> f64 {
        match self {
            Self::Range | Self::DollarSign => 0.9,
            Self::SpelledCompound | Self::Thousand => 0.8,
            Self::SpelledDollars => 0.75,
            Self::ContextSpelled => 0.7,
            Self::Dollars => 0.85,
            Self::ContextNumeric => 0.6,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Range => &*RANGE_RE,
            Self::DollarSign => &*DOLLAR_SIGN_RE,
            Self::SpelledCompound => &*SPELLED_COMPOUND_RE,
            Self::SpelledDollars => &*SPELLED_DOLLARS_RE,
            Self::ContextSpelled => &*CONTEXT_SPELLED_RE,
            Self::Thousand => &*THOUSAND_RE,
            Self::Dollars => &*DOLLARS_RE,
            Self::ContextNumeric => &*CONTEXT_NUMERIC_RE,
        }
    }

    /// Resolve a match to a value; `None` discards it
    fn resolve(self, caps: &Captures) -> Option<f64> {
        match self {
            Self::Range => {
                let has_money_marker = caps.get(1).is_some()
                    || caps.get(3).is_some()
                    || caps.get(4).is_some()
                    || caps.get(6).is_some()
                    || caps.get(7).is_some();
                if !has_money_marker {
                    return None;
                }
                let multiplier = if caps.get(6).is_some() { 1000.0 } else { 1.0 };
                parse_number(caps.get(5)?.as_str()).map(|v| v * multiplier)
            }
            Self::DollarSign => {
                let multiplier = if caps.get(2).is_some() { 1000.0 } else { 1.0 };
                parse_number(caps.get(1)?.as_str()).map(|v| v * multiplier)
            }
            Self::SpelledCompound => {
                let thousands = resolve_spelled(caps.get(1)?.as_str())?;
                let hundreds = resolve_spelled(caps.get(2)?.as_str())?;
                if hundreds >= 10 {
                    return None;
                }
                let tail = spelled_tail(caps, 3, 100.0);
                Some(f64::from(thousands) * 1000.0 + f64::from(hundreds) * 100.0 + tail)
            }
            Self::SpelledDollars | Self::ContextSpelled => {
                let base = resolve_spelled(caps.get(1)?.as_str())?;
                let unit = unit_value(caps.get(2)?.as_str());
                Some(f64::from(base) * unit + spelled_tail(caps, 3, unit))
            }
            Self::Thousand => parse_number(caps.get(1)?.as_str()).map(|v| v * 1000.0),
            Self::Dollars | Self::ContextNumeric => parse_number(caps.get(1)?.as_str()),
        }
    }
}

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:between|from)\s+(\$)?\s?({num})\s*(k|thousand)?\s+(?:and|to)\s+(\$)?\s?({num})\s*(k\b|thousand)?(\s+dollars)?",
        num = NUM
    ))
    .expect("range pattern")
});

static DOLLAR_SIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\$\s?({num})(?:\s*(k\b|thousand))?", num = NUM)).expect("dollar pattern")
});

static SPELLED_COMPOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({w})\s+thousand\s+(?:and\s+)?({w})\s+hundred(?:\s+(?:and\s+)?({w}))?\b",
        w = SPELLED
    ))
    .expect("spelled compound pattern")
});

static SPELLED_DOLLARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({w})\s+(hundred|thousand)(?:\s+(?:and\s+)?({w}))?\s+(?:dollars|bucks)\b",
        w = SPELLED
    ))
    .expect("spelled dollars pattern")
});

static CONTEXT_SPELLED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:need|raise|goal of|costs?|owe|about|around)\s+(?:about\s+|around\s+)?({w})\s+(hundred|thousand)(?:\s+(?:and\s+)?({w}))?\b",
        w = SPELLED
    ))
    .expect("context spelled pattern")
});

static THOUSAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({num})\s*(?:k\b|thousand\b)", num = NUM)).expect("thousand pattern")
});

static DOLLARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({num})\s+(?:dollars|bucks)\b", num = NUM)).expect("dollars pattern")
});

static CONTEXT_NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:need|raise|goal(?:\s+of|\s+is)?|cost|costs|owe)\s+(?:about\s+|around\s+)?(\d{3,6})\b")
        .expect("context numeric pattern")
});

fn unit_value(unit: &str) -> f64 {
    if unit == "thousand" {
        1000.0
    } else {
        100.0
    }
}

/// Value of the spelled words after the unit, 0 when absent or not below the unit
fn spelled_tail(caps: &Captures, group: usize, unit: f64) -> f64 {
    caps.get(group)
        .and_then(|tail| resolve_spelled_prefix(tail.as_str()))
        .map(f64::from)
        .filter(|value| *value < unit)
        .unwrap_or(0.0)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn in_bounds(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_GOAL_AMOUNT
}

/// Extract the funding goal amount
pub fn extract_amount(text: &str) -> ExtractorResult<f64> {
    let lower = text.to_lowercase();

    for pattern in AmountPattern::ORDER {
        for caps in pattern.regex().captures_iter(&lower) {
            let Some(value) = pattern.resolve(&caps) else {
                continue;
            };
            if !in_bounds(value) {
                debug!(?pattern, value, "Discarding out-of-range amount");
                continue;
            }
            debug!(?pattern, value, "Goal amount resolved");
            return ExtractorResult::found(value, pattern.confidence(), ExtractionSource::AmountPatterns);
        }
    }
    ExtractorResult::miss(ExtractionSource::AmountPatterns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Option<f64> {
        extract_amount(text).value
    }

    #[test]
    fn test_spelled_hundreds_with_dollars() {
        let result = extract_amount("I need fifteen hundred dollars to fix my car");
        assert_eq!(result.value, Some(1500.0));
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_spelled_tail_after_unit() {
        assert_eq!(amount("one hundred fifty dollars"), Some(150.0));
        assert_eq!(amount("I need about one hundred fifty dollars for my electric bill"), Some(150.0));
        assert_eq!(amount("two thousand five hundred dollars"), Some(2500.0));
        assert_eq!(amount("three thousand two hundred forty-five bucks"), Some(3245.0));
        assert_eq!(amount("we need two hundred and fifty for rent"), Some(250.0));
        assert_eq!(amount("I need five hundred a month"), Some(500.0));
        assert_eq!(amount("it costs two thousand for the deposit"), Some(2000.0));
    }

    #[test]
    fn test_hyphenated_table_entry() {
        assert_eq!(amount("It costs twenty-eight hundred"), Some(2800.0));
        assert_eq!(amount("we need about twenty eight hundred"), Some(2800.0));
    }

    #[test]
    fn test_dollar_sign() {
        assert_eq!(amount("I need $1,500.50 for rent"), Some(1500.5));
        assert_eq!(amount("Goal is $5k"), Some(5000.0));
        assert_eq!(amount("about $ 2 thousand"), Some(2000.0));
    }

    #[test]
    fn test_range_takes_upper_bound() {
        let result = extract_amount("somewhere between $2,000 and $3,000");
        assert_eq!(result.value, Some(3000.0));
        assert_eq!(result.confidence, 0.9);
        assert_eq!(amount("from 2 to 3 thousand"), Some(3000.0));
    }

    #[test]
    fn test_range_without_money_marker_ignored() {
        assert_eq!(amount("I work from 9 to 5 and need 800 dollars"), Some(800.0));
    }

    #[test]
    fn test_first_match_wins() {
        // dollar-sign pattern precedes the "N dollars" pattern
        assert_eq!(amount("I owe 900 dollars but need $400 now"), Some(400.0));
    }

    #[test]
    fn test_spelled_compound() {
        assert_eq!(amount("two thousand five hundred for the deposit"), Some(2500.0));
        assert_eq!(amount("a couple thousand and three hundred"), Some(2300.0));
    }

    #[test]
    fn test_thousand_and_dollars() {
        assert_eq!(amount("around 5k would cover it"), Some(5000.0));
        assert_eq!(amount("300 bucks for groceries"), Some(300.0));
    }

    #[test]
    fn test_context_numeric() {
        let result = extract_amount("we need 1200 for the deposit");
        assert_eq!(result.value, Some(1200.0));
        assert_eq!(result.confidence, 0.6);
    }

    #[test]
    fn test_out_of_bounds_discarded() {
        assert_eq!(amount("$0 down"), None);
        assert_eq!(amount("$50,000,000 or $700"), Some(700.0));
    }

    #[test]
    fn test_unresolvable_spelled_phrase_skipped() {
        assert_eq!(amount("several hundred dollars"), None);
    }

    #[test]
    fn test_no_amount() {
        let result = extract_amount("call me at 5551234567");
        assert!(!result.is_found());
        assert_eq!(result.confidence, 0.0);
    }
}
