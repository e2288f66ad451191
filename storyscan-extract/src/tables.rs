//! Immutable configuration tables
//!
//! Keyword lists, urgency tiers, category amount ranges, stoplists and the
//! spelled-number table. Everything here is data, compiled once and shared
//! read-only by every extractor and by the coordination engine.
//!
//! # Matching
//!
//! All phrases are lowercase and matched on word boundaries against lowercased
//! text (see [`crate::extractors::text::count_phrase`]).

use crate::types::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

// ============================================================================
// Category keywords
// ============================================================================

/// Category → keyword list, in priority order
pub static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Safety,
        &[
            "abuse",
            "abusive",
            "violence",
            "violent",
            "threat",
            "threats",
            "threatened",
            "threatening",
            "unsafe",
            "danger",
            "dangerous",
            "stalking",
            "stalker",
            "assault",
            "harassment",
            "domestic violence",
            "restraining order",
        ],
    ),
    (
        Category::Legal,
        &[
            "lawyer",
            "attorney",
            "court",
            "legal",
            "lawsuit",
            "immigration",
            "deportation",
            "bail",
            "arrested",
            "probation",
            "legal fees",
            "custody battle",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "medical",
            "hospital",
            "surgery",
            "doctor",
            "medication",
            "medicine",
            "prescription",
            "treatment",
            "health",
            "illness",
            "sick",
            "cancer",
            "diagnosis",
            "clinic",
            "dental",
            "medical bills",
            "emergency room",
            "er",
            "health insurance",
        ],
    ),
    (
        Category::Housing,
        &[
            "rent",
            "eviction",
            "evicted",
            "landlord",
            "homeless",
            "shelter",
            "mortgage",
            "apartment",
            "housing",
            "lease",
            "foreclosure",
            "place to live",
            "security deposit",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electric",
            "electricity",
            "utilities",
            "utility",
            "heating",
            "shutoff",
            "power bill",
            "gas bill",
            "water bill",
            "electric bill",
            "internet bill",
            "shut off",
        ],
    ),
    (
        Category::Employment,
        &[
            "job",
            "unemployed",
            "fired",
            "paycheck",
            "employment",
            "income",
            "laid off",
            "lost my job",
            "out of work",
            "hours cut",
            "job loss",
        ],
    ),
    (
        Category::Food,
        &[
            "food",
            "groceries",
            "hungry",
            "meals",
            "starving",
            "pantry",
            "food stamps",
            "food bank",
        ],
    ),
    (
        Category::Transportation,
        &[
            "car",
            "vehicle",
            "transportation",
            "bus",
            "truck",
            "transmission",
            "tires",
            "commute",
            "car repair",
            "gas money",
        ],
    ),
    (
        Category::Education,
        &[
            "school",
            "college",
            "tuition",
            "education",
            "university",
            "degree",
            "textbooks",
            "classes",
            "student loan",
        ],
    ),
    (
        Category::Childcare,
        &[
            "childcare",
            "daycare",
            "babysitter",
            "child care",
            "after school care",
        ],
    ),
    (
        Category::Family,
        &[
            "family",
            "kids",
            "children",
            "funeral",
            "newborn",
            "single mom",
            "single dad",
            "single parent",
        ],
    ),
    (
        Category::MentalHealth,
        &[
            "depression",
            "depressed",
            "anxiety",
            "counseling",
            "therapist",
            "therapy",
            "ptsd",
            "suicidal",
            "bipolar",
            "mental health",
            "panic attacks",
        ],
    ),
    (
        Category::Addiction,
        &[
            "addiction",
            "addicted",
            "rehab",
            "sober",
            "sobriety",
            "relapse",
            "detox",
            "substance abuse",
            "drug use",
        ],
    ),
    (
        Category::Emergency,
        &[
            "emergency",
            "disaster",
            "fire",
            "flood",
            "hurricane",
            "tornado",
            "accident",
            "crisis",
            "lost everything",
        ],
    ),
];

/// Words used in `not <label> related` negation phrases per category
pub fn negation_labels(category: Category) -> &'static [&'static str] {
    match category {
        Category::Safety => &["safety"],
        Category::Legal => &["legal"],
        Category::Healthcare => &["medical", "health", "healthcare"],
        Category::Housing => &["housing", "rent"],
        Category::Utilities => &["utility", "utilities"],
        Category::Employment => &["job", "work", "employment"],
        Category::Food => &["food"],
        Category::Transportation => &["transportation", "car"],
        Category::Education => &["education", "school"],
        Category::Childcare => &["childcare"],
        Category::Family => &["family"],
        Category::MentalHealth => &["mental health"],
        Category::Addiction => &["addiction", "drug"],
        Category::Emergency => &["emergency"],
        Category::Other => &[],
    }
}

/// Job-loss phrasing for the employment override
pub static JOB_LOSS_PHRASES: &[&str] = &[
    "lost my job",
    "lost his job",
    "lost her job",
    "laid off",
    "got fired",
    "was fired",
    "been fired",
    "let go",
    "unemployed",
    "out of work",
];

/// Financial-distress phrasing for the employment override
pub static FINANCIAL_DISTRESS_PHRASES: &[&str] = &[
    "can't pay",
    "cannot pay",
    "can't afford",
    "behind on",
    "bills",
    "no money",
    "broke",
    "struggling",
    "overdue",
    "debt",
];

/// Generic help requests that yield an OTHER category when nothing else matched
pub static GENERIC_HELP_PHRASES: &[&str] = &[
    "need help",
    "need money",
    "need assistance",
    "struggling",
    "can't afford",
];

// ============================================================================
// Category amount ranges
// ============================================================================

/// Typical and maximum plausible goal amounts for a category (USD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub typical_low: f64,
    pub typical_high: f64,
    pub max_allowed: f64,
}

impl AmountRange {
    const fn new(typical_low: f64, typical_high: f64, max_allowed: f64) -> Self {
        Self {
            typical_low,
            typical_high,
            max_allowed,
        }
    }

    /// Plausible band used by the validation reporter
    pub fn is_plausible(&self, amount: f64) -> bool {
        amount >= 0.5 * self.typical_low && amount <= self.max_allowed
    }
}

pub fn amount_range(category: Category) -> AmountRange {
    match category {
        Category::Safety => AmountRange::new(500.0, 5_000.0, 20_000.0),
        Category::Legal => AmountRange::new(500.0, 10_000.0, 50_000.0),
        Category::Healthcare => AmountRange::new(500.0, 20_000.0, 100_000.0),
        Category::Housing => AmountRange::new(500.0, 5_000.0, 25_000.0),
        Category::Utilities => AmountRange::new(100.0, 1_500.0, 5_000.0),
        Category::Employment => AmountRange::new(500.0, 5_000.0, 20_000.0),
        Category::Food => AmountRange::new(50.0, 1_000.0, 5_000.0),
        Category::Transportation => AmountRange::new(200.0, 5_000.0, 20_000.0),
        Category::Education => AmountRange::new(500.0, 15_000.0, 60_000.0),
        Category::Childcare => AmountRange::new(200.0, 3_000.0, 15_000.0),
        Category::Family => AmountRange::new(200.0, 5_000.0, 25_000.0),
        Category::MentalHealth => AmountRange::new(200.0, 5_000.0, 25_000.0),
        Category::Addiction => AmountRange::new(500.0, 10_000.0, 40_000.0),
        Category::Emergency => AmountRange::new(200.0, 5_000.0, 25_000.0),
        Category::Other => AmountRange::new(100.0, 5_000.0, 50_000.0),
    }
}

/// Upper bound for any goal amount
pub const MAX_GOAL_AMOUNT: f64 = 10_000_000.0;

// ============================================================================
// Urgency
// ============================================================================

/// A keyword tier with its score ceiling
#[derive(Debug, Clone, Copy)]
pub struct UrgencyTier {
    pub label: &'static str,
    pub score: f64,
    pub phrases: &'static [&'static str],
}

pub static LOW_URGENCY_TIER: UrgencyTier = UrgencyTier {
    label: "low",
    score: 0.2,
    phrases: &[
        "not urgent",
        "no rush",
        "no hurry",
        "whenever",
        "eventually",
        "someday",
        "in the future",
        "when possible",
    ],
};

/// Critical, high and medium tiers; matched after low-tier phrases are removed
pub static URGENCY_TIERS: &[UrgencyTier] = &[
    UrgencyTier {
        label: "critical",
        score: 0.85,
        phrases: &[
            "emergency",
            "immediately",
            "right now",
            "tonight",
            "life or death",
            "dying",
            "eviction notice",
            "being evicted",
            "nowhere to go",
            "no food",
            "crisis",
        ],
    },
    UrgencyTier {
        label: "high",
        score: 0.6,
        phrases: &[
            "urgent",
            "urgently",
            "asap",
            "as soon as possible",
            "this week",
            "soon",
            "desperate",
            "behind on",
            "overdue",
            "final notice",
            "deadline",
            "running out",
        ],
    },
    UrgencyTier {
        label: "medium",
        score: 0.4,
        phrases: &[
            "this month",
            "next month",
            "need help",
            "struggling",
            "worried",
            "hard time",
            "piling up",
        ],
    },
];

pub static TEMPORAL_PHRASES: &[&str] = &[
    "today",
    "tonight",
    "tomorrow",
    "this week",
    "by friday",
    "by monday",
    "end of the week",
    "end of the month",
    "in a few days",
    "days left",
];

pub static CONSEQUENCE_PHRASES: &[&str] = &[
    "evicted",
    "eviction",
    "shut off",
    "cut off",
    "homeless",
    "kicked out",
    "repossessed",
    "foreclosure",
    "lose my",
    "lose our",
];

pub static INTENSIFIER_PHRASES: &[&str] = &[
    "really",
    "very",
    "extremely",
    "desperately",
    "terrified",
    "please",
    "so scared",
];

pub static MITIGATION_PHRASES: &[&str] = &[
    "not urgent",
    "no rush",
    "no hurry",
    "can wait",
    "manageable",
    "stable now",
    "whenever",
];

/// Words that on their own justify CRITICAL urgency
pub static CRITICAL_TEMPORAL_PHRASES: &[&str] = &[
    "today",
    "tomorrow",
    "emergency",
    "crisis",
    "immediate",
    "immediately",
];

/// Urgency vocabulary that an extracted name must never equal
pub static URGENCY_WORDS: &[&str] = &[
    "critical",
    "emergency",
    "urgent",
    "urgently",
    "immediately",
    "asap",
    "crisis",
    "help",
    "desperate",
];

// ============================================================================
// Context vocabularies
// ============================================================================

pub static SAFETY_TERMS: &[&str] = &[
    "abuse",
    "abusive",
    "threat",
    "threats",
    "threatened",
    "violence",
    "violent",
    "unsafe",
    "danger",
    "dangerous",
    "stalking",
    "assault",
    "harassment",
    "afraid",
];

pub static MEDICAL_TERMS: &[&str] = &[
    "medical",
    "hospital",
    "surgery",
    "doctor",
    "medication",
    "medicine",
    "prescription",
    "treatment",
    "health",
    "sick",
    "illness",
    "diagnosis",
    "diagnosed",
    "clinic",
    "therapy",
    "cancer",
    "chemo",
    "er",
];

/// Keywords required for the Healthcare amount recovery
pub static AMOUNT_RECOVERY_TERMS: &[&str] = &["surgery", "hospital", "treatment"];

/// Indicators strong enough to reclassify an OTHER category, in precedence order
pub static STRONG_INDICATORS: &[(Category, &[&str])] = &[
    (
        Category::Safety,
        &[
            "hits me",
            "hurting me",
            "beats me",
            "afraid for my life",
            "fleeing",
            "escape my partner",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "chemo",
            "chemotherapy",
            "dialysis",
            "diagnosed with",
            "ambulance",
            "transplant",
        ],
    ),
    (
        Category::Housing,
        &[
            "kicked out",
            "sleeping in my car",
            "lost my apartment",
            "place to stay",
            "couch surfing",
        ],
    ),
];

/// Phrases that signal the speaker corrected their own name
pub static NAME_CONTRADICTION_PHRASES: &[&str] = &[
    "but my name is",
    "actually i'm",
    "actually i am",
    "actually my name is",
    "wait no",
    "i mean my name is",
];

// ============================================================================
// Name extraction vocabularies
// ============================================================================

/// Phrases that disqualify an intro capture as a name
pub static NAME_REJECTION_PHRASES: &[&str] = &[
    "behind on",
    "stopped working",
    "running out",
    "about to",
    "going to",
    "trying to",
    "calling about",
    "out of work",
    "in need",
    "not sure",
];

/// Emotional and functional words that are never names on their own
pub static NAME_STOPLIST: &[&str] = &[
    "sorry", "struggling", "scared", "desperate", "here", "calling", "just", "so", "not",
    "really", "very", "trying", "going", "looking", "hoping", "hi", "hello", "hey", "okay",
    "ok", "well", "yes", "no", "the", "a", "an", "and", "but", "because", "i", "it", "this",
    "that", "my", "me", "currently", "still", "now", "unemployed", "homeless", "tired", "sick",
    "worried", "afraid", "broke", "single", "alone", "writing", "reaching", "need", "needing",
    "in", "at", "from", "with", "on", "about", "there", "grateful", "thankful", "glad", "happy",
    "sad", "stressed", "overwhelmed", "please", "thanks", "thank", "mom", "dad", "mother",
    "father", "someone", "anyone", "everyone", "nobody", "unknown", "anonymous", "name",
];

pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    NAME_STOPLIST.contains(&lower.as_str())
}

// ============================================================================
// Locations
// ============================================================================

/// US state / territory codes and names
pub static US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// State codes that double as common English words; never matched bare
pub static AMBIGUOUS_STATE_CODES: &[&str] = &["OK", "OH", "HI", "ME", "OR", "IN"];

pub fn is_state_code(code: &str) -> bool {
    US_STATES.iter().any(|(c, _)| *c == code)
}

pub fn is_state_name(name: &str) -> bool {
    US_STATES.iter().any(|(_, n)| n.eq_ignore_ascii_case(name))
}

/// Capitalized words that are never place names
pub static LOCATION_REJECT_WORDS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday", "i", "me", "my", "he", "she", "they", "we", "you", "it", "him",
    "her", "them", "us", "his", "their", "our", "the", "a", "and", "but", "so", "hi", "hello",
];

pub fn is_location_reject(word: &str) -> bool {
    let lower = word.to_lowercase();
    let base = lower.trim_end_matches("'s");
    LOCATION_REJECT_WORDS.contains(&lower.as_str()) || LOCATION_REJECT_WORDS.contains(&base)
}

// ============================================================================
// Spelled numbers
// ============================================================================

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Spoken multiplier words → value (1..=99 in hyphen and space forms, plus "a" / "a couple")
///
/// Multiplied by `hundred` / `thousand` in the amount extractor, so
/// "twenty-eight hundred" → 28 × 100.
pub static SPELLED_NUMBERS: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (value, word) in ONES.iter().enumerate().skip(1) {
        map.insert((*word).to_string(), value as u32);
    }
    for (tens_index, tens_word) in TENS.iter().enumerate().skip(2) {
        let tens_value = (tens_index * 10) as u32;
        map.insert((*tens_word).to_string(), tens_value);
        for (ones_value, ones_word) in ONES.iter().enumerate().take(10).skip(1) {
            let value = tens_value + ones_value as u32;
            map.insert(format!("{}-{}", tens_word, ones_word), value);
            map.insert(format!("{} {}", tens_word, ones_word), value);
        }
    }
    map.insert("a".to_string(), 1);
    map.insert("a couple".to_string(), 2);
    map.insert("a couple of".to_string(), 2);
    map
});

/// Resolve the trailing words of a captured phrase against the spelled-number table
///
/// Tries the longest suffix first so "need twenty eight" resolves to 28 and
/// "about fifteen" resolves to 15.
pub fn resolve_spelled(phrase: &str) -> Option<u32> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    for take in (1..=words.len().min(3)).rev() {
        let candidate = words[words.len() - take..].join(" ");
        if let Some(value) = SPELLED_NUMBERS.get(&candidate) {
            return Some(*value);
        }
    }
    None
}

/// Resolve the leading words of a phrase that follows "hundred" / "thousand"
///
/// Tries the longest prefix first so "fifty five dollars" resolves to 55. A
/// leading "a" is not a number here ("two hundred a month").
pub fn resolve_spelled_prefix(phrase: &str) -> Option<u32> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.first() == Some(&"a") {
        return None;
    }
    for take in (1..=words.len().min(2)).rev() {
        if let Some(value) = SPELLED_NUMBERS.get(&words[..take].join(" ")) {
            return Some(*value);
        }
    }
    None
}
