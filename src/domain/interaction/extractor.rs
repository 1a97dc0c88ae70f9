//! Heuristic field extraction from free-text conversation turns.
//!
//! The extractor is an ordered list of (field, matcher) rules evaluated
//! against a single user turn. Rules never overwrite fields that already
//! hold a value, so extraction is idempotent per turn and accumulates
//! monotonically across turns. Heuristics are purely lexical; there is no
//! negation or context handling.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{Field, PartialRecord};

static HCP_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:dr\.|doctor|hcp)\s*([a-z\s]+?)(?:\s*(?:on|about|regarding|and|today|\.|$))")
        .expect("valid regex")
});

static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{4}-\d{2}-\d{2})|today").expect("valid regex"));

static PRODUCTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:products? discussed|talked about|mentioned):?\s*(.*?)(?:\.|and key|and the main)")
        .expect("valid regex")
});

static KEY_POINTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:key points?|discussion points|main point was):?\s*(.*?)(?:\.|and sentiment|and follow-up)")
        .expect("valid regex")
});

static FOLLOW_UP_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:follow-up actions?|next steps?|action items?):?\s*(.*?)(?:\.|$)")
        .expect("valid regex")
});

const PRODUCT_KEYWORDS: &[(&str, &str)] =
    &[("producta", "ProductA"), ("productb", "ProductB")];

const KEY_POINT_KEYWORDS: &[(&str, &str)] = &[("efficacy data", "Efficacy data")];

const SENTIMENT_KEYWORDS: &[(&str, &str)] = &[
    ("positive", "Positive"),
    ("neutral", "Neutral"),
    ("negative", "Negative"),
];

const FOLLOW_UP_KEYWORDS: &[(&str, &str)] = &[("send publication", "Send publication")];

/// One heuristic for one field. Matchers run in rule order; once a field
/// holds a value, remaining matchers for that field are skipped.
enum Matcher {
    /// Regex whose first capture is a person name, normalized to title case.
    TitledCapture(&'static Lazy<Regex>),
    /// Regex whose first capture is free text after a label phrase,
    /// normalized to sentence case.
    LabeledCapture(&'static Lazy<Regex>),
    /// ISO `YYYY-MM-DD` token anywhere in the turn, or the literal word
    /// "today" resolved against the caller-supplied date. Leftmost wins.
    DateToken,
    /// Fixed keyword vocabulary; every hit contributes, comma-joined.
    KeywordAny(&'static [(&'static str, &'static str)]),
    /// Fixed keyword vocabulary; the first hit wins.
    KeywordFirst(&'static [(&'static str, &'static str)]),
}

impl Matcher {
    fn find(&self, text: &str, lowered: &str, today: NaiveDate) -> Option<String> {
        match self {
            Matcher::TitledCapture(pattern) => capture(pattern, text).map(|v| title_case(&v)),
            Matcher::LabeledCapture(pattern) => capture(pattern, text).map(|v| sentence_case(&v)),
            Matcher::DateToken => {
                let found = DATE_TOKEN.captures(text)?;
                match found.get(1) {
                    Some(iso) => Some(iso.as_str().to_string()),
                    None => Some(today.format("%Y-%m-%d").to_string()),
                }
            }
            Matcher::KeywordAny(vocabulary) => {
                let hits: Vec<&str> = vocabulary
                    .iter()
                    .filter(|(keyword, _)| lowered.contains(*keyword))
                    .map(|(_, canonical)| *canonical)
                    .collect();
                if hits.is_empty() {
                    None
                } else {
                    Some(hits.join(", "))
                }
            }
            Matcher::KeywordFirst(vocabulary) => vocabulary
                .iter()
                .find(|(keyword, _)| lowered.contains(*keyword))
                .map(|(_, canonical)| canonical.to_string()),
        }
    }
}

/// First capture group, trimmed. Empty captures count as no match so the
/// next matcher for the field still gets a chance.
fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|found| found.get(1))
        .map(|group| group.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn sentence_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct ExtractionRule {
    field: Field,
    matcher: Matcher,
}

/// Rule-driven extractor mapping one user turn onto the field schema.
pub struct FieldExtractor {
    rules: Vec<ExtractionRule>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Runs every rule over one user turn and merges hits into `existing`.
    ///
    /// Pure function of its inputs. Fields already set in `existing` are
    /// never overwritten, and only non-empty values are added, so the
    /// result is always a superset of `existing`. `today` anchors the
    /// literal word "today" to a concrete date.
    pub fn extract(&self, text: &str, existing: &PartialRecord, today: NaiveDate) -> PartialRecord {
        let lowered = text.to_lowercase();
        let mut merged = existing.clone();
        for rule in &self.rules {
            if merged.is_set(rule.field) {
                continue;
            }
            if let Some(value) = rule.matcher.find(text, &lowered, today) {
                merged.set(rule.field, value);
            }
        }
        merged
    }
}

fn default_rules() -> Vec<ExtractionRule> {
    vec![
        rule(Field::HcpName, Matcher::TitledCapture(&HCP_NAME)),
        rule(Field::InteractionDate, Matcher::DateToken),
        rule(Field::ProductsDiscussed, Matcher::LabeledCapture(&PRODUCTS_LABEL)),
        rule(Field::ProductsDiscussed, Matcher::KeywordAny(PRODUCT_KEYWORDS)),
        rule(Field::KeyDiscussionPoints, Matcher::LabeledCapture(&KEY_POINTS_LABEL)),
        rule(Field::KeyDiscussionPoints, Matcher::KeywordAny(KEY_POINT_KEYWORDS)),
        rule(Field::Sentiment, Matcher::KeywordFirst(SENTIMENT_KEYWORDS)),
        rule(Field::FollowUpActions, Matcher::LabeledCapture(&FOLLOW_UP_LABEL)),
        rule(Field::FollowUpActions, Matcher::KeywordAny(FOLLOW_UP_KEYWORDS)),
    ]
}

fn rule(field: Field, matcher: Matcher) -> ExtractionRule {
    ExtractionRule { field, matcher }
}
