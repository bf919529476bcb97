//! Arrival text normalization.
//!
//! The source page writes arrival information as free text in a table
//! cell: "5分", "約 3 分鐘", "進站中", "尚未發車", "2站", a terminus name,
//! and sometimes a vehicle licence plate in front of any of these. This
//! module maps that text onto [`NormalizedState`].
//!
//! Rules are applied in a fixed order:
//!
//! 1. strip licence-plate tokens (`ABC-1234`)
//! 2. minute countdown → `Minutes(n)`
//! 3. arriving literal → `Approaching`; not-departed literal → `NotYetDeparted`
//! 4. `N站` / `N stops` → `StepsAway(n)`
//! 5. terminal literal → `Terminal`
//! 6. anything else → `Unknown(text)`

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::NormalizedState;

static PLATE_REGEX: OnceLock<Regex> = OnceLock::new();
static MINUTES_REGEX: OnceLock<Regex> = OnceLock::new();
static STOPS_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn plate_regex() -> &'static Regex {
    PLATE_REGEX.get_or_init(|| Regex::new(r"\s*[A-Z]{3}-[0-9]{4}\s*").unwrap())
}

fn minutes_regex() -> &'static Regex {
    MINUTES_REGEX.get_or_init(|| Regex::new(r"([0-9]+)\s*(?:分|[Mm]in)").unwrap())
}

fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| Regex::new(r"[0-9]+").unwrap())
}

fn stops_regex() -> &'static Regex {
    STOPS_REGEX.get_or_init(|| Regex::new(r"^([0-9]+)\s*(?:站|[Ss]tops?)$").unwrap())
}

/// Literal sets recognised by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Exact texts meaning the bus is arriving now.
    pub approaching: Vec<String>,

    /// Exact texts meaning the bus has not left its origin.
    pub not_departed: Vec<String>,

    /// Exact texts marking a terminus or depot.
    pub terminals: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            approaching: ["進站中", "即將進站", "將到站", "已到站", "arriving"]
                .map(String::from)
                .to_vec(),
            not_departed: ["尚未發車", "未發車", "not yet departed"]
                .map(String::from)
                .to_vec(),
            terminals: ["終點站"].map(String::from).to_vec(),
        }
    }
}

/// A terminal literal that an earlier rule would claim first.
///
/// Rejected when the normalizer is built, so every configured terminal
/// literal normalizes to `Terminal`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("terminal literal {literal:?} would be read as {claimed:?}")]
pub struct AmbiguousLiteral {
    pub literal: String,
    pub claimed: NormalizedState,
}

/// Classifies raw cell text into a [`NormalizedState`]. Never fails.
#[derive(Debug, Clone)]
pub struct ArrivalTextNormalizer {
    approaching: HashSet<String>,
    not_departed: HashSet<String>,
    terminals: HashSet<String>,
}

impl ArrivalTextNormalizer {
    /// Build a normalizer, validating the terminal literals.
    pub fn new(config: &NormalizerConfig) -> Result<Self, AmbiguousLiteral> {
        let mut normalizer = Self {
            approaching: literal_set(&config.approaching),
            not_departed: literal_set(&config.not_departed),
            terminals: HashSet::new(),
        };

        for literal in literal_set(&config.terminals) {
            let claimed = normalizer.normalize(&literal);
            let cleaned = strip_plates(&literal);
            if claimed.is_known() || cleaned != literal {
                return Err(AmbiguousLiteral { literal, claimed });
            }
            normalizer.terminals.insert(literal);
        }

        Ok(normalizer)
    }

    /// Classify one cell of text.
    pub fn normalize(&self, raw_text: &str) -> NormalizedState {
        let text = strip_plates(raw_text);

        // A countdown needs a number next to its unit, but a range like
        // "3-5分" reports its first number.
        if (text.contains('分') || text.to_lowercase().contains("min"))
            && minutes_regex().is_match(&text)
        {
            if let Some(n) = first_number(&text) {
                return NormalizedState::Minutes(n);
            }
        }

        if self.approaching.contains(&text) {
            return NormalizedState::Approaching;
        }
        if self.not_departed.contains(&text) {
            return NormalizedState::NotYetDeparted;
        }

        if let Some(n) = capture_number(stops_regex(), &text) {
            return NormalizedState::StepsAway(n);
        }

        if self.terminals.contains(&text) {
            return NormalizedState::Terminal;
        }

        NormalizedState::Unknown(text)
    }
}

impl Default for ArrivalTextNormalizer {
    fn default() -> Self {
        Self {
            approaching: literal_set(&NormalizerConfig::default().approaching),
            not_departed: literal_set(&NormalizerConfig::default().not_departed),
            terminals: literal_set(&NormalizerConfig::default().terminals),
        }
    }
}

fn literal_set(literals: &[String]) -> HashSet<String> {
    literals
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Remove licence-plate tokens and the whitespace around them.
fn strip_plates(text: &str) -> String {
    plate_regex().replace_all(text, " ").trim().to_string()
}

fn first_number(text: &str) -> Option<u32> {
    number_regex().find(text)?.as_str().parse().ok()
}

fn capture_number(regex: &Regex, text: &str) -> Option<u32> {
    regex.captures(text)?.get(1)?.as_str().parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A plate in front of a countdown never changes the countdown.
        #[test]
        fn plate_prefix_is_ignored(plate in "[A-Z]{3}-[0-9]{4}", mins in 0u32..200) {
            let n = ArrivalTextNormalizer::default();
            let text = format!("{plate} {mins}分");
            prop_assert_eq!(n.normalize(&text), NormalizedState::Minutes(mins));
        }

        /// Every accepted terminal literal normalizes to Terminal.
        #[test]
        fn accepted_terminals_are_terminal(literal in "[\\p{Han}]{1,4}[0-9]{0,3}[\\p{Han}]{1,3}") {
            let config = NormalizerConfig {
                terminals: vec![literal.clone()],
                ..NormalizerConfig::default()
            };
            if let Ok(n) = ArrivalTextNormalizer::new(&config) {
                prop_assert_eq!(n.normalize(&literal), NormalizedState::Terminal);
            }
        }

        /// Every input maps to exactly one state without panicking.
        #[test]
        fn total(text in "\\PC{0,20}") {
            let _ = ArrivalTextNormalizer::default().normalize(&text);
        }
    }
}
