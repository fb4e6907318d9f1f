use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::similarity;

/// Similarity strategy: scores a query against one candidate, 0..=100.
/// Implementations must be pure; the matcher may call them from several
/// threads at once.
pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, query: &str, candidate: &str) -> u8;
}

// ---------------------------------------------------------------------------
// Ratio family
// ---------------------------------------------------------------------------

/// Weighted ratio: the default, tuned for free-text assay descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct WRatio;

impl Scorer for WRatio {
    fn name(&self) -> &'static str {
        "wratio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        similarity::wratio(query, candidate)
    }
}

/// Runs a ratio primitive over fully processed text. Empty after
/// processing scores 0.
fn processed(f: fn(&str, &str) -> u8, query: &str, candidate: &str) -> u8 {
    let q = similarity::full_process(query, true);
    let c = similarity::full_process(candidate, true);
    if q.is_empty() || c.is_empty() {
        return 0;
    }
    f(&q, &c)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ratio;

impl Scorer for Ratio {
    fn name(&self) -> &'static str {
        "ratio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        processed(similarity::ratio, query, candidate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl Scorer for PartialRatio {
    fn name(&self) -> &'static str {
        "partial_ratio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        processed(similarity::partial_ratio, query, candidate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Scorer for TokenSortRatio {
    fn name(&self) -> &'static str {
        "token_sort_ratio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        processed(similarity::token_sort_ratio, query, candidate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

impl Scorer for TokenSetRatio {
    fn name(&self) -> &'static str {
        "token_set_ratio"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        processed(similarity::token_set_ratio, query, candidate)
    }
}

// ---------------------------------------------------------------------------
// strsim-backed metrics
// ---------------------------------------------------------------------------

fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// `1 - levenshtein / max_len`, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl Scorer for NormalizedLevenshtein {
    fn name(&self) -> &'static str {
        "levenshtein"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        let (q, c) = (query.to_lowercase(), candidate.to_lowercase());
        if q == c {
            return 100;
        }
        to_score(strsim::normalized_levenshtein(&q, &c))
    }
}

/// Jaro-Winkler, case-insensitive. Favors shared prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl Scorer for JaroWinkler {
    fn name(&self) -> &'static str {
        "jaro_winkler"
    }

    fn score(&self, query: &str, candidate: &str) -> u8 {
        let (q, c) = (query.to_lowercase(), candidate.to_lowercase());
        if q == c {
            return 100;
        }
        to_score(strsim::jaro_winkler(&q, &c))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Built-in scorers, selectable from config and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Wratio,
    Ratio,
    PartialRatio,
    TokenSortRatio,
    TokenSetRatio,
    Levenshtein,
    JaroWinkler,
}

impl ScorerKind {
    pub const ALL: [ScorerKind; 7] = [
        ScorerKind::Wratio,
        ScorerKind::Ratio,
        ScorerKind::PartialRatio,
        ScorerKind::TokenSortRatio,
        ScorerKind::TokenSetRatio,
        ScorerKind::Levenshtein,
        ScorerKind::JaroWinkler,
    ];

    pub fn scorer(self) -> &'static dyn Scorer {
        match self {
            ScorerKind::Wratio => &WRatio,
            ScorerKind::Ratio => &Ratio,
            ScorerKind::PartialRatio => &PartialRatio,
            ScorerKind::TokenSortRatio => &TokenSortRatio,
            ScorerKind::TokenSetRatio => &TokenSetRatio,
            ScorerKind::Levenshtein => &NormalizedLevenshtein,
            ScorerKind::JaroWinkler => &JaroWinkler,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.scorer().name()
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerKind {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        ScorerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| AlignError::UnknownScorer(s.to_string()))
    }
}
