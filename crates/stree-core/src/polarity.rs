//! Sentiment polarity, classification results and the combined-score encoding

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentiment category reported by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
            Polarity::Positive => "positive",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "negative" => Ok(Polarity::Negative),
            "neutral" => Ok(Polarity::Neutral),
            "positive" => Ok(Polarity::Positive),
            other => Err(Error::scoring(format!("unknown polarity '{}'", other))),
        }
    }
}

/// Output of the external scorer for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub polarity: Polarity,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Classification {
    /// Create a classification, rejecting non-finite or out-of-range confidence
    pub fn new(polarity: Polarity, confidence: f64) -> Result<Self> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidConfidence { value: confidence });
        }
        Ok(Self {
            polarity,
            confidence,
        })
    }

    /// Confidence as a rounded whole percentage
    pub fn percent(&self) -> f64 {
        (self.confidence * 100.0).round()
    }
}

/// One multiplier per polarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityWeights {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl PolarityWeights {
    pub fn get(&self, polarity: Polarity) -> f64 {
        match polarity {
            Polarity::Negative => self.negative,
            Polarity::Neutral => self.neutral,
            Polarity::Positive => self.positive,
        }
    }
}

/// Confidence -> combined ledger score multipliers
pub const DEFAULT_SCORE_MULTIPLIER: PolarityWeights = PolarityWeights {
    negative: 10.0,
    neutral: 100.0,
    positive: 1000.0,
};

/// Combined ledger score -> category-local 0..100 multipliers
pub const DEFAULT_STATS_MULTIPLIER: PolarityWeights = PolarityWeights {
    negative: 10.0,
    neutral: 1.0,
    positive: 0.1,
};

/// Encode/decode pair between a classification and the single combined
/// score the ledger sorts on.
///
/// `encode` folds polarity into magnitude so that one ascending sort groups
/// negatives below neutrals below positives. `decode` maps a combined score
/// back to the category-local 0..100 scale. For every polarity
/// `score_multiplier * stats_multiplier` is expected to be 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEncoding {
    pub score_multiplier: PolarityWeights,
    pub stats_multiplier: PolarityWeights,
}

impl Default for ScoreEncoding {
    fn default() -> Self {
        Self {
            score_multiplier: DEFAULT_SCORE_MULTIPLIER,
            stats_multiplier: DEFAULT_STATS_MULTIPLIER,
        }
    }
}

impl ScoreEncoding {
    pub fn encode(&self, classification: &Classification) -> f64 {
        classification.confidence * self.score_multiplier.get(classification.polarity)
    }

    pub fn decode(&self, polarity: Polarity, combined: f64) -> f64 {
        combined * self.stats_multiplier.get(polarity)
    }
}
