//! Sentiment scorer collaborator
//!
//! The engine never scores text itself. It asks a [`Scorer`] once per leaf
//! insertion request and treats the answer as opaque.

use std::sync::LazyLock;

use regex::Regex;
use stree_core::prelude::*;
use stree_core::{Classification, Polarity};

/// A scorer's answer: the classification plus the text to show on the leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub classification: Classification,
    pub text: String,
}

/// Classifies a piece of text into a polarity and a confidence in [0, 1]
#[cfg_attr(test, mockall::automock)]
pub trait Scorer: Send + Sync {
    fn classify(&self, text: &str) -> Result<Scored>;
}

/// Scorer that reads an explicit `polarity:confidence` tag from the front of
/// the text, e.g. `negative:0.5 I hate Mondays`.
///
/// Used by the headless runner and tests to drive the engine without a
/// network scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedScorer;

/// `<polarity>:<confidence>` followed by whitespace or end of input
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:(negative|neutral|positive)):([0-9]*\.?[0-9]+)(?:\s+|$)")
        .expect("Invalid tag pattern regex")
});

impl TaggedScorer {
    /// Split a tagged line into its classification and the remaining text
    pub fn parse(input: &str) -> Result<(Classification, &str)> {
        let caps = TAG_PATTERN.captures(input).ok_or_else(|| {
            Error::scoring(format!(
                "expected '<polarity>:<confidence> <text>', got '{}'",
                input.trim()
            ))
        })?;

        let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let polarity: Polarity = caps[1].parse()?;
        let confidence: f64 = caps[2]
            .parse()
            .map_err(|e| Error::scoring(format!("bad confidence '{}': {}", &caps[2], e)))?;

        let classification = Classification::new(polarity, confidence)?;
        Ok((classification, input[whole..].trim()))
    }
}

impl Scorer for TaggedScorer {
    /// The leaf keeps only the text after the tag
    fn classify(&self, text: &str) -> Result<Scored> {
        let (classification, body) = Self::parse(text)?;
        trace!(
            "Tagged classification {} {:.2}",
            classification.polarity,
            classification.confidence
        );
        Ok(Scored {
            classification,
            text: body.to_string(),
        })
    }
}
