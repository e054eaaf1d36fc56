//! Per-polarity running statistics

use serde::Serialize;

use crate::polarity::{Polarity, ScoreEncoding};

/// One ordered collection of recorded combined scores per polarity
#[derive(Debug, Clone, Default)]
pub struct CategoryStats {
    negative: Vec<f64>,
    neutral: Vec<f64>,
    positive: Vec<f64>,
}

/// Derived figures for a single polarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorySummary {
    pub count: usize,
    /// Share of the whole ledger, 0..=100
    pub percentage: f64,
    /// Mean of recorded combined scores; `None` when nothing is recorded
    pub average: Option<f64>,
    /// Mean on the category-local 0..100 scale
    pub decoded_average: Option<f64>,
}

/// Summary across all polarities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub negative: CategorySummary,
    pub neutral: CategorySummary,
    pub positive: CategorySummary,
}

impl StatsSummary {
    pub fn get(&self, polarity: Polarity) -> &CategorySummary {
        match polarity {
            Polarity::Negative => &self.negative,
            Polarity::Neutral => &self.neutral,
            Polarity::Positive => &self.positive,
        }
    }
}

impl CategoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self, polarity: Polarity) -> &[f64] {
        match polarity {
            Polarity::Negative => &self.negative,
            Polarity::Neutral => &self.neutral,
            Polarity::Positive => &self.positive,
        }
    }

    fn values_mut(&mut self, polarity: Polarity) -> &mut Vec<f64> {
        match polarity {
            Polarity::Negative => &mut self.negative,
            Polarity::Neutral => &mut self.neutral,
            Polarity::Positive => &mut self.positive,
        }
    }

    pub fn record(&mut self, polarity: Polarity, value: f64) {
        self.values_mut(polarity).push(value);
    }

    /// Remove the first exactly-equal value; returns `false` if absent
    pub fn unrecord(&mut self, polarity: Polarity, value: f64) -> bool {
        let values = self.values_mut(polarity);
        match values.iter().position(|v| *v == value) {
            Some(at) => {
                values.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, polarity: Polarity) -> usize {
        self.values(polarity).len()
    }

    /// `count / ledger_len * 100`, or 0 for an empty ledger
    pub fn percentage(&self, polarity: Polarity, ledger_len: usize) -> f64 {
        if ledger_len == 0 {
            return 0.0;
        }
        self.count(polarity) as f64 / ledger_len as f64 * 100.0
    }

    /// Arithmetic mean of recorded values; `None` for an empty category
    pub fn average(&self, polarity: Polarity) -> Option<f64> {
        mean(self.values(polarity).iter().copied())
    }

    /// Mean after decoding each recorded value to the 0..100 scale
    pub fn decoded_average(&self, polarity: Polarity, encoding: &ScoreEncoding) -> Option<f64> {
        mean(
            self.values(polarity)
                .iter()
                .map(|v| encoding.decode(polarity, *v)),
        )
    }

    pub fn summary(&self, ledger_len: usize, encoding: &ScoreEncoding) -> StatsSummary {
        let category = |polarity| CategorySummary {
            count: self.count(polarity),
            percentage: self.percentage(polarity, ledger_len),
            average: self.average(polarity),
            decoded_average: self.decoded_average(polarity, encoding),
        };
        StatsSummary {
            total: ledger_len,
            negative: category(Polarity::Negative),
            neutral: category(Polarity::Neutral),
            positive: category(Polarity::Positive),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}
