use super::rules::{normalize_token, RuleTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of a ranked result: the condition, its share of the top score, and the raw votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: String,
    pub percentage: f64,
    pub score: u64,
}

/// Per-call running totals, remembering the order conditions were first seen.
#[derive(Debug, Default)]
struct ScoreAccumulator {
    totals: Vec<(String, u64)>,
}

impl ScoreAccumulator {
    fn add(&mut self, condition: &str, weight: u64) {
        match self.totals.iter_mut().find(|(name, _)| name == condition) {
            Some((_, total)) => *total = total.saturating_add(weight),
            None => self.totals.push((condition.to_string(), weight)),
        }
    }

    fn into_ranked(self) -> Vec<RankedCondition> {
        let Some(max) = self.totals.iter().map(|(_, total)| *total).max() else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedCondition> = self
            .totals
            .into_iter()
            .map(|(condition, score)| RankedCondition {
                percentage: percent_of(score, max),
                condition,
                score,
            })
            .collect();

        // `sort_by` is stable: equal percentages keep first-accumulated order.
        ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        ranked
    }
}

/// Score symptom tokens against the rule table.
///
/// Tokens are normalized before lookup and counted once each; tokens with no
/// rule entry contribute nothing. Percentages are relative to the top-scoring
/// condition of this call, so a non-empty result always starts at `100.0`.
pub fn score<I, S>(tokens: I, rules: &RuleTable) -> Vec<RankedCondition>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut accumulator = ScoreAccumulator::default();

    for token in tokens {
        let token = normalize_token(token.as_ref());
        if !seen.insert(token.clone()) {
            continue;
        }
        let Some(weights) = rules.get(&token) else {
            continue;
        };
        for entry in weights {
            accumulator.add(&entry.condition, entry.weight);
        }
    }

    accumulator.into_ranked()
}

/// `100 * value / max` as a float, rounded to one decimal place.
///
/// Rounding applies to the exact binary value of the float, ties to even, so a
/// tie only occurs when the quotient is exactly representable.
fn percent_of(value: u64, max: u64) -> f64 {
    let percentage = 100.0 * value as f64 / max as f64;
    format!("{percentage:.1}").parse().unwrap_or(percentage)
}
