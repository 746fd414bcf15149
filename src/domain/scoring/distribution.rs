//! Weighted histogram of adjusted levels.

use std::collections::BTreeMap;

use super::weights::WeightTable;
use super::{adjusted_level, round_to, ScoredAnswer};

/// Percentage of weight falling on each integer level 1..=12.
///
/// Every level is present. With at least one answer the percentages sum to
/// 100 up to rounding; without answers they are all zero.
pub fn level_distribution(answers: &[ScoredAnswer<'_>], weights: &WeightTable) -> BTreeMap<u8, f64> {
    let mut buckets: BTreeMap<u8, f64> = (1..=12).map(|level| (level, 0.0)).collect();
    let mut total = 0.0;
    for answer in answers {
        let level = adjusted_level(answer.option).value.round().clamp(1.0, 12.0) as u8;
        let weight = weights.weight_for(answer.question);
        *buckets.entry(level).or_insert(0.0) += weight;
        total += weight;
    }

    if total > 0.0 {
        for value in buckets.values_mut() {
            *value = round_to(*value / total * 100.0, 1);
        }
    }
    buckets
}
