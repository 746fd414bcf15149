//! Zone confidence: how answers distribute over the four zones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::questionnaire::Zone;

/// Probability-like distribution over zones.
///
/// Always holds all four zones. Values sum to 1 once at least one answer
/// was counted; with no answers every value is zero and the distribution
/// is "undetermined".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneConfidence(BTreeMap<Zone, f64>);

impl ZoneConfidence {
    /// All-zero distribution.
    pub fn undetermined() -> Self {
        Self(Zone::ALL.iter().map(|zone| (*zone, 0.0)).collect())
    }

    pub fn get(&self, zone: Zone) -> f64 {
        self.0.get(&zone).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_undetermined(&self) -> bool {
        self.total() == 0.0
    }

    /// Zones by descending confidence; ties keep ascending zone order.
    pub fn ranked(&self) -> Vec<Zone> {
        let mut zones = Zone::ALL.to_vec();
        zones.sort_by(|a, b| self.get(*b).total_cmp(&self.get(*a)));
        zones
    }

    /// Most confident zone, if any answer was counted.
    pub fn dominant(&self) -> Option<Zone> {
        if self.is_undetermined() {
            None
        } else {
            self.ranked().first().copied()
        }
    }

    pub fn as_map(&self) -> &BTreeMap<Zone, f64> {
        &self.0
    }
}

impl Default for ZoneConfidence {
    fn default() -> Self {
        Self::undetermined()
    }
}

/// Counts each answered option's zone and normalizes by the total.
pub fn zone_confidence(zones: impl IntoIterator<Item = Zone>) -> ZoneConfidence {
    let mut counts: BTreeMap<Zone, usize> = Zone::ALL.iter().map(|zone| (*zone, 0)).collect();
    let mut total = 0usize;
    for zone in zones {
        *counts.entry(zone).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return ZoneConfidence::undetermined();
    }

    ZoneConfidence(
        counts
            .into_iter()
            .map(|(zone, count)| (zone, count as f64 / total as f64))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_answers_is_undetermined() {
        let confidence = zone_confidence(std::iter::empty());
        assert!(confidence.is_undetermined());
        assert_eq!(confidence.as_map().len(), 4);
        assert_eq!(confidence.dominant(), None);
    }

    #[test]
    fn normalizes_counts_to_one() {
        let confidence = zone_confidence([
            Zone::Mature,
            Zone::Mature,
            Zone::Emotional,
            Zone::Destructive,
        ]);
        assert_eq!(confidence.get(Zone::Mature), 0.5);
        assert_eq!(confidence.get(Zone::Emotional), 0.25);
        assert_eq!(confidence.get(Zone::Transcendent), 0.0);
        assert!((confidence.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ranked_orders_by_confidence_then_zone() {
        let confidence = zone_confidence([Zone::Transcendent, Zone::Emotional, Zone::Emotional]);
        assert_eq!(
            confidence.ranked(),
            vec![
                Zone::Emotional,
                Zone::Transcendent,
                Zone::Destructive,
                Zone::Mature
            ]
        );
        assert_eq!(confidence.dominant(), Some(Zone::Emotional));
    }

    #[test]
    fn values_are_never_negative() {
        let confidence = zone_confidence([Zone::Destructive]);
        assert!(confidence.as_map().values().all(|v| *v >= 0.0));
    }
}
