//! Maturity zones and their numeric bands on the 1-12 scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest point of the maturity scale.
pub const SCALE_MIN: f64 = 1.0;

/// Highest point of the maturity scale.
pub const SCALE_MAX: f64 = 12.0;

/// Midpoint used when a group has no answers.
pub const SCALE_MIDPOINT: f64 = 5.5;

/// One of the four ordinal maturity zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Destructive,
    Emotional,
    Mature,
    Transcendent,
}

/// Inclusive numeric range on the maturity scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBand {
    pub min: f64,
    pub max: f64,
}

impl ZoneBand {
    /// Clamps a value into this band.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns true if the value lies inside the band (both ends inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Zone {
    /// All zones in ascending order.
    pub const ALL: [Zone; 4] = [
        Zone::Destructive,
        Zone::Emotional,
        Zone::Mature,
        Zone::Transcendent,
    ];

    /// Band an option's adjusted level is clamped into when no extreme
    /// indicator fired. Neighbouring bands overlap at their edges.
    pub fn scoring_band(&self) -> ZoneBand {
        match self {
            Zone::Destructive => ZoneBand { min: 1.0, max: 3.5 },
            Zone::Emotional => ZoneBand { min: 3.5, max: 6.5 },
            Zone::Mature => ZoneBand { min: 6.0, max: 9.5 },
            Zone::Transcendent => ZoneBand { min: 9.0, max: 12.0 },
        }
    }

    /// Lower bound of the non-overlapping classification interval.
    ///
    /// Intervals are closed-open `[lower, next lower)`, the last one closed at 12.
    pub fn classification_floor(&self) -> f64 {
        match self {
            Zone::Destructive => SCALE_MIN,
            Zone::Emotional => 3.5,
            Zone::Mature => 6.5,
            Zone::Transcendent => 9.5,
        }
    }

    /// Classifies a maturity value into exactly one zone.
    ///
    /// Values below the scale are treated as destructive and values above
    /// it as transcendent, so every finite input maps somewhere.
    pub fn classify(value: f64) -> Zone {
        Zone::ALL
            .iter()
            .rev()
            .copied()
            .find(|zone| value >= zone.classification_floor())
            .unwrap_or(Zone::Destructive)
    }

    /// Zero-based ordinal position.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Zone::Destructive => "Destructive",
            Zone::Emotional => "Emotional",
            Zone::Mature => "Mature",
            Zone::Transcendent => "Transcendent",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
