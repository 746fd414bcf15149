//! Assessment engine configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::scoring::WeightTable;

/// Assessment configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentConfig {
    /// YAML question bank; the embedded default bank is used when unset
    pub question_bank_path: Option<PathBuf>,

    /// Question weights
    #[serde(default)]
    pub weights: WeightConfig,
}

/// Scoring weights for special question groups
#[derive(Debug, Clone, Deserialize)]
pub struct WeightConfig {
    #[serde(default = "default_critical_weight")]
    pub critical_weight: f64,

    #[serde(default = "default_validation_weight")]
    pub validation_weight: f64,
}

impl WeightConfig {
    /// Builds the weight table used by the scorer.
    pub fn to_table(&self) -> WeightTable {
        WeightTable {
            critical_weight: self.critical_weight,
            validation_weight: self.validation_weight,
            ..WeightTable::default()
        }
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            critical_weight: default_critical_weight(),
            validation_weight: default_validation_weight(),
        }
    }
}

impl AssessmentConfig {
    /// Validate assessment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("critical_weight", self.weights.critical_weight)?;
        positive("validation_weight", self.weights.validation_weight)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveWeight(name))
    }
}

fn default_critical_weight() -> f64 {
    crate::domain::scoring::DEFAULT_CRITICAL_WEIGHT
}

fn default_validation_weight() -> f64 {
    crate::domain::scoring::DEFAULT_VALIDATION_WEIGHT
}
