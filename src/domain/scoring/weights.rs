//! Question weight lookup table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::questionnaire::{Category, Phase, Question};

/// Weight applied to critical diagnostic questions.
pub const DEFAULT_CRITICAL_WEIGHT: f64 = 1.4;

/// Weight applied to validation-phase questions.
pub const DEFAULT_VALIDATION_WEIGHT: f64 = 0.85;

/// Data table resolving a question's weight.
///
/// Precedence: per-question override, then critical flag, then validation
/// phase, then category factor (1.0 when the category is not listed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub critical_weight: f64,
    pub validation_weight: f64,
    #[serde(default)]
    pub category_weights: BTreeMap<Category, f64>,
    #[serde(default)]
    pub question_overrides: HashMap<String, f64>,
}

impl WeightTable {
    pub fn with_category(mut self, category: Category, weight: f64) -> Self {
        self.category_weights.insert(category, weight);
        self
    }

    pub fn with_override(mut self, question_id: impl Into<String>, weight: f64) -> Self {
        self.question_overrides.insert(question_id.into(), weight);
        self
    }

    pub fn weight_for(&self, question: &Question) -> f64 {
        if let Some(weight) = self.question_overrides.get(&question.id) {
            return *weight;
        }
        if question.critical {
            return self.critical_weight;
        }
        if question.phase == Phase::Validation {
            return self.validation_weight;
        }
        self.category_weights
            .get(&question.category)
            .copied()
            .unwrap_or(1.0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            critical_weight: DEFAULT_CRITICAL_WEIGHT,
            validation_weight: DEFAULT_VALIDATION_WEIGHT,
            category_weights: BTreeMap::new(),
            question_overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{AnswerOption, AspectType, Zone};

    fn question(id: &str, phase: Phase, category: Category) -> Question {
        Question::new(
            id,
            phase,
            AspectType::Personal,
            category,
            vec![AnswerOption::new(format!("{id}_o"), 5, Zone::Emotional)],
        )
    }

    #[test]
    fn default_weight_is_one() {
        let table = WeightTable::default();
        assert_eq!(
            table.weight_for(&question("q", Phase::CoreDiagnostic, Category::Trust)),
            1.0
        );
    }

    #[test]
    fn validation_questions_are_weighted_down() {
        let table = WeightTable::default();
        assert_eq!(
            table.weight_for(&question("q", Phase::Validation, Category::Trust)),
            0.85
        );
    }

    #[test]
    fn critical_questions_are_weighted_up() {
        let table = WeightTable::default();
        let q = question("q", Phase::CoreDiagnostic, Category::Trust).as_critical();
        assert_eq!(table.weight_for(&q), 1.4);
    }

    #[test]
    fn critical_beats_validation_phase() {
        let table = WeightTable::default();
        let q = question("q", Phase::Validation, Category::Trust).as_critical();
        assert_eq!(table.weight_for(&q), 1.4);
    }

    #[test]
    fn category_factor_applies_to_ordinary_questions() {
        let table = WeightTable::default().with_category(Category::Conflict, 1.2);
        assert_eq!(
            table.weight_for(&question("q", Phase::Detection, Category::Conflict)),
            1.2
        );
        assert_eq!(
            table.weight_for(&question("q", Phase::Detection, Category::Trust)),
            1.0
        );
    }

    #[test]
    fn question_override_wins() {
        let table = WeightTable::default().with_override("special", 0.5);
        let q = question("special", Phase::CoreDiagnostic, Category::Trust).as_critical();
        assert_eq!(table.weight_for(&q), 0.5);
    }
}
