//! Questions and answer options.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::indicator::{Indicator, Polarity};
use super::phase::Phase;
use super::zone::Zone;

/// Which maturity score a question feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Personal,
    Relationship,
    /// Feeds both scores.
    Combined,
}

impl AspectType {
    pub fn feeds_personal(&self) -> bool {
        matches!(self, AspectType::Personal | AspectType::Combined)
    }

    pub fn feeds_relationship(&self) -> bool {
        matches!(self, AspectType::Relationship | AspectType::Combined)
    }
}

/// Thematic category of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Status,
    Attachment,
    Communication,
    Conflict,
    Intimacy,
    Boundaries,
    Trust,
    Autonomy,
    Growth,
    Values,
}

/// The respondent's declared relationship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    InRelationship,
    Single,
    Complicated,
    Separated,
}

/// Which respondents a question applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipContext {
    Both,
    InRelationship,
    Single,
    Complicated,
    Separated,
}

impl RelationshipContext {
    /// Returns true if a respondent with `status` may be asked the question.
    ///
    /// Before a status is declared only `Both` questions qualify.
    pub fn admits(&self, status: Option<RelationshipStatus>) -> bool {
        match (self, status) {
            (RelationshipContext::Both, _) => true,
            (_, None) => false,
            (RelationshipContext::InRelationship, Some(s)) => s == RelationshipStatus::InRelationship,
            (RelationshipContext::Single, Some(s)) => s == RelationshipStatus::Single,
            (RelationshipContext::Complicated, Some(s)) => s == RelationshipStatus::Complicated,
            (RelationshipContext::Separated, Some(s)) => s == RelationshipStatus::Separated,
        }
    }
}

/// Question wording with optional per-status variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionTextRepr")]
pub struct QuestionText {
    pub default: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<RelationshipStatus, String>,
}

impl QuestionText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            variants: BTreeMap::new(),
        }
    }

    pub fn with_variant(mut self, status: RelationshipStatus, text: impl Into<String>) -> Self {
        self.variants.insert(status, text.into());
        self
    }

    /// Picks the variant for the declared status, falling back to the default.
    pub fn for_status(&self, status: Option<RelationshipStatus>) -> &str {
        status
            .and_then(|s| self.variants.get(&s))
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

/// Accepts either a bare string or the full `{ default, variants }` form.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionTextRepr {
    Plain(String),
    Full {
        default: String,
        #[serde(default)]
        variants: BTreeMap<RelationshipStatus, String>,
    },
}

impl From<QuestionTextRepr> for QuestionText {
    fn from(repr: QuestionTextRepr) -> Self {
        match repr {
            QuestionTextRepr::Plain(default) => QuestionText::plain(default),
            QuestionTextRepr::Full { default, variants } => QuestionText { default, variants },
        }
    }
}

/// One selectable answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    /// Base maturity level, 1..=12.
    pub level: u8,
    pub zone: Zone,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub indicators: BTreeSet<Indicator>,
    /// Relationship status declared by choosing this option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RelationshipStatus>,
}

impl AnswerOption {
    pub fn new(id: impl Into<String>, level: u8, zone: Zone) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            level,
            zone,
            indicators: BTreeSet::new(),
            status: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_indicators(mut self, indicators: impl IntoIterator<Item = Indicator>) -> Self {
        self.indicators.extend(indicators);
        self
    }

    pub fn declaring(mut self, status: RelationshipStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Number of indicators with the given polarity.
    pub fn count(&self, polarity: Polarity) -> usize {
        self.indicators
            .iter()
            .filter(|indicator| indicator.polarity() == polarity)
            .count()
    }

    pub fn has_extreme_indicator(&self) -> bool {
        self.indicators.iter().any(Indicator::is_extreme)
    }

    pub fn has_extreme_high_indicator(&self) -> bool {
        self.indicators.iter().any(Indicator::is_extreme_high)
    }
}

/// An immutable questionnaire item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: QuestionText,
    pub category: Category,
    pub phase: Phase,
    pub aspect_type: AspectType,
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_context: Option<RelationshipContext>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_zones: Vec<Zone>,
    /// Critical diagnostic questions carry extra weight.
    #[serde(default)]
    pub critical: bool,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        phase: Phase,
        aspect_type: AspectType,
        category: Category,
        options: Vec<AnswerOption>,
    ) -> Self {
        let id = id.into();
        Self {
            text: QuestionText::plain(id.clone()),
            id,
            category,
            phase,
            aspect_type,
            options,
            relationship_context: None,
            target_zones: Vec::new(),
            critical: false,
        }
    }

    pub fn with_text(mut self, text: QuestionText) -> Self {
        self.text = text;
        self
    }

    pub fn with_context(mut self, context: RelationshipContext) -> Self {
        self.relationship_context = Some(context);
        self
    }

    pub fn with_target_zones(mut self, zones: impl IntoIterator<Item = Zone>) -> Self {
        self.target_zones = zones.into_iter().collect();
        self
    }

    pub fn as_critical(mut self) -> Self {
        self.critical = true;
        self
    }

    /// Text to show a respondent with the given status.
    pub fn text_for(&self, status: Option<RelationshipStatus>) -> &str {
        self.text.for_status(status)
    }

    /// Finds one of this question's options by id.
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// Option with the lowest level (first wins on ties).
    pub fn lowest_option(&self) -> Option<&AnswerOption> {
        self.options
            .iter()
            .reduce(|best, o| if o.level < best.level { o } else { best })
    }

    /// Option with the highest level (first wins on ties).
    pub fn highest_option(&self) -> Option<&AnswerOption> {
        self.options
            .iter()
            .reduce(|best, o| if o.level > best.level { o } else { best })
    }

    /// True if the question targets the given zone.
    pub fn targets(&self, zone: Zone) -> bool {
        self.target_zones.contains(&zone)
    }

    /// Eligibility: same phase, not yet answered, context admits the status.
    pub fn is_eligible(
        &self,
        phase: Phase,
        answered: &HashSet<&str>,
        status: Option<RelationshipStatus>,
    ) -> bool {
        self.phase == phase
            && !answered.contains(self.id.as_str())
            && self
                .relationship_context
                .map_or(true, |context| context.admits(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question::new(
            "conflict_style",
            Phase::CoreDiagnostic,
            AspectType::Relationship,
            Category::Conflict,
            vec![
                AnswerOption::new("a", 2, Zone::Destructive),
                AnswerOption::new("b", 5, Zone::Emotional),
                AnswerOption::new("c", 8, Zone::Mature),
                AnswerOption::new("d", 11, Zone::Transcendent),
            ],
        )
    }

    mod context {
        use super::*;

        #[test]
        fn both_admits_everyone() {
            assert!(RelationshipContext::Both.admits(None));
            assert!(RelationshipContext::Both.admits(Some(RelationshipStatus::Single)));
        }

        #[test]
        fn specific_context_requires_matching_status() {
            let ctx = RelationshipContext::InRelationship;
            assert!(ctx.admits(Some(RelationshipStatus::InRelationship)));
            assert!(!ctx.admits(Some(RelationshipStatus::Single)));
            assert!(!ctx.admits(None));
        }
    }

    mod text {
        use super::*;

        #[test]
        fn picks_variant_for_status() {
            let text = QuestionText::plain("How do you handle conflict?")
                .with_variant(RelationshipStatus::Single, "How did you handle conflict?");
            assert_eq!(
                text.for_status(Some(RelationshipStatus::Single)),
                "How did you handle conflict?"
            );
            assert_eq!(
                text.for_status(Some(RelationshipStatus::InRelationship)),
                "How do you handle conflict?"
            );
            assert_eq!(text.for_status(None), "How do you handle conflict?");
        }

        #[test]
        fn deserializes_plain_and_full_forms() {
            let plain: QuestionText = serde_yaml::from_str("\"Just text\"").unwrap();
            assert_eq!(plain.default, "Just text");

            let full: QuestionText =
                serde_yaml::from_str("default: Now\nvariants:\n  single: Then\n").unwrap();
            assert_eq!(full.for_status(Some(RelationshipStatus::Single)), "Then");
        }
    }

    mod options {
        use super::*;

        #[test]
        fn counts_by_polarity() {
            let option = AnswerOption::new("x", 5, Zone::Emotional).with_indicators([
                Indicator::Trust,
                Indicator::Empathy,
                Indicator::Jealousy,
                Indicator::AcuteTrauma,
            ]);
            assert_eq!(option.count(Polarity::Positive), 2);
            assert_eq!(option.count(Polarity::Negative), 1);
            assert_eq!(option.count(Polarity::ExtremeNegative), 1);
            assert!(option.has_extreme_indicator());
            assert!(!option.has_extreme_high_indicator());
        }

        #[test]
        fn finds_lowest_and_highest() {
            let question = sample_question();
            assert_eq!(question.lowest_option().unwrap().id, "a");
            assert_eq!(question.highest_option().unwrap().id, "d");
            assert_eq!(question.option("c").unwrap().level, 8);
            assert!(question.option("zz").is_none());
        }
    }

    mod eligibility {
        use super::*;

        #[test]
        fn requires_matching_phase() {
            let question = sample_question();
            let answered = HashSet::new();
            assert!(question.is_eligible(Phase::CoreDiagnostic, &answered, None));
            assert!(!question.is_eligible(Phase::Detection, &answered, None));
        }

        #[test]
        fn excludes_answered_questions() {
            let question = sample_question();
            let answered: HashSet<&str> = ["conflict_style"].into_iter().collect();
            assert!(!question.is_eligible(Phase::CoreDiagnostic, &answered, None));
        }

        #[test]
        fn respects_relationship_context() {
            let question = sample_question().with_context(RelationshipContext::Single);
            let answered = HashSet::new();
            assert!(question.is_eligible(
                Phase::CoreDiagnostic,
                &answered,
                Some(RelationshipStatus::Single)
            ));
            assert!(!question.is_eligible(
                Phase::CoreDiagnostic,
                &answered,
                Some(RelationshipStatus::InRelationship)
            ));
        }
    }

    #[test]
    fn aspect_type_routing() {
        assert!(AspectType::Combined.feeds_personal());
        assert!(AspectType::Combined.feeds_relationship());
        assert!(AspectType::Personal.feeds_personal());
        assert!(!AspectType::Personal.feeds_relationship());
        assert!(!AspectType::Relationship.feeds_personal());
    }
}
