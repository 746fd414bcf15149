//! YAML Question Source - loads the question bank from authored YAML.
//!
//! The document is either a top-level `questions:` list or a bare list of
//! questions. A bank compiled into the binary is available through
//! [`YamlQuestionSource::embedded`].

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::questionnaire::{Question, QuestionBank};
use crate::ports::{QuestionBankSource, QuestionSourceError};

const EMBEDDED_BANK: &str = include_str!("../../../data/question_bank.yaml");

#[derive(Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Wrapped { questions: Vec<Question> },
    List(Vec<Question>),
}

impl BankDocument {
    fn into_questions(self) -> Vec<Question> {
        match self {
            BankDocument::Wrapped { questions } | BankDocument::List(questions) => questions,
        }
    }
}

#[derive(Debug, Clone)]
enum Origin {
    Embedded,
    File(PathBuf),
}

/// Question bank source backed by YAML content.
///
/// # Usage
///
/// ```rust,ignore
/// let bank = YamlQuestionSource::from_path("banks/custom.yaml").load()?;
/// ```
#[derive(Debug, Clone)]
pub struct YamlQuestionSource {
    origin: Origin,
}

impl YamlQuestionSource {
    /// Reads the bank from a file each time `load` is called.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
        }
    }

    /// The bank bundled with the binary.
    pub fn embedded() -> Self {
        Self {
            origin: Origin::Embedded,
        }
    }

    /// Parses and validates YAML text.
    pub fn parse(yaml: &str) -> Result<QuestionBank, QuestionSourceError> {
        let document: BankDocument =
            serde_yaml::from_str(yaml).map_err(|e| QuestionSourceError::Parse(e.to_string()))?;
        Ok(QuestionBank::new(document.into_questions())?)
    }
}

impl QuestionBankSource for YamlQuestionSource {
    fn load(&self) -> Result<QuestionBank, QuestionSourceError> {
        let bank = match &self.origin {
            Origin::Embedded => Self::parse(EMBEDDED_BANK)?,
            Origin::File(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    tracing::error!(path = %path.display(), error = %e, "failed to read question bank");
                    QuestionSourceError::Read {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Self::parse(&yaml)?
            }
        };

        tracing::info!(
            source = %self.describe(),
            questions = bank.len(),
            "question bank loaded"
        );
        Ok(bank)
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::Embedded => "embedded".to_string(),
            Origin::File(path) => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{Phase, QuestionBankError, Zone};
    use std::collections::HashSet;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
- id: q1
  text: How are you?
  category: trust
  phase: detection
  aspect_type: personal
  options:
    - { id: q1_low, text: Bad, level: 2, zone: destructive, indicators: [shame] }
    - { id: q1_high, text: Good, level: 8, zone: mature }
"#;

    mod embedded {
        use super::*;

        #[test]
        fn loads_and_validates() {
            let bank = YamlQuestionSource::embedded().load().unwrap();
            assert!(bank.len() > 20);
            assert_eq!(bank.questions()[0].phase, Phase::RelationshipStatus);
        }

        #[test]
        fn every_question_phase_has_content() {
            let bank = YamlQuestionSource::embedded().load().unwrap();
            let phases: HashSet<Phase> = bank.questions().iter().map(|q| q.phase).collect();
            for phase in Phase::QUESTION_PHASES {
                assert!(phases.contains(&phase), "no questions for {phase:?}");
            }
        }

        #[test]
        fn clarification_covers_every_zone() {
            let bank = YamlQuestionSource::embedded().load().unwrap();
            for zone in Zone::ALL {
                assert!(
                    bank.questions()
                        .iter()
                        .any(|q| q.phase == Phase::Clarification && q.targets(zone)),
                    "no clarification question targets {zone:?}"
                );
            }
        }

        #[test]
        fn options_run_from_least_to_most_mature() {
            let bank = YamlQuestionSource::embedded().load().unwrap();
            for question in bank.questions() {
                let levels: Vec<u8> = question.options.iter().map(|o| o.level).collect();
                let mut sorted = levels.clone();
                sorted.sort_unstable();
                assert_eq!(levels, sorted, "options of {} are out of order", question.id);
            }
        }

        #[test]
        fn describe_names_the_origin() {
            assert_eq!(YamlQuestionSource::embedded().describe(), "embedded");
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn accepts_a_bare_list() {
            let bank = YamlQuestionSource::parse(MINIMAL).unwrap();
            assert_eq!(bank.len(), 1);
            assert_eq!(bank.resolve_option("q1_high").unwrap().level, 8);
        }

        #[test]
        fn accepts_a_questions_key() {
            let wrapped = format!("questions:\n{}", MINIMAL.replace('\n', "\n  "));
            let bank = YamlQuestionSource::parse(&wrapped).unwrap();
            assert_eq!(bank.len(), 1);
        }

        #[test]
        fn malformed_yaml_is_a_parse_error() {
            let result = YamlQuestionSource::parse("questions: [ {id: ");
            assert!(matches!(result, Err(QuestionSourceError::Parse(_))));
        }

        #[test]
        fn unknown_indicator_is_a_parse_error() {
            let yaml = MINIMAL.replace("[shame]", "[grumpiness]");
            assert!(matches!(
                YamlQuestionSource::parse(&yaml),
                Err(QuestionSourceError::Parse(_))
            ));
        }

        #[test]
        fn inconsistent_bank_is_rejected() {
            let yaml = MINIMAL.replace("level: 8", "level: 13");
            assert!(matches!(
                YamlQuestionSource::parse(&yaml),
                Err(QuestionSourceError::Invalid(QuestionBankError::LevelOutOfRange { .. }))
            ));
        }
    }

    mod files {
        use super::*;

        #[test]
        fn loads_from_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("bank.yaml");
            std::fs::write(&path, MINIMAL).unwrap();

            let source = YamlQuestionSource::from_path(&path);
            assert_eq!(source.load().unwrap().len(), 1);
            assert_eq!(source.describe(), path.display().to_string());
        }

        #[test]
        fn missing_file_is_a_read_error() {
            let temp_dir = TempDir::new().unwrap();
            let source = YamlQuestionSource::from_path(temp_dir.path().join("absent.yaml"));
            assert!(matches!(
                source.load(),
                Err(QuestionSourceError::Read { .. })
            ));
        }
    }
}
