//! The immutable question bank and its lazily built option index.

use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::phase::Phase;
use super::question::{AnswerOption, Question, RelationshipStatus};

/// Errors raised while constructing a bank from authored content.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuestionBankError {
    #[error("Question bank contains no questions")]
    Empty,

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("Duplicate option id: {0}")]
    DuplicateOptionId(String),

    #[error("Question '{0}' has no options")]
    NoOptions(String),

    #[error("Question '{0}' belongs to the completed phase")]
    CompletedPhase(String),

    #[error("Option '{option_id}' of question '{question_id}' has level {level}, expected 1..=12")]
    LevelOutOfRange {
        question_id: String,
        option_id: String,
        level: u8,
    },

    #[error("Option '{option_id}' of status question '{question_id}' declares no relationship status")]
    MissingStatus {
        question_id: String,
        option_id: String,
    },
}

/// Failed lookups against the bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Unknown option '{option_id}' for question '{question_id}'")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct OptionLocation {
    question: usize,
    option: usize,
}

/// Immutable catalog of questions in declaration order.
///
/// Safe to share between sessions: the only interior state is the option
/// index, which is written exactly once.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
    option_index: OnceCell<HashMap<String, OptionLocation>>,
}

impl QuestionBank {
    /// Validates authored questions and builds the bank.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        let mut by_id = HashMap::with_capacity(questions.len());
        let mut option_ids = HashSet::new();

        for (position, question) in questions.iter().enumerate() {
            if by_id.insert(question.id.clone(), position).is_some() {
                return Err(QuestionBankError::DuplicateQuestionId(question.id.clone()));
            }
            if question.phase == Phase::Completed {
                return Err(QuestionBankError::CompletedPhase(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(QuestionBankError::NoOptions(question.id.clone()));
            }
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(QuestionBankError::DuplicateOptionId(option.id.clone()));
                }
                if !(1..=12).contains(&option.level) {
                    return Err(QuestionBankError::LevelOutOfRange {
                        question_id: question.id.clone(),
                        option_id: option.id.clone(),
                        level: option.level,
                    });
                }
                if question.phase == Phase::RelationshipStatus && option.status.is_none() {
                    return Err(QuestionBankError::MissingStatus {
                        question_id: question.id.clone(),
                        option_id: option.id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            questions,
            by_id,
            option_index: OnceCell::new(),
        })
    }

    /// All questions in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Looks up a question by id.
    pub fn question(&self, question_id: &str) -> Result<&Question, LookupError> {
        self.by_id
            .get(question_id)
            .map(|&position| &self.questions[position])
            .ok_or_else(|| LookupError::UnknownQuestion(question_id.to_string()))
    }

    /// Questions eligible in `phase`, in declaration order.
    pub fn eligible<'a>(
        &'a self,
        phase: Phase,
        answered: &'a HashSet<&'a str>,
        status: Option<RelationshipStatus>,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |question| question.is_eligible(phase, answered, status))
    }

    /// First eligible question in declaration order.
    pub fn next_eligible_question(
        &self,
        phase: Phase,
        answered: &HashSet<&str>,
        status: Option<RelationshipStatus>,
    ) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.is_eligible(phase, answered, status))
    }

    /// Resolves an option id to its option, building the index on first use.
    pub fn resolve_option(&self, option_id: &str) -> Result<&AnswerOption, LookupError> {
        self.index()
            .get(option_id)
            .map(|location| &self.questions[location.question].options[location.option])
            .ok_or_else(|| LookupError::UnknownOption {
                question_id: String::new(),
                option_id: option_id.to_string(),
            })
    }

    /// Resolves an answer, checking the option belongs to the question.
    pub fn resolve_answer(
        &self,
        question_id: &str,
        option_id: &str,
    ) -> Result<(&Question, &AnswerOption), LookupError> {
        let question = self.question(question_id)?;
        let unknown_option = || LookupError::UnknownOption {
            question_id: question_id.to_string(),
            option_id: option_id.to_string(),
        };

        let location = self.index().get(option_id).ok_or_else(unknown_option)?;
        if self.questions[location.question].id != question.id {
            return Err(unknown_option());
        }
        Ok((question, &question.options[location.option]))
    }

    fn index(&self) -> &HashMap<String, OptionLocation> {
        self.option_index.get_or_init(|| {
            let index: HashMap<String, OptionLocation> = self
                .questions
                .iter()
                .enumerate()
                .flat_map(|(q, question)| {
                    question.options.iter().enumerate().map(move |(o, option)| {
                        (
                            option.id.clone(),
                            OptionLocation {
                                question: q,
                                option: o,
                            },
                        )
                    })
                })
                .collect();
            tracing::debug!(options = index.len(), "built option index");
            index
        })
    }

    #[cfg(test)]
    fn index_is_built(&self) -> bool {
        self.option_index.get().is_some()
    }
}
