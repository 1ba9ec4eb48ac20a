use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::domain::contract::ContractViolation;
use crate::models::domain::quiz_question::QuizQuestion;

pub const NOT_ANSWERED: &str = "Not answered";

/// A generated quiz. Immutable once it has passed [`QuizSet::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizSet {
    /// A list of 5-10 key terms, people, places, or concepts from the provided text.
    pub key_entities: Vec<String>,
    /// An array of 5 unique multiple-choice questions based *only* on the provided text.
    pub quiz: Vec<QuizQuestion>,
}

impl QuizSet {
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.quiz.is_empty() {
            return Err(ContractViolation::EmptyQuiz);
        }
        self.quiz.iter().try_for_each(QuizQuestion::validate)
    }

    pub fn question_count(&self) -> usize {
        self.quiz.len()
    }

    pub fn grade(&self, answers: &UserAnswers) -> QuizScore {
        let review: Vec<QuestionReview> = self
            .quiz
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = answers.get(index);
                QuestionReview {
                    question: question.question.clone(),
                    your_answer: answer.unwrap_or(NOT_ANSWERED).to_string(),
                    correct_answer: question.correct_answer.clone(),
                    is_correct: question.is_correct(answer),
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        let correct = review.iter().filter(|r| r.is_correct).count();
        let total = self.quiz.len();
        let percent = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u8
        };

        QuizScore {
            correct,
            total,
            percent,
            review,
        }
    }
}

/// One slot per question; `None` is an unanswered question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UserAnswers(Vec<Option<String>>);

impl UserAnswers {
    pub fn for_quiz(quiz: &QuizSet) -> Self {
        UserAnswers(vec![None; quiz.question_count()])
    }

    pub fn from_slots(slots: Vec<Option<String>>) -> Self {
        UserAnswers(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn select(&mut self, index: usize, answer: impl Into<String>) -> AppResult<()> {
        let slots = self.0.len();
        let slot = self.0.get_mut(index).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Question index {} is out of range for {} questions",
                index, slots
            ))
        })?;
        *slot = Some(answer.into());
        Ok(())
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub percent: u8,
    pub review: Vec<QuestionReview>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}
