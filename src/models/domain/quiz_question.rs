use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::contract::ContractViolation;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizQuestion {
    /// The quiz question, directly referencing information in the text.
    pub question: String,
    /// An array of exactly 4 possible answers (one correct, three plausible but incorrect distractors).
    pub options: Vec<String>,
    /// The correct answer, which must be an exact match to one of the strings in the 'options' array.
    pub correct_answer: String,
    /// A brief (1-2 sentence) explanation of why the correct answer is correct, based on the provided text.
    pub explanation: String,
}

impl QuizQuestion {
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(ContractViolation::WrongOptionCount {
                question: self.question.clone(),
                found: self.options.len(),
            });
        }

        if !self.options.contains(&self.correct_answer) {
            return Err(ContractViolation::CorrectAnswerNotAnOption {
                question: self.question.clone(),
            });
        }

        Ok(())
    }

    pub fn is_correct(&self, answer: Option<&str>) -> bool {
        answer == Some(self.correct_answer.as_str())
    }
}
