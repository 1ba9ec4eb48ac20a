use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::contract::ContractViolation;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Flashcard {
    /// The key term, name, or concept for the front of the flashcard.
    pub term: String,
    /// A clear and concise definition or explanation for the back of the flashcard, derived directly from the text.
    pub definition: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlashcardSet {
    /// A list of 3-5 high-level concepts covered in the material.
    pub key_concepts: Vec<String>,
    /// An array of 5-10 flashcards. Each flashcard should focus on a single, specific term or concept from the text.
    pub flashcards: Vec<Flashcard>,
}

impl FlashcardSet {
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.flashcards.is_empty() {
            return Err(ContractViolation::EmptyFlashcards);
        }

        match self
            .flashcards
            .iter()
            .position(|card| card.term.trim().is_empty() || card.definition.trim().is_empty())
        {
            Some(index) => Err(ContractViolation::BlankFlashcard { index: index + 1 }),
            None => Ok(()),
        }
    }
}
