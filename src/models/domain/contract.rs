use thiserror::Error;

/// A model payload that parsed but breaks an invariant the rest of the app relies on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("quiz contains no questions")]
    EmptyQuiz,

    #[error("question \"{question}\" does not have 4 options (found {found})")]
    WrongOptionCount { question: String, found: usize },

    #[error("correct answer for \"{question}\" is not listed in its options")]
    CorrectAnswerNotAnOption { question: String },

    #[error("summary is missing its {0}")]
    EmptySummaryField(&'static str),

    #[error("no flashcards were generated")]
    EmptyFlashcards,

    #[error("flashcard #{index} has an empty term or definition")]
    BlankFlashcard { index: usize },
}
