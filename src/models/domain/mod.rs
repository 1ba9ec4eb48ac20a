pub mod contract;
pub mod flashcard;
pub mod history_entry;
pub mod quiz;
pub mod quiz_question;
pub mod summary;
pub mod user;

pub use contract::ContractViolation;
pub use flashcard::{Flashcard, FlashcardSet};
pub use history_entry::HistoryEntry;
pub use quiz::{QuizScore, QuizSet, UserAnswers};
pub use quiz_question::QuizQuestion;
pub use summary::SummaryResult;
pub use user::User;
