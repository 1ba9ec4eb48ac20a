#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Flashcard, FlashcardSet, QuizQuestion, QuizSet, SummaryResult};

    /// A well-formed question whose correct answer is always "Option A".
    pub fn sample_question(number: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("Question {}?", number),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_answer: "Option A".to_string(),
            explanation: format!("Explanation {}.", number),
        }
    }

    /// A valid quiz with `questions` questions and three key entities.
    pub fn sample_quiz(questions: usize) -> QuizSet {
        QuizSet {
            key_entities: vec![
                "Photosynthesis".to_string(),
                "Chlorophyll".to_string(),
                "Glucose".to_string(),
            ],
            quiz: (1..=questions).map(sample_question).collect(),
        }
    }

    pub fn sample_summary() -> SummaryResult {
        SummaryResult {
            title: "Photosynthesis".to_string(),
            summary: "Plants convert light into chemical energy.".to_string(),
        }
    }

    pub fn sample_flashcards() -> FlashcardSet {
        FlashcardSet {
            key_concepts: vec!["Energy".to_string()],
            flashcards: vec![Flashcard {
                term: "Chlorophyll".to_string(),
                definition: "The green pigment that absorbs light.".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_quiz_is_valid() {
        let quiz = sample_quiz(5);
        assert_eq!(quiz.quiz.len(), 5);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_fixtures_are_valid() {
        assert!(sample_summary().validate().is_ok());
        assert!(sample_flashcards().validate().is_ok());
        assert_eq!(sample_question(2).question, "Question 2?");
    }
}
