use crate::{errors::AppResult, models::domain::QuizSet};

pub const EXPORT_FILENAME: &str = "quiz.json";

/// Indented JSON of the whole quiz. Field order is fixed by the type, so the output is stable.
pub fn export_quiz_json(quiz: &QuizSet) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(quiz)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::sample_quiz;

    #[test]
    fn export_is_byte_identical_across_calls() {
        let quiz = sample_quiz(5);
        assert_eq!(export_quiz_json(&quiz).unwrap(), export_quiz_json(&quiz).unwrap());
    }

    #[test]
    fn export_is_indented_and_complete() {
        let json = export_quiz_json(&sample_quiz(1)).unwrap();

        assert!(json.starts_with("{\n  \"keyEntities\""));
        assert!(json.contains("\"correctAnswer\": \"Option A\""));
        assert!(json.contains("\"explanation\": \"Explanation 1.\""));
        let parsed: QuizSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_quiz(1));
    }
}
