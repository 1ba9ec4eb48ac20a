use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz::{QuizSet, UserAnswers};

pub const FALLBACK_TITLE: &str = "General Quiz";
const TITLE_ENTITY_COUNT: usize = 3;

/// A completed quiz attempt. Written once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub timestamp: i64,
    pub quiz_data: QuizSet,
    pub user_answers: UserAnswers,
}

impl HistoryEntry {
    pub fn new(quiz_data: QuizSet, user_answers: UserAnswers, created_at: DateTime<Utc>) -> Self {
        HistoryEntry {
            id: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            title: title_for(&quiz_data),
            timestamp: created_at.timestamp_millis(),
            quiz_data,
            user_answers,
        }
    }
}

fn title_for(quiz: &QuizSet) -> String {
    let title = quiz
        .key_entities
        .iter()
        .take(TITLE_ENTITY_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}
