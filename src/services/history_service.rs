use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{HistoryEntry, QuizSet, UserAnswers},
    repositories::{KeyValueStore, HISTORY_KEY},
};

pub const HISTORY_CAPACITY: usize = 20;

/// Completed quiz attempts, newest first, capped at [`HISTORY_CAPACITY`].
pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryService {
    /// Reads the persisted list once. Unreadable history is logged and treated as empty.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_KEY).await {
            Ok(Some(raw)) => serde_json::from_str::<Vec<HistoryEntry>>(&raw).unwrap_or_else(|e| {
                log::error!("Failed to parse stored quiz history, starting empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("Failed to read stored quiz history, starting empty: {}", e);
                Vec::new()
            }
        };
        log::info!("Loaded {} quiz history entries", entries.len());

        Self {
            store,
            entries: RwLock::new(entries),
        }
    }

    pub async fn record(&self, quiz: QuizSet, answers: UserAnswers) -> AppResult<HistoryEntry> {
        self.record_at(quiz, answers, Utc::now()).await
    }

    pub async fn record_at(
        &self,
        quiz: QuizSet,
        answers: UserAnswers,
        created_at: DateTime<Utc>,
    ) -> AppResult<HistoryEntry> {
        if answers.len() != quiz.question_count() {
            return Err(AppError::ValidationError(format!(
                "Expected {} answers, got {}",
                quiz.question_count(),
                answers.len()
            )));
        }

        let entry = HistoryEntry::new(quiz, answers, created_at);

        let mut entries = self.entries.write().await;
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_CAPACITY);
        self.persist(&entries).await;

        Ok(entry)
    }

    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    pub async fn load(&self, id: &str) -> AppResult<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("History entry with id '{}' not found", id)))
    }

    async fn persist(&self, entries: &[HistoryEntry]) {
        let result = match serde_json::to_string(entries) {
            Ok(raw) => self.store.set(HISTORY_KEY, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            log::error!("Failed to save quiz history: {}", e);
        }
    }
}
