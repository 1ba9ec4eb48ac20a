use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{FileKeyValueStore, KeyValueStore},
    services::{
        extraction_service::ExtractionService,
        generation_service::GenerationService,
        history_service::HistoryService,
        model_service::{ModelService, OpenAiModelService},
        session::StudySession,
        speech::{Dictation, RelayedSpeechSource, SpeechSource},
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<GenerationService>,
    pub extraction_service: Arc<ExtractionService>,
    pub history_service: Arc<HistoryService>,
    pub user_service: Arc<UserService>,
    pub session: Arc<Mutex<StudySession>>,
    pub dictation: Arc<Mutex<Dictation>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let model: Arc<dyn ModelService> = Arc::new(OpenAiModelService::new(&config));
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&config.data_dir));
        let speech: Option<Box<dyn SpeechSource>> = if config.dictation_enabled {
            Some(Box::new(RelayedSpeechSource::new()))
        } else {
            log::info!("Dictation disabled by configuration");
            None
        };

        Ok(Self::from_parts(config, model, store, speech).await)
    }

    /// Wires the services around an explicit model, store and speech source.
    pub async fn from_parts(
        config: Config,
        model: Arc<dyn ModelService>,
        store: Arc<dyn KeyValueStore>,
        speech: Option<Box<dyn SpeechSource>>,
    ) -> Self {
        let generation_service = Arc::new(GenerationService::new(model));
        let extraction_service = Arc::new(ExtractionService::new(generation_service.clone()));
        let history_service = Arc::new(HistoryService::open(store.clone()).await);
        let user_service = Arc::new(UserService::open(store).await);

        Self {
            generation_service,
            extraction_service,
            history_service,
            user_service,
            session: Arc::new(Mutex::new(StudySession::new())),
            dictation: Arc::new(Mutex::new(Dictation::new(speech))),
            config: Arc::new(config),
        }
    }
}
