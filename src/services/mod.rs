pub mod export_service;
pub mod extraction_service;
pub mod extractors;
pub mod generation_service;
pub mod history_service;
pub mod model_service;
pub mod session;
pub mod speech;
pub mod user_service;
