use std::path::Path;
use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    services::{
        extractors::{docx, pdf, ExtractorError},
        generation_service::GenerationService,
    },
};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const POWERPOINT_MIMES: [&str; 2] = [
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

pub const POWERPOINT_UNSUPPORTED: &str = "Automatic text extraction for PowerPoint files is not yet supported. Please copy and paste the text.";
pub const LEGACY_DOC_UNSUPPORTED: &str =
    "Legacy .doc files are not supported. Please save as .docx and try again.";
const NO_TEXT_FOUND: &str = "no text found";

/// A file handed over by the browser.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Lower-cased extension, empty when the name has none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// Resolved once per upload; extraction is a single match on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Image { mime_type: String },
    Pdf,
    Docx,
    Unsupported(String),
}

impl FileKind {
    pub fn resolve(file: &UploadedFile) -> Self {
        let mime = file.mime_type.trim().to_lowercase();
        let extension = file.extension();

        if mime.starts_with("image/") {
            return FileKind::Image { mime_type: mime };
        }
        if extension == "pdf" || mime == PDF_MIME {
            return FileKind::Pdf;
        }
        if extension == "docx" || mime == DOCX_MIME {
            return FileKind::Docx;
        }
        if matches!(extension.as_str(), "ppt" | "pptx") || POWERPOINT_MIMES.contains(&mime.as_str())
        {
            return FileKind::Unsupported(POWERPOINT_UNSUPPORTED.to_string());
        }
        if extension == "doc" {
            return FileKind::Unsupported(LEGACY_DOC_UNSUPPORTED.to_string());
        }
        // Browsers sometimes send images as application/octet-stream.
        if let Some(mime_type) = image_mime_for_extension(&extension) {
            return FileKind::Image {
                mime_type: mime_type.to_string(),
            };
        }

        FileKind::Unsupported(format!(
            "Unsupported file type: .{}. Please use an Image, PDF, or Word (.docx) document.",
            extension.to_uppercase()
        ))
    }
}

fn image_mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub struct ExtractionService {
    generation: Arc<GenerationService>,
}

impl ExtractionService {
    pub fn new(generation: Arc<GenerationService>) -> Self {
        Self { generation }
    }

    pub async fn extract(&self, file: &UploadedFile) -> AppResult<String> {
        let kind = FileKind::resolve(file);
        log::info!("Extracting text from '{}' as {:?}", file.name, kind);

        let text = match kind {
            FileKind::Image { mime_type } => {
                self.generation
                    .extract_text_from_image(&file.bytes, &mime_type)
                    .await?
            }
            FileKind::Pdf => self.run_extractor(file, pdf::extract_text).await?,
            FileKind::Docx => self.run_extractor(file, docx::extract_text).await?,
            FileKind::Unsupported(reason) => return Err(AppError::UnsupportedFormat(reason)),
        };

        if text.trim().is_empty() {
            return Err(AppError::extraction_failed(&file.name, NO_TEXT_FOUND));
        }
        Ok(text)
    }

    async fn run_extractor(
        &self,
        file: &UploadedFile,
        extractor: fn(&[u8]) -> Result<String, ExtractorError>,
    ) -> AppResult<String> {
        let bytes = file.bytes.clone();
        let outcome = tokio::task::spawn_blocking(move || extractor(&bytes))
            .await
            .map_err(|e| AppError::extraction_failed(&file.name, e.to_string()))?;

        outcome.map_err(|e| {
            log::error!("Extraction of '{}' failed: {}", file.name, e);
            AppError::extraction_failed(&file.name, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_service::MockModelService;

    fn file(name: &str, mime: &str) -> UploadedFile {
        UploadedFile::new(name, mime, b"bytes".to_vec())
    }

    fn service_with(mock: MockModelService) -> ExtractionService {
        ExtractionService::new(Arc::new(GenerationService::new(Arc::new(mock))))
    }

    #[test]
    fn resolve_follows_dispatch_order() {
        assert_eq!(
            FileKind::resolve(&file("scan.pdf", "image/png")),
            FileKind::Image {
                mime_type: "image/png".to_string()
            }
        );
        assert_eq!(FileKind::resolve(&file("notes.PDF", "")), FileKind::Pdf);
        assert_eq!(FileKind::resolve(&file("blob", PDF_MIME)), FileKind::Pdf);
        assert_eq!(FileKind::resolve(&file("essay.docx", "")), FileKind::Docx);
        assert_eq!(
            FileKind::resolve(&file("photo.jpeg", "application/octet-stream")),
            FileKind::Image {
                mime_type: "image/jpeg".to_string()
            }
        );
    }

    #[test]
    fn powerpoint_and_legacy_doc_get_guidance() {
        assert_eq!(
            FileKind::resolve(&file("deck.pptx", "")),
            FileKind::Unsupported(POWERPOINT_UNSUPPORTED.to_string())
        );
        assert_eq!(
            FileKind::resolve(&file("deck", POWERPOINT_MIMES[0])),
            FileKind::Unsupported(POWERPOINT_UNSUPPORTED.to_string())
        );
        assert_eq!(
            FileKind::resolve(&file("old.doc", "application/msword")),
            FileKind::Unsupported(LEGACY_DOC_UNSUPPORTED.to_string())
        );
    }

    #[test]
    fn generic_rejection_names_the_extension() {
        match FileKind::resolve(&file("data.csv", "text/csv")) {
            FileKind::Unsupported(reason) => {
                assert!(reason.starts_with("Unsupported file type: .CSV."));
                assert_ne!(reason, POWERPOINT_UNSUPPORTED);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[tokio::test]
    async fn pptx_upload_fails_without_calling_the_model() {
        let mut mock = MockModelService::new();
        mock.expect_complete().never();
        let service = service_with(mock);

        let err = service.extract(&file("slides.pptx", "")).await.unwrap_err();
        assert_eq!(
            err,
            AppError::UnsupportedFormat(POWERPOINT_UNSUPPORTED.to_string())
        );
    }

    #[tokio::test]
    async fn images_go_through_ocr() {
        let mut mock = MockModelService::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok("  Lecture 4: Enzymes \n".to_string()));
        let service = service_with(mock);

        let text = service.extract(&file("board.png", "image/png")).await.unwrap();
        assert_eq!(text, "Lecture 4: Enzymes");
    }

    #[tokio::test]
    async fn blank_ocr_result_is_extraction_failed() {
        let mut mock = MockModelService::new();
        mock.expect_complete().returning(|_| Ok(" \n ".to_string()));
        let service = service_with(mock);

        let err = service.extract(&file("blank.webp", "image/webp")).await.unwrap_err();
        assert_eq!(err, AppError::extraction_failed("blank.webp", "no text found"));
    }

    #[tokio::test]
    async fn corrupt_pdf_is_extraction_failed_with_filename() {
        let service = service_with(MockModelService::new());

        match service.extract(&file("broken.pdf", PDF_MIME)).await {
            Err(AppError::ExtractionFailed { filename, .. }) => assert_eq!(filename, "broken.pdf"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
