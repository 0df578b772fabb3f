use thiserror::Error;

/// Errors surfaced by the extraction engine and its upstream collaborators.
///
/// Only `InputAbsent` originates inside this crate: extraction of individual
/// fields never fails, it degrades to "not found". The OCR and rasterization
/// variants exist so callers wrapping the external recognition pipeline can
/// carry those failures through the same error type, distinguishable from a
/// claim where nothing matched.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no text was recognized in the submitted document")]
    InputAbsent,
    #[error("OCR engine failure: {0}")]
    OcrFailed(String),
    #[error("page rasterization failure: {0}")]
    RasterizationFailed(String),
    #[error("invalid extraction vocabulary: {0}")]
    InvalidVocabulary(String),
}
