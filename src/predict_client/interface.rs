use crate::image_blob::ImageBlob;
use crate::prediction::PredictionResult;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("endpoint answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("endpoint body is not a prediction: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("unsupported image source: {0}")]
    InvalidImageSource(String),
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("submission aborted: {0}")]
    Aborted(String),
}

/// The external classification endpoint.
pub trait PredictClient: Send + Sync {
    /// One POST, no retry.
    fn predict(&self, image: &ImageBlob) -> Result<PredictionResult, SubmitError>;

    /// Bytes of an image referenced by a prediction (data URI or URL).
    fn fetch_image(&self, source: &str) -> Result<Vec<u8>, SubmitError>;
}
