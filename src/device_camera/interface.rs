use crate::image_blob::ImageBlob;
use image::RgbImage;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("camera is not streaming")]
    NotStreaming,
    #[error("camera has not delivered a frame yet")]
    NoFrameYet,
    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
    #[error("camera pipeline error: {0}")]
    Pipeline(String),
}

/// A video capture device. At most one stream is held at a time.
pub trait DeviceCamera: Send + Sync {
    /// Acquires the device and starts streaming.
    fn start(&self) -> Result<(), CameraError>;

    /// Releases the device and unbinds the preview. Idempotent.
    fn stop(&self) -> Result<(), CameraError>;

    /// Encodes the current frame as a JPEG blob.
    fn capture_frame(&self) -> Result<ImageBlob, CameraError>;

    /// Latest frame for the live view, if streaming.
    fn preview(&self) -> Option<Arc<RgbImage>>;
}
