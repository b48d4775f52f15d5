use crate::config::CameraConfig;
use crate::device_camera::interface::{CameraError, DeviceCamera};
use crate::image_blob::ImageBlob;
use crate::library::logger::interface::Logger;
use image::RgbImage;
use std::sync::Arc;

/// Stands in for the webcam in builds without the `webcam` feature.
/// Every start is refused, so no frame is ever produced.
pub struct DeviceCameraUnavailable {
    config: CameraConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraUnavailable {
    pub fn new(config: CameraConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("unavailable"),
        }
    }
}

impl DeviceCamera for DeviceCameraUnavailable {
    fn start(&self) -> Result<(), CameraError> {
        let _ = self.logger.error(&format!(
            "Cannot open {}: built without webcam support",
            self.config.device
        ));
        Err(CameraError::DeviceUnavailable(format!(
            "{} (built without webcam support)",
            self.config.device
        )))
    }

    fn stop(&self) -> Result<(), CameraError> {
        Ok(())
    }

    fn capture_frame(&self) -> Result<ImageBlob, CameraError> {
        Err(CameraError::NotStreaming)
    }

    fn preview(&self) -> Option<Arc<RgbImage>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    #[test]
    fn test_start_is_refused() {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        let camera = DeviceCameraUnavailable::new(CameraConfig::default(), logger);

        assert!(matches!(camera.start(), Err(CameraError::DeviceUnavailable(_))));
        assert!(matches!(camera.capture_frame(), Err(CameraError::NotStreaming)));
        assert!(camera.preview().is_none());
        assert!(camera.stop().is_ok());
    }
}
