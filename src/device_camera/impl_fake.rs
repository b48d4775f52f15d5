use crate::config::CameraConfig;
use crate::device_camera::interface::{CameraError, DeviceCamera};
use crate::image_blob::ImageBlob;
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeCameraMode {
    Available,
    PermissionDenied,
    Missing,
}

pub struct DeviceCameraFake {
    config: CameraConfig,
    mode: FakeCameraMode,
    streaming: AtomicBool,
    frame: Mutex<Option<Arc<RgbImage>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn with_mode(
        config: CameraConfig,
        mode: FakeCameraMode,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            config,
            mode,
            streaming: AtomicBool::new(false),
            frame: Mutex::new(None),
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    fn next_frame(&self) -> Result<Arc<RgbImage>, CameraError> {
        let noise = Uniform::new_inclusive(0u8, 40u8)
            .map_err(|e| CameraError::Pipeline(e.to_string()))?;
        let mut rng = rand::rng();
        let (width, height) = (self.config.width, self.config.height);

        let frame = RgbImage::from_fn(width, height, |x, y| {
            let base = [
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ];
            let n = noise.sample(&mut rng);
            Rgb(base.map(|channel| channel.saturating_add(n)))
        });

        let frame = Arc::new(frame);
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());
        Ok(frame)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), CameraError> {
        let _ = self.logger.info("Starting camera...");
        match self.mode {
            FakeCameraMode::Available => {}
            FakeCameraMode::PermissionDenied => {
                return Err(CameraError::PermissionDenied("fake camera refused".to_string()))
            }
            FakeCameraMode::Missing => {
                return Err(CameraError::DeviceUnavailable(self.config.device.clone()))
            }
        }
        self.streaming.store(true, Ordering::SeqCst);
        self.next_frame()?;
        let _ = self.logger.info("Camera started");
        Ok(())
    }

    fn stop(&self) -> Result<(), CameraError> {
        if self.streaming.swap(false, Ordering::SeqCst) {
            let _ = self.logger.info("Camera stopped");
        }
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn capture_frame(&self) -> Result<ImageBlob, CameraError> {
        if !self.is_streaming() {
            return Err(CameraError::NotStreaming);
        }
        let _ = self.logger.info("Capturing frame...");
        let frame = self.next_frame()?;
        let blob = ImageBlob::jpeg_from_frame(
            &frame,
            self.config.width,
            self.config.height,
            self.config.jpeg_quality,
            &self.config.capture_file_name,
        )?;
        let _ = self.logger.info("Frame captured");
        Ok(blob)
    }

    fn preview(&self) -> Option<Arc<RgbImage>> {
        if !self.is_streaming() {
            return None;
        }
        self.next_frame().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn camera(mode: FakeCameraMode) -> DeviceCameraFake {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        DeviceCameraFake::with_mode(CameraConfig::default(), mode, logger)
    }

    #[test]
    fn test_capture_requires_stream() {
        let camera = camera(FakeCameraMode::Available);

        assert!(matches!(camera.capture_frame(), Err(CameraError::NotStreaming)));
        assert!(camera.preview().is_none());
    }

    #[test]
    fn test_capture_encodes_jpeg_at_target_size() {
        let camera = camera(FakeCameraMode::Available);
        camera.start().unwrap();

        let blob = camera.capture_frame().unwrap();
        let decoded = image::load_from_memory(&blob.bytes).unwrap();

        assert_eq!(blob.file_name, "capture.jpg");
        assert_eq!(blob.mime, "image/jpeg");
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn test_stop_releases_preview_and_is_idempotent() {
        let camera = camera(FakeCameraMode::Available);
        camera.start().unwrap();
        assert!(camera.preview().is_some());

        camera.stop().unwrap();
        camera.stop().unwrap();

        assert!(!camera.is_streaming());
        assert!(camera.preview().is_none());
    }

    #[test]
    fn test_start_failures() {
        let denied = camera(FakeCameraMode::PermissionDenied);
        let missing = camera(FakeCameraMode::Missing);

        assert!(matches!(denied.start(), Err(CameraError::PermissionDenied(_))));
        assert!(matches!(missing.start(), Err(CameraError::DeviceUnavailable(_))));
        assert!(!denied.is_streaming());
        assert!(!missing.is_streaming());
    }
}
