use crate::capture_client::core::{Effect, Event};
use crate::device_camera::interface::DeviceCamera;
use crate::file_picker::interface::FilePicker;
use crate::image_blob::ImageBlob;
use crate::library::logger::interface::Logger;
use crate::predict_client::interface::{PredictClient, SubmitError};
use crate::prediction::PredictionResult;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    predict_client: Arc<dyn PredictClient + Send + Sync>,
    file_picker: Arc<dyn FilePicker + Send + Sync>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        predict_client: Arc<dyn PredictClient + Send + Sync>,
        file_picker: Arc<dyn FilePicker + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("effect"),
            device_camera,
            predict_client,
            file_picker,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::OpenFilePicker => {
                let paths = self.file_picker.pick();
                self.send(Event::PickerClosed(paths));
            }
            Effect::StartCamera => {
                let started = self.device_camera.start();
                self.send(Event::CameraStartDone(started));
            }
            Effect::StopCamera => {
                if let Err(e) = self.device_camera.stop() {
                    let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
                }
                self.send(Event::CameraStopDone);
            }
            Effect::CaptureFrame => {
                let captured = self.device_camera.capture_frame();
                self.send(Event::FrameCaptured(captured));
            }
            Effect::SubmitFile { path } => {
                let submitted = self.guarded_submit(|| self.submit_file(&path));
                self.send(Event::SubmitDone(submitted));
            }
            Effect::SubmitBlob { blob } => {
                let submitted = self.guarded_submit(|| self.predict_client.predict(&blob));
                self.send(Event::SubmitDone(submitted));
            }
            Effect::LoadResultImage { source } => {
                let image = self
                    .predict_client
                    .fetch_image(&source)
                    .and_then(|bytes| Ok(image::load_from_memory(&bytes)?.to_rgba8()))
                    .map(Arc::new);
                if let Err(e) = &image {
                    let _ = self
                        .logger
                        .error(&format!("Failed to load result image: {}", e));
                }
                self.send(Event::ResultImageLoaded { source, image });
            }
        }
    }

    fn submit_file(&self, path: &Path) -> Result<PredictionResult, SubmitError> {
        let blob = ImageBlob::from_path(path).map_err(|source| SubmitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.predict_client.predict(&blob)
    }

    /// A panicking submission still reports back so loading is cleared.
    fn guarded_submit<F>(&self, submit: F) -> Result<PredictionResult, SubmitError>
    where
        F: FnOnce() -> Result<PredictionResult, SubmitError>,
    {
        let submitted = panic::catch_unwind(AssertUnwindSafe(submit))
            .unwrap_or_else(|payload| Err(SubmitError::Aborted(panic_message(payload.as_ref()))));
        if let Err(e) = &submitted {
            let _ = self.logger.error(&format!("Submission failed: {}", e));
        }
        submitted
    }

    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.error("Client loop is gone, dropping event");
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}
