use crate::image_blob::ImageBlob;
use crate::predict_client::impl_http::decode_data_uri;
use crate::predict_client::interface::{PredictClient, SubmitError};
use crate::prediction::PredictionResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub enum FakeResponse {
    Prediction(PredictionResult),
    Status(u16),
    Panic,
}

/// Answers every submission with the same canned response.
pub struct PredictClientFake {
    response: FakeResponse,
    submitted: Mutex<Vec<ImageBlob>>,
    calls: AtomicUsize,
}

impl PredictClientFake {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response,
            submitted: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<ImageBlob> {
        self.submitted
            .lock()
            .map(|submitted| submitted.clone())
            .unwrap_or_default()
    }
}

impl PredictClient for PredictClientFake {
    fn predict(&self, image: &ImageBlob) -> Result<PredictionResult, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(image.clone());
        }

        match &self.response {
            FakeResponse::Prediction(prediction) => Ok(prediction.clone()),
            FakeResponse::Status(status) => Err(SubmitError::Status {
                status: *status,
                message: "fake failure".to_string(),
            }),
            FakeResponse::Panic => panic!("fake endpoint panicked"),
        }
    }

    fn fetch_image(&self, source: &str) -> Result<Vec<u8>, SubmitError> {
        decode_data_uri(source)
    }
}
