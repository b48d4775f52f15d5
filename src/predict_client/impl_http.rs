use crate::config::Config;
use crate::image_blob::ImageBlob;
use crate::library::logger::interface::Logger;
use crate::predict_client::interface::{PredictClient, SubmitError};
use crate::prediction::{ErrorBody, PredictionResult};
use base64::Engine;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use std::sync::Arc;
use url::Url;

pub struct PredictClientHttp {
    client: Client,
    base_url: Url,
    predict_url: Url,
    upload_field: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PredictClientHttp {
    pub fn new(config: &Config, logger: Arc<dyn Logger + Send + Sync>) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let base_url = Url::parse(&config.server_url)?;
        let predict_url = base_url.join(&config.predict_path)?;

        Ok(Self {
            client,
            base_url,
            predict_url,
            upload_field: config.upload_field.clone(),
            logger: logger.with_namespace("predict_client").with_namespace("http"),
        })
    }

    #[cfg(test)]
    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    fn reject(&self, response: Response) -> SubmitError {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());

        let _ = self
            .logger
            .error(&format!("{} answered {}: {}", self.predict_url, status, message));

        SubmitError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl PredictClient for PredictClientHttp {
    fn predict(&self, image: &ImageBlob) -> Result<PredictionResult, SubmitError> {
        let _ = self.logger.info(&format!(
            "POST {} ({} bytes, {})",
            self.predict_url,
            image.bytes.len(),
            image.file_name
        ));

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)?;
        let form = Form::new().part(self.upload_field.clone(), part);

        let response = self
            .client
            .post(self.predict_url.clone())
            .multipart(form)
            .send()?;

        if !response.status().is_success() {
            return Err(self.reject(response));
        }

        let body = response.text()?;
        let prediction: PredictionResult = serde_json::from_str(&body)?;

        let _ = self.logger.info(&format!("Prediction: {:?}", prediction));
        Ok(prediction)
    }

    fn fetch_image(&self, source: &str) -> Result<Vec<u8>, SubmitError> {
        if source.starts_with("data:") {
            return decode_data_uri(source);
        }

        let url = self.base_url.join(source)?;
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(self.reject(response));
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Decodes `data:<mime>;base64,<payload>`.
pub fn decode_data_uri(source: &str) -> Result<Vec<u8>, SubmitError> {
    let invalid = || SubmitError::InvalidImageSource(truncate(source));

    let rest = source.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if !header.ends_with(";base64") {
        return Err(invalid());
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid())
}

fn truncate(source: &str) -> String {
    source.chars().take(48).collect()
}
