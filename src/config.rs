use chrono::Offset;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
    pub capture_file_name: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            jpeg_quality: 90,
            capture_file_name: "capture.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub predict_path: String,
    pub upload_field: String,
    pub request_timeout: Duration,
    /// Label shown when the endpoint omits one.
    pub placeholder_letter: String,
    pub logger_timezone: chrono::FixedOffset,
    pub camera: CameraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            predict_path: "/predict".to_string(),
            upload_field: "file".to_string(),
            request_timeout: Duration::from_secs(30),
            placeholder_letter: "?".to_string(),
            logger_timezone: local_offset(),
            camera: CameraConfig::default(),
        }
    }
}

fn local_offset() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
