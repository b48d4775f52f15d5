use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbImage;
use std::fmt;
use std::path::Path;

/// Image bytes carried by exactly one submission.
#[derive(Clone, PartialEq)]
pub struct ImageBlob {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file as-is. Type and size are the endpoint's business.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_for_path(path);
        Ok(Self::new(file_name, mime, bytes))
    }

    /// Draws `frame` onto a `width`x`height` raster and encodes it as JPEG.
    pub fn jpeg_from_frame(
        frame: &RgbImage,
        width: u32,
        height: u32,
        quality: u8,
        file_name: &str,
    ) -> Result<Self, image::ImageError> {
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        if frame.dimensions() == (width, height) {
            frame.write_with_encoder(encoder)?;
        } else {
            image::imageops::resize(frame, width, height, FilterType::Triangle)
                .write_with_encoder(encoder)?;
        }
        Ok(Self::new(file_name, "image/jpeg", bytes))
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
