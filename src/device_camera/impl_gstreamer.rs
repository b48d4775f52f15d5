//! V4L2 webcam through a GStreamer `appsink` pipeline.

use crate::config::CameraConfig;
use crate::device_camera::interface::{CameraError, DeviceCamera};
use crate::image_blob::ImageBlob;
use crate::library::logger::interface::Logger;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use image::RgbImage;
use std::sync::{Arc, Mutex, PoisonError};

type LatestFrame = Arc<Mutex<Option<Arc<RgbImage>>>>;

pub struct DeviceCameraGstreamer {
    config: CameraConfig,
    pipeline: Mutex<Option<gst::Pipeline>>,
    latest: LatestFrame,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraGstreamer {
    pub fn new(config: CameraConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            pipeline: Mutex::new(None),
            latest: Arc::new(Mutex::new(None)),
            logger: logger.with_namespace("camera").with_namespace("gstreamer"),
        }
    }

    fn describe_pipeline(&self) -> String {
        format!(
            "v4l2src device={} ! videoconvert ! videoscale ! \
             video/x-raw,format=RGB,width={},height={} ! \
             appsink name=sink max-buffers=1 drop=true sync=false",
            self.config.device, self.config.width, self.config.height
        )
    }

    fn build_pipeline(&self) -> Result<gst::Pipeline, CameraError> {
        gst::init().map_err(|e| CameraError::DeviceUnavailable(e.to_string()))?;

        let pipeline = gst::parse::launch(&self.describe_pipeline())
            .map_err(|e| CameraError::Pipeline(e.to_string()))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| CameraError::Pipeline("launch did not produce a pipeline".to_string()))?;

        let sink = pipeline
            .by_name("sink")
            .and_then(|element| element.downcast::<gst_app::AppSink>().ok())
            .ok_or_else(|| CameraError::Pipeline("appsink missing".to_string()))?;

        let latest = self.latest.clone();
        sink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    let frame = frame_from_sample(&sample).ok_or(gst::FlowError::Error)?;
                    *latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(frame));
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        Ok(pipeline)
    }

    fn release(&self, pipeline: &gst::Pipeline) {
        if let Err(e) = pipeline.set_state(gst::State::Null) {
            let _ = self
                .logger
                .error(&format!("Failed to release pipeline: {}", e));
        }
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl DeviceCamera for DeviceCameraGstreamer {
    fn start(&self) -> Result<(), CameraError> {
        let _ = self
            .logger
            .info(&format!("Opening {}", self.config.device));

        let pipeline = self.build_pipeline()?;

        let started = pipeline
            .set_state(gst::State::Playing)
            .is_ok()
            && pipeline.state(gst::ClockTime::from_seconds(5)).0.is_ok();

        if !started {
            let error = bus_error(&pipeline).unwrap_or_else(|| {
                CameraError::DeviceUnavailable(format!("{} did not start", self.config.device))
            });
            self.release(&pipeline);
            return Err(error);
        }

        let previous = self
            .pipeline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(pipeline);
        if let Some(previous) = previous {
            let _ = previous.set_state(gst::State::Null);
        }

        let _ = self.logger.info("Camera streaming");
        Ok(())
    }

    fn stop(&self) -> Result<(), CameraError> {
        let pipeline = self
            .pipeline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(pipeline) = pipeline {
            self.release(&pipeline);
            let _ = self.logger.info("Camera released");
        }
        Ok(())
    }

    fn capture_frame(&self) -> Result<ImageBlob, CameraError> {
        if self
            .pipeline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
        {
            return Err(CameraError::NotStreaming);
        }
        let frame = self.preview().ok_or(CameraError::NoFrameYet)?;
        let blob = ImageBlob::jpeg_from_frame(
            &frame,
            self.config.width,
            self.config.height,
            self.config.jpeg_quality,
            &self.config.capture_file_name,
        )?;
        Ok(blob)
    }

    fn preview(&self) -> Option<Arc<RgbImage>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for DeviceCameraGstreamer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera during shutdown: {}", e));
        }
    }
}

fn frame_from_sample(sample: &gst::SampleRef) -> Option<RgbImage> {
    let info = gst_video::VideoInfo::from_caps(sample.caps()?).ok()?;
    let buffer = sample.buffer()?;
    let map = buffer.map_readable().ok()?;

    let width = info.width() as usize;
    let height = info.height() as usize;
    let stride = *info.stride().first()? as usize;
    let row = width * 3;

    let mut pixels = Vec::with_capacity(row * height);
    for line in map.as_slice().chunks(stride).take(height) {
        pixels.extend_from_slice(line.get(..row)?);
    }

    RgbImage::from_raw(info.width(), info.height(), pixels)
}

fn bus_error(pipeline: &gst::Pipeline) -> Option<CameraError> {
    let message = pipeline
        .bus()?
        .timed_pop_filtered(gst::ClockTime::ZERO, &[gst::MessageType::Error])?;

    match message.view() {
        gst::MessageView::Error(err) => {
            let error = err.error();
            let text = format!("{} ({})", error, err.debug().unwrap_or_default());
            if error.matches(gst::ResourceError::NotAuthorized)
                || text.to_lowercase().contains("permission denied")
            {
                Some(CameraError::PermissionDenied(text))
            } else {
                Some(CameraError::DeviceUnavailable(text))
            }
        }
        _ => None,
    }
}
