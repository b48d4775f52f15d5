use alphabet::AlphabetReference;
use capture_client::main::CaptureClient;
use capture_client::render::Render;
use config::Config;
use device_camera::interface::DeviceCamera;
use file_picker::impl_rfd::FilePickerRfd;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use predict_client::impl_http::PredictClientHttp;
use std::sync::Arc;

mod alphabet;
mod capture_client;
mod config;
mod device_camera;
mod file_picker;
mod image_blob;
mod library;
mod predict_client;
mod prediction;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera = new_device_camera(&config, logger.clone());

    let predict_client = Arc::new(PredictClientHttp::new(&config, logger.clone())?);

    let file_picker = Arc::new(FilePickerRfd::new(logger.clone()));

    let client = CaptureClient::new(
        config,
        AlphabetReference::asl(),
        logger.clone(),
        device_camera,
        predict_client,
        file_picker,
    );

    let runner = client.clone();
    std::thread::spawn(move || {
        if let Err(e) = runner.run() {
            let _ = runner.logger.error(&format!("Client loop stopped: {}", e));
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let window = Render::new(client.clone());
    let shown = eframe::run_native(
        "Sign Language Detector",
        options,
        Box::new(|_cc| Box::new(window)),
    );

    client.shutdown();

    shown.map_err(|e| format!("window failed: {}", e))?;

    Ok(())
}

#[cfg(feature = "webcam")]
fn new_device_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    Arc::new(device_camera::impl_gstreamer::DeviceCameraGstreamer::new(
        config.camera.clone(),
        logger,
    ))
}

#[cfg(not(feature = "webcam"))]
fn new_device_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    Arc::new(
        device_camera::impl_unavailable::DeviceCameraUnavailable::new(
            config.camera.clone(),
            logger,
        ),
    )
}
