use crate::alphabet::AlphabetReference;
use crate::capture_client::core::{CameraState, Event, NoticeLevel, State};
use crate::capture_client::main::CaptureClient;
use egui::load::SizedTexture;
use egui::{Color32, RichText, TextureHandle, TextureOptions};
use image::{RgbImage, RgbaImage};
use std::sync::Arc;
use std::time::Duration;

const ACCENT: Color32 = Color32::from_rgb(0x2a, 0x52, 0x98);
const ACCENT_DARK: Color32 = Color32::from_rgb(0x1e, 0x3c, 0x72);
const DROP_IDLE: Color32 = Color32::from_rgb(0xf8, 0xfa, 0xff);
const DROP_HOVER: Color32 = Color32::from_rgb(0xee, 0xf2, 0xff);
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// egui window drawing the client state and feeding clicks back as events.
pub struct Render {
    client: CaptureClient,
    preview: Option<(Arc<RgbImage>, TextureHandle)>,
    result_image: Option<(Arc<RgbaImage>, TextureHandle)>,
}

impl Render {
    pub fn new(client: CaptureClient) -> Self {
        Self {
            client,
            preview: None,
            result_image: None,
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context, state: &State) {
        let frame = match state.camera {
            CameraState::Streaming => self.client.device_camera.preview(),
            _ => None,
        };

        let Some(frame) = frame else {
            self.preview = None;
            return;
        };

        if let Some((shown, _)) = &self.preview {
            if Arc::ptr_eq(shown, &frame) {
                return;
            }
        }

        let image = egui::ColorImage::from_rgb(
            [frame.width() as usize, frame.height() as usize],
            frame.as_raw(),
        );
        match &mut self.preview {
            Some((shown, texture)) => {
                texture.set(image, TextureOptions::LINEAR);
                *shown = frame;
            }
            None => {
                let texture = ctx.load_texture("camera-preview", image, TextureOptions::LINEAR);
                self.preview = Some((frame, texture));
            }
        }
    }

    fn refresh_result_image(&mut self, ctx: &egui::Context, state: &State) {
        let Some(image) = state.result_image.clone() else {
            self.result_image = None;
            return;
        };

        if let Some((shown, _)) = &self.result_image {
            if Arc::ptr_eq(shown, &image) {
                return;
            }
        }

        let pixels = egui::ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        let texture = ctx.load_texture("result-image", pixels, TextureOptions::LINEAR);
        self.result_image = Some((image, texture));
    }
}

impl eframe::App for Render {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.client.snapshot();
        let mut events = Vec::new();

        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            events.push(Event::FilesSelected(dropped));
        }
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        self.refresh_preview(ctx, &state);
        self.refresh_result_image(ctx, &state);
        let preview = self.preview.as_ref().map(|(_, texture)| texture);
        let result_image = self.result_image.as_ref().map(|(_, texture)| texture);

        draw_notice(ctx, &state, &mut events);

        egui::TopBottomPanel::bottom("alphabet")
            .resizable(false)
            .show(ctx, |ui| draw_alphabet(ui, &mut events));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new("Sign Language Detector").color(ACCENT_DARK));
            ui.add_space(8.0);
            ui.columns(2, |columns| {
                draw_upload(&mut columns[0], &state, hovering, &mut events);
                columns[0].add_space(12.0);
                draw_camera(&mut columns[0], &state, preview, &mut events);
                draw_result(&mut columns[1], &state, result_image);
            });
        });

        for event in events {
            self.client.send(event);
        }

        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

fn draw_notice(ctx: &egui::Context, state: &State, events: &mut Vec<Event>) {
    let Some(notice) = state.notices.front() else {
        return;
    };

    let title = match notice.level {
        NoticeLevel::Info => "Info",
        NoticeLevel::Error => "Error",
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(notice.message.as_str());
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                events.push(Event::NoticeDismissed);
            }
        });
}

fn draw_upload(ui: &mut egui::Ui, state: &State, hovering: bool, events: &mut Vec<Event>) {
    ui.group(|ui| {
        ui.heading("Upload Image");

        let (fill, border) = if hovering {
            (DROP_HOVER, ACCENT_DARK)
        } else {
            (DROP_IDLE, ACCENT)
        };
        let drop_area = egui::Frame::none()
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, border))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("Drag & drop an image here, or click to browse")
                            .color(ACCENT_DARK),
                    );
                });
            })
            .response
            .interact(egui::Sense::click());
        if drop_area.clicked() && !state.picker_open {
            events.push(Event::BrowseClicked);
        }

        if let Some(file) = &state.selected_file {
            ui.label(file.indicator());
        }

        let label = if state.loading {
            "Processing..."
        } else {
            "Detect Sign"
        };
        if ui
            .add_enabled(!state.loading, egui::Button::new(label))
            .clicked()
        {
            events.push(Event::SubmitClicked);
        }
    });
}

fn draw_camera(
    ui: &mut egui::Ui,
    state: &State,
    preview: Option<&TextureHandle>,
    events: &mut Vec<Event>,
) {
    ui.group(|ui| {
        ui.heading("Webcam");

        match preview {
            Some(texture) => {
                ui.add(
                    egui::Image::from_texture(SizedTexture::from_handle(texture)).max_width(320.0),
                );
            }
            None if state.camera == CameraState::Starting => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Starting webcam...");
                });
            }
            None if state.camera == CameraState::Stopping => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Stopping webcam...");
                });
            }
            None => {
                ui.label("Webcam is off.");
            }
        }

        ui.horizontal(|ui| {
            if state.camera.is_streaming() {
                if ui.button("Stop Webcam").clicked() {
                    events.push(Event::StopCameraClicked);
                }
            } else if ui
                .add_enabled(
                    state.camera == CameraState::Idle,
                    egui::Button::new("Start Webcam"),
                )
                .clicked()
            {
                events.push(Event::StartCameraClicked);
            }

            if ui
                .add_enabled(
                    state.camera.is_streaming(),
                    egui::Button::new("Capture & Detect"),
                )
                .clicked()
            {
                events.push(Event::CaptureClicked);
            }
        });
    });
}

fn draw_result(ui: &mut egui::Ui, state: &State, image: Option<&TextureHandle>) {
    ui.group(|ui| {
        ui.heading("Result");

        if state.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Detecting sign...");
            });
        }

        ui.add_enabled_ui(!state.loading, |ui| match &state.result {
            None => {
                ui.label("Upload an image or capture from the webcam to see the result.");
            }
            Some(panel) => {
                ui.label(
                    RichText::new(panel.letter.as_str())
                        .size(64.0)
                        .strong()
                        .color(ACCENT_DARK),
                );
                ui.label(format!("Confidence: {}", panel.confidence));
                if let Some(texture) = image {
                    ui.add(
                        egui::Image::from_texture(SizedTexture::from_handle(texture))
                            .max_width(280.0),
                    );
                }
                ui.label(panel.description.as_str());
            }
        });
    });
}

fn draw_alphabet(ui: &mut egui::Ui, events: &mut Vec<Event>) {
    ui.add_space(4.0);
    ui.heading("ASL Alphabet Reference");
    ui.horizontal_wrapped(|ui| {
        for letter in AlphabetReference::grid_letters() {
            let button = egui::Button::new(RichText::new(letter.to_string()).size(18.0))
                .min_size(egui::vec2(32.0, 32.0));
            if ui
                .add(button)
                .on_hover_text(format!("ASL letter {}", letter))
                .clicked()
            {
                events.push(Event::ReferenceClicked(letter));
            }
        }
    });
    ui.add_space(4.0);
}
