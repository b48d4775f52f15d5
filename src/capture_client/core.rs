use crate::alphabet::AlphabetReference;
use crate::config::Config;
use crate::device_camera::interface::CameraError;
use crate::image_blob::ImageBlob;
use crate::predict_client::interface::SubmitError;
use crate::prediction::{PredictionResult, ResultPanel};
use image::RgbaImage;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

pub const NO_FILE_MESSAGE: &str = "Please select an image first!";
pub const SUBMIT_FAILED_MESSAGE: &str = "Error detecting sign. Please try again.";
pub const CAMERA_FAILED_MESSAGE: &str = "Could not access webcam. Please check permissions.";
pub const CAPTURE_FAILED_MESSAGE: &str = "Could not capture a frame from the webcam.";
pub const NO_FRAME_MESSAGE: &str = "The webcam has not delivered a frame yet. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CameraState {
    #[default]
    Idle,
    Starting,
    Streaming,
    Stopping,
}

impl CameraState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, CameraState::Streaming)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    pub fn indicator(&self) -> String {
        format!("Selected: {}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub selected_file: Option<SelectedFile>,
    pub picker_open: bool,
    pub camera: CameraState,
    pub loading: bool,
    pub result: Option<ResultPanel>,
    pub result_image: Option<Arc<RgbaImage>>,
    pub notices: VecDeque<Notice>,
}

impl State {
    fn notify(mut self, notice: Notice) -> Self {
        self.notices.push_back(notice);
        self
    }
}

#[derive(Debug)]
pub enum Event {
    BrowseClicked,
    PickerClosed(Vec<PathBuf>),
    FilesSelected(Vec<PathBuf>),
    SubmitClicked,
    SubmitDone(Result<PredictionResult, SubmitError>),
    StartCameraClicked,
    CameraStartDone(Result<(), CameraError>),
    StopCameraClicked,
    CameraStopDone,
    CaptureClicked,
    FrameCaptured(Result<ImageBlob, CameraError>),
    ResultImageLoaded {
        source: String,
        image: Result<Arc<RgbaImage>, SubmitError>,
    },
    ReferenceClicked(char),
    NoticeDismissed,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::ResultImageLoaded { source, image } => format!(
                "ResultImageLoaded {{ source: {:?}, image: {} }}",
                truncate(source),
                match image {
                    Ok(image) => format!("Ok({}x{})", image.width(), image.height()),
                    Err(e) => format!("Err({})", e),
                }
            ),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    OpenFilePicker,
    StartCamera,
    StopCamera,
    CaptureFrame,
    SubmitFile { path: PathBuf },
    SubmitBlob { blob: ImageBlob },
    LoadResultImage { source: String },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::LoadResultImage { source } => {
                format!("LoadResultImage {{ source: {:?} }}", truncate(source))
            }
            effect => format!("{:?}", effect),
        }
    }
}

fn truncate(source: &str) -> String {
    if source.chars().count() > 64 {
        format!("{}...", source.chars().take(64).collect::<String>())
    } else {
        source.to_string()
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![])
}

pub fn transition(
    config: &Config,
    alphabet: &AlphabetReference,
    state: State,
    event: Event,
) -> (State, Vec<Effect>) {
    match event {
        // File selection
        Event::BrowseClicked if state.picker_open => (state, vec![]),
        Event::BrowseClicked => (
            State {
                picker_open: true,
                ..state
            },
            vec![Effect::OpenFilePicker],
        ),
        Event::PickerClosed(paths) => {
            let selected_file = match paths.into_iter().next() {
                Some(path) => Some(SelectedFile::from_path(path)),
                None => state.selected_file.clone(),
            };
            (
                State {
                    picker_open: false,
                    selected_file,
                    ..state
                },
                vec![],
            )
        }
        Event::FilesSelected(paths) => {
            let selected_file = paths.into_iter().next().map(SelectedFile::from_path);
            (
                State {
                    selected_file,
                    ..state
                },
                vec![],
            )
        }

        // Submission
        Event::SubmitClicked => match state.selected_file.clone() {
            Some(file) => (
                State {
                    loading: true,
                    ..state
                },
                vec![Effect::SubmitFile { path: file.path }],
            ),
            None => (state.notify(Notice::error(NO_FILE_MESSAGE)), vec![]),
        },
        Event::SubmitDone(Ok(prediction)) => {
            let panel = ResultPanel::render(&prediction, &config.placeholder_letter, alphabet);
            let effects = panel
                .image
                .clone()
                .map(|source| vec![Effect::LoadResultImage { source }])
                .unwrap_or_default();
            (
                State {
                    loading: false,
                    result: Some(panel),
                    result_image: None,
                    ..state
                },
                effects,
            )
        }
        Event::SubmitDone(Err(_)) => (
            State {
                loading: false,
                ..state
            }
            .notify(Notice::error(SUBMIT_FAILED_MESSAGE)),
            vec![],
        ),
        Event::ResultImageLoaded { source, image } => {
            let current = state
                .result
                .as_ref()
                .and_then(|panel| panel.image.as_deref())
                == Some(source.as_str());
            match image {
                Ok(image) if current => (
                    State {
                        result_image: Some(image),
                        ..state
                    },
                    vec![],
                ),
                _ => (state, vec![]),
            }
        }

        // Camera
        Event::StartCameraClicked => match state.camera {
            CameraState::Idle => (
                State {
                    camera: CameraState::Starting,
                    ..state
                },
                vec![Effect::StartCamera],
            ),
            _ => (state, vec![]),
        },
        Event::CameraStartDone(Ok(())) => (
            State {
                camera: CameraState::Streaming,
                ..state
            },
            vec![],
        ),
        Event::CameraStartDone(Err(_)) => (
            State {
                camera: CameraState::Idle,
                ..state
            }
            .notify(Notice::error(CAMERA_FAILED_MESSAGE)),
            vec![],
        ),
        Event::StopCameraClicked => match state.camera {
            CameraState::Streaming => (
                State {
                    camera: CameraState::Stopping,
                    ..state
                },
                vec![Effect::StopCamera],
            ),
            _ => (state, vec![]),
        },
        Event::CameraStopDone => match state.camera {
            CameraState::Stopping => (
                State {
                    camera: CameraState::Idle,
                    ..state
                },
                vec![],
            ),
            _ => (state, vec![]),
        },
        Event::CaptureClicked => {
            if state.camera.is_streaming() {
                (state, vec![Effect::CaptureFrame])
            } else {
                (state, vec![])
            }
        }
        Event::FrameCaptured(Ok(blob)) => (
            State {
                loading: true,
                ..state
            },
            vec![Effect::SubmitBlob { blob }],
        ),
        Event::FrameCaptured(Err(CameraError::NotStreaming)) => (state, vec![]),
        Event::FrameCaptured(Err(CameraError::NoFrameYet)) => {
            (state.notify(Notice::error(NO_FRAME_MESSAGE)), vec![])
        }
        Event::FrameCaptured(Err(_)) => {
            (state.notify(Notice::error(CAPTURE_FAILED_MESSAGE)), vec![])
        }

        // Reference and alerts
        Event::ReferenceClicked(letter) => (
            state.notify(Notice::info(alphabet.reference_text(letter))),
            vec![],
        ),
        Event::NoticeDismissed => {
            let mut state = state;
            state.notices.pop_front();
            (state, vec![])
        }
    }
}
