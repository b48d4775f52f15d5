use crate::alphabet::AlphabetReference;
use crate::capture_client::core::{init, transition, Effect, Event, State};
use crate::capture_client::run_effect::RunEffect;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::file_picker::interface::FilePicker;
use crate::library::logger::interface::Logger;
use crate::predict_client::interface::PredictClient;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Owns the session: config, reference table, devices and the current state.
#[derive(Clone)]
pub struct CaptureClient {
    pub state: Arc<Mutex<State>>,
    pub event_sender: Sender<Event>,
    pub event_receiver: Arc<Mutex<Receiver<Event>>>,
    pub config: Config,
    pub alphabet: Arc<AlphabetReference>,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    run_effect: RunEffect,
}

impl CaptureClient {
    pub fn new(
        config: Config,
        alphabet: AlphabetReference,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        predict_client: Arc<dyn PredictClient + Send + Sync>,
        file_picker: Arc<dyn FilePicker + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("capture_client");
        let run_effect = RunEffect::new(
            logger.clone(),
            device_camera.clone(),
            predict_client,
            file_picker,
            event_sender.clone(),
        );

        Self {
            state: Arc::new(Mutex::new(init().0)),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            config,
            alphabet: Arc::new(alphabet),
            logger,
            device_camera,
            run_effect,
        }
    }

    pub fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.error("Event channel closed");
        }
    }

    pub fn snapshot(&self) -> State {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }

    /// Applies one event and spawns its effects.
    pub fn step(&self, event: Event) {
        let _ = self
            .logger
            .info(&format!("event: {}", event.to_display_string()));

        let current = self.snapshot();
        let (new_state, effects) = transition(&self.config, &self.alphabet, current, event);

        let _ = self.logger.info(&format!(
            "camera: {:?}, loading: {}, notices: {}, effects: [{}]",
            new_state.camera,
            new_state.loading,
            new_state.notices.len(),
            effects
                .iter()
                .map(Effect::to_display_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        *self.lock_state() = new_state;

        self.spawn_effects(effects);
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (initial, effects) = init();
        *self.lock_state() = initial;
        self.spawn_effects(effects);

        loop {
            let received = self
                .event_receiver
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();

            match received {
                Ok(event) => self.step(event),
                Err(e) => return Err(Box::new(e)),
            }
        }
    }

    /// Releases the camera if it is still held.
    pub fn shutdown(&self) {
        if let Err(e) = self.device_camera.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera during shutdown: {}", e));
        }
    }
}
