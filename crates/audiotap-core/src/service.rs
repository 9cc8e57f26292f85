//! The audio stream service: control flags, the request callback, and audio
//! stream subscriptions.
//!
//! Construction does no work in the background. Loading the stored preference
//! ([`AudioStreamService::spawn_preference_load`]) and hooking into the
//! interception layer ([`AudioStreamService::attach`]) are separate steps.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::classifier::{Classifier, ClassifierError};
use crate::config::AudiotapConfig;
use crate::intercept::{RequestFilter, RequestInterceptor};
use crate::notify::AudioStreamHub;
use crate::prefs::{PreferenceStore, AUDIO_MODE_KEY};
use crate::request::{AudioStreamEvent, Decision, RequestRecord};
use crate::state::ServiceState;

pub struct AudioStreamService {
    state: Arc<ServiceState>,
    classifier: Classifier,
    hub: AudioStreamHub,
}

impl AudioStreamService {
    /// Inactive, video allowed, no subscribers.
    pub fn new(classifier: Classifier, channel_capacity: usize) -> Self {
        Self {
            state: Arc::new(ServiceState::new()),
            classifier,
            hub: AudioStreamHub::new(channel_capacity),
        }
    }

    pub fn from_config(cfg: &AudiotapConfig) -> Result<Self, ClassifierError> {
        Ok(Self::new(
            Classifier::new(&cfg.classifier)?,
            cfg.notify.channel_capacity,
        ))
    }

    pub fn start(&self) {
        self.state.set_active(true);
        tracing::info!("audio stream service started");
    }

    pub fn stop(&self) {
        self.state.set_active(false);
        tracing::info!("audio stream service stopped");
    }

    pub fn block_video_streams(&self) {
        self.state.set_block_video(true);
    }

    pub fn allow_video_streams(&self) {
        self.state.set_block_video(false);
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_blocking_video(&self) -> bool {
        self.state.is_blocking_video()
    }

    /// Decides one request. Any audio stream event is published without waiting
    /// on subscribers.
    pub fn handle_request(&self, record: &RequestRecord) -> Decision {
        let outcome = self.classifier.classify(record, self.state.snapshot());
        if let Some(event) = outcome.audio {
            self.hub.publish(event);
        }
        outcome.decision
    }

    /// Calls `handler` on its own task for every audio stream event. Requires a
    /// tokio runtime.
    pub fn on_audio_stream<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn(AudioStreamEvent) + Send + Sync + 'static,
    {
        self.hub.on_audio_stream(handler)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AudioStreamEvent> {
        self.hub.subscribe()
    }

    /// Reads the audio-mode preference once and sets video blocking from it.
    pub async fn load_preferences(&self, store: &dyn PreferenceStore) {
        apply_audio_mode_preference(&self.state, store).await;
    }

    /// Background variant of [`Self::load_preferences`]. Requests handled before
    /// the task finishes see the current flag. Await the handle to wait for it.
    pub fn spawn_preference_load(&self, store: Arc<dyn PreferenceStore>) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            apply_audio_mode_preference(&state, store.as_ref()).await;
        })
    }

    /// Registers [`Self::handle_request`] with the interception layer.
    pub fn attach(self: &Arc<Self>, interceptor: &dyn RequestInterceptor, filter: RequestFilter) {
        let service = Arc::clone(self);
        interceptor.register(
            filter,
            Arc::new(move |record: &RequestRecord| service.handle_request(record)),
        );
        tracing::debug!("attached to request interceptor");
    }
}

async fn apply_audio_mode_preference(state: &ServiceState, store: &dyn PreferenceStore) {
    match store.get(AUDIO_MODE_KEY).await {
        Ok(value) => {
            let enabled = value.as_deref() == Some("true");
            state.set_block_video(enabled);
            tracing::debug!(?value, "audio mode preference loaded, block_video={}", enabled);
        }
        Err(e) => {
            tracing::warn!("audio mode preference not loaded, keeping current setting: {}", e);
        }
    }
}
