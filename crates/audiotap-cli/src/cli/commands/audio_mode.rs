//! `audiotap audio-mode [on|off]` – show or set the stored preference.

use anyhow::Result;
use audiotap_core::config::AudiotapConfig;
use audiotap_core::prefs::{PreferenceStore, AUDIO_MODE_KEY};

use super::preference_store;
use crate::cli::AudioModeSwitch;

pub async fn run_audio_mode(cfg: &AudiotapConfig, switch: Option<AudioModeSwitch>) -> Result<()> {
    let store = preference_store(cfg)?;
    if let Some(switch) = switch {
        let value = match switch {
            AudioModeSwitch::On => "true",
            AudioModeSwitch::Off => "false",
        };
        store.set(AUDIO_MODE_KEY, value).await?;
        tracing::info!(path = %store.path().display(), "audio mode set to {}", value);
    }

    let enabled = store.get(AUDIO_MODE_KEY).await?.as_deref() == Some("true");
    println!("audio mode: {}", if enabled { "on" } else { "off" });
    Ok(())
}
