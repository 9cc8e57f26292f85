//! CLI command handlers, one per file.

mod audio_mode;
mod canonicalize;
mod classify;
mod replay_har;

pub use audio_mode::run_audio_mode;
pub use canonicalize::run_canonicalize;
pub use classify::{run_classify, ClassifyArgs};
pub use replay_har::run_replay_har;

use anyhow::Result;
use audiotap_core::config::AudiotapConfig;
use audiotap_core::prefs::FilePreferenceStore;

/// Preference file from config, else the XDG default.
fn preference_store(cfg: &AudiotapConfig) -> Result<FilePreferenceStore> {
    let path = match &cfg.preferences_path {
        Some(p) => p.clone(),
        None => FilePreferenceStore::default_path()?,
    };
    Ok(FilePreferenceStore::new(path))
}
