//! `audiotap canonicalize <url>` – print the canonical stream URL.

use anyhow::Result;
use audiotap_core::config::AudiotapConfig;
use audiotap_core::url_model::canonical_audio_url;

pub fn run_canonicalize(cfg: &AudiotapConfig, url: &str) -> Result<()> {
    let canonical = canonical_audio_url(url, &cfg.classifier.volatile_params)?;
    println!("{canonical}");
    Ok(())
}
