//! `audiotap replay-har <path>` – run a HAR capture through the service.

use anyhow::{Context, Result};
use audiotap_core::config::AudiotapConfig;
use audiotap_core::har::{load_har_records, HarReplay};
use audiotap_core::intercept::RequestFilter;
use audiotap_core::{AudioStreamService, Classifier};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

use super::preference_store;

pub async fn run_replay_har(
    cfg: &AudiotapConfig,
    path: &Path,
    block_video: bool,
    use_preferences: bool,
) -> Result<()> {
    let records = load_har_records(path)?;

    // Buffer every possible event so nothing is skipped while draining after the replay.
    let capacity = cfg.notify.channel_capacity.max(records.len());
    let service = Arc::new(AudioStreamService::new(
        Classifier::new(&cfg.classifier)?,
        capacity,
    ));
    if use_preferences {
        let store = preference_store(cfg)?;
        service
            .spawn_preference_load(Arc::new(store))
            .await
            .context("preference load task")?;
    } else if block_video {
        service.block_video_streams();
    }
    service.start();

    let mut events = service.subscribe();
    let replay = HarReplay::new();
    let filter = RequestFilter::new(&cfg.intercept.url_patterns)?;
    service.attach(&replay, filter);

    let report = replay.replay(&records);
    tracing::info!(?report, path = %path.display(), "replayed HAR capture");

    let mut streams: Vec<String> = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => {
                if !streams.contains(&event.canonical_url) {
                    streams.push(event.canonical_url);
                }
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "audio stream events dropped during replay");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    println!(
        "{} requests: {} in scope ({} allowed, {} blocked), {} out of scope",
        report.total,
        report.allowed + report.blocked,
        report.allowed,
        report.blocked,
        report.out_of_scope
    );
    println!(
        "video blocking: {}",
        if service.is_blocking_video() { "on" } else { "off" }
    );
    if streams.is_empty() {
        println!("No audio streams found.");
    }
    for url in &streams {
        println!("{url}");
    }
    Ok(())
}
