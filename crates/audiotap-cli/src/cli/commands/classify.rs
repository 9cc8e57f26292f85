//! `audiotap classify --url <url>` – decide one request.

use anyhow::Result;
use audiotap_core::config::AudiotapConfig;
use audiotap_core::{AudioStreamService, RequestRecord, ResourceType};

#[derive(Debug)]
pub struct ClassifyArgs {
    pub url: String,
    pub initiator: Option<String>,
    pub resource_type: String,
    pub inactive: bool,
    pub block_video: bool,
}

pub fn run_classify(cfg: &AudiotapConfig, args: ClassifyArgs) -> Result<()> {
    let service = AudioStreamService::from_config(cfg)?;
    if !args.inactive {
        service.start();
    }
    if args.block_video {
        service.block_video_streams();
    }
    let mut events = service.subscribe();

    let record = RequestRecord {
        url: args.url,
        initiator: args.initiator,
        resource_type: ResourceType::parse_lenient(&args.resource_type),
    };
    let decision = service.handle_request(&record);
    println!("decision: {decision}");
    if let Ok(event) = events.try_recv() {
        println!("audio stream: {}", event.canonical_url);
    }
    Ok(())
}
