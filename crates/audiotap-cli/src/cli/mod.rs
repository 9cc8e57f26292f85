//! CLI for audiotap.

mod commands;

use anyhow::Result;
use audiotap_core::config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

use commands::{run_audio_mode, run_canonicalize, run_classify, run_replay_har, ClassifyArgs};

/// Top-level CLI for audiotap.
#[derive(Debug, Parser)]
#[command(name = "audiotap")]
#[command(about = "audiotap: spot audio-only stream requests and derive their canonical URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Value for `audiotap audio-mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioModeSwitch {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify a single request and print the decision.
    Classify {
        /// Request URL.
        #[arg(long)]
        url: String,
        /// Origin of the page that issued the request.
        #[arg(long)]
        initiator: Option<String>,
        /// Resource type (xmlhttprequest, xhr, fetch, media, script, ...).
        #[arg(long = "type", default_value = "xmlhttprequest")]
        resource_type: String,
        /// Classify as if the service were stopped.
        #[arg(long)]
        inactive: bool,
        /// Block non-audio stream requests.
        #[arg(long)]
        block_video: bool,
    },

    /// Print the canonical URL of an audio stream request URL.
    Canonicalize {
        /// Stream request URL.
        url: String,
    },

    /// Replay a HAR capture through the service and list the audio streams found.
    ReplayHar {
        /// Path to the HAR file.
        path: String,
        /// Block non-audio stream requests.
        #[arg(long)]
        block_video: bool,
        /// Seed video blocking from the stored audio-mode preference.
        #[arg(long, conflicts_with = "block_video")]
        use_preferences: bool,
    },

    /// Show or set the stored audio-mode preference.
    AudioMode {
        /// New value; omit to print the current one.
        #[arg(value_enum)]
        switch: Option<AudioModeSwitch>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify {
                url,
                initiator,
                resource_type,
                inactive,
                block_video,
            } => run_classify(
                &cfg,
                ClassifyArgs {
                    url,
                    initiator,
                    resource_type,
                    inactive,
                    block_video,
                },
            )?,
            CliCommand::Canonicalize { url } => run_canonicalize(&cfg, &url)?,
            CliCommand::ReplayHar {
                path,
                block_video,
                use_preferences,
            } => run_replay_har(&cfg, Path::new(&path), block_video, use_preferences).await?,
            CliCommand::AudioMode { switch } => run_audio_mode(&cfg, switch).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
