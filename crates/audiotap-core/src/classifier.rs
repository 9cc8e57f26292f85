//! Request classification: decide allow/block for one request and recognize
//! audio streams.
//!
//! The classifier holds only compiled patterns. Every call is a pure function
//! of the record and the [`StateSnapshot`] passed in; publishing the resulting
//! event is the caller's job (see [`crate::service`]).

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::config::ClassifierConfig;
use crate::request::{AudioStreamEvent, Decision, RequestRecord};
use crate::state::StateSnapshot;
use crate::url_model::canonical_audio_url;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid {which} pattern {pattern:?}: {source}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result of classifying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub decision: Decision,
    /// Present only when the request was recognized as an audio stream.
    pub audio: Option<AudioStreamEvent>,
}

impl Classification {
    fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            audio: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    target_site: Regex,
    audio_marker: Regex,
    volatile_params: Vec<String>,
}

impl Classifier {
    pub fn new(cfg: &ClassifierConfig) -> Result<Self, ClassifierError> {
        Ok(Self {
            target_site: compile("target site", &cfg.target_site_pattern)?,
            audio_marker: compile("audio marker", &cfg.audio_marker_pattern)?,
            volatile_params: cfg.volatile_params.clone(),
        })
    }

    /// Runs the decision pipeline, stopping at the first step that applies:
    ///
    /// 1. service inactive: allow
    /// 2. not an XHR/fetch request: allow
    /// 3. initiator missing or not the target site: allow
    /// 4. no audio marker in the URL: block if video blocking is on, else allow
    /// 5. audio stream: allow and report the canonical URL
    ///
    /// An audio URL that cannot be parsed is allowed without an event.
    pub fn classify(&self, record: &RequestRecord, state: StateSnapshot) -> Classification {
        if !state.active {
            return Classification::allow();
        }
        if !record.resource_type.is_xhr() {
            return Classification::allow();
        }
        let from_target = record
            .initiator
            .as_deref()
            .is_some_and(|initiator| self.target_site.is_match(initiator));
        if !from_target {
            return Classification::allow();
        }

        if !self.audio_marker.is_match(&record.url) {
            let decision = if state.block_video {
                Decision::Block
            } else {
                Decision::Allow
            };
            tracing::debug!(url = %record.url, %decision, "non-audio stream request");
            return Classification {
                decision,
                audio: None,
            };
        }

        match canonical_audio_url(&record.url, &self.volatile_params) {
            Ok(canonical_url) => {
                tracing::debug!(%canonical_url, "audio stream request");
                Classification {
                    decision: Decision::Allow,
                    audio: Some(AudioStreamEvent {
                        canonical_url,
                        source: record.clone(),
                    }),
                }
            }
            Err(e) => {
                tracing::debug!("audio marker on unparsable URL, allowing: {}", e);
                Classification::allow()
            }
        }
    }
}

fn compile(which: &'static str, pattern: &str) -> Result<Regex, ClassifierError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ClassifierError::InvalidPattern {
            which,
            pattern: pattern.to_string(),
            source,
        })
}
