//! Observed request records and the allow/block decision returned for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of an observed request, in browser webRequest vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    /// XHR and fetch() requests.
    XmlHttpRequest,
    Ping,
    CspReport,
    Media,
    WebSocket,
    Other,
}

impl ResourceType {
    /// True for the XHR/fetch-style kind; the only kind the classifier inspects.
    pub fn is_xhr(self) -> bool {
        self == ResourceType::XmlHttpRequest
    }

    /// Parses webRequest (`xmlhttprequest`) and DevTools/HAR (`xhr`, `fetch`) spellings.
    /// Unknown strings map to `Other`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "main_frame" | "document" => ResourceType::MainFrame,
            "sub_frame" => ResourceType::SubFrame,
            "stylesheet" => ResourceType::Stylesheet,
            "script" => ResourceType::Script,
            "image" => ResourceType::Image,
            "font" => ResourceType::Font,
            "object" => ResourceType::Object,
            "xmlhttprequest" | "xhr" | "fetch" => ResourceType::XmlHttpRequest,
            "ping" => ResourceType::Ping,
            "csp_report" => ResourceType::CspReport,
            "media" => ResourceType::Media,
            "websocket" => ResourceType::WebSocket,
            _ => ResourceType::Other,
        }
    }
}

impl FromStr for ResourceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceType::MainFrame => "main_frame",
            ResourceType::SubFrame => "sub_frame",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Script => "script",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Object => "object",
            ResourceType::XmlHttpRequest => "xmlhttprequest",
            ResourceType::Ping => "ping",
            ResourceType::CspReport => "csp_report",
            ResourceType::Media => "media",
            ResourceType::WebSocket => "websocket",
            ResourceType::Other => "other",
        };
        f.write_str(s)
    }
}

/// A network request as reported by the interception layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Absolute request URL.
    pub url: String,
    /// Origin of the page that issued the request, if the browser reported one.
    pub initiator: Option<String>,
    pub resource_type: ResourceType,
}

impl RequestRecord {
    pub fn new(
        url: impl Into<String>,
        initiator: Option<impl Into<String>>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            url: url.into(),
            initiator: initiator.map(Into::into),
            resource_type,
        }
    }
}

/// Outcome handed back to the interception layer for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    #[default]
    Allow,
    Block,
}

impl Decision {
    pub fn is_blocked(self) -> bool {
        self == Decision::Block
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Block => f.write_str("block"),
        }
    }
}

/// Emitted once per request recognized as an audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStreamEvent {
    /// Stream URL with per-chunk query parameters removed.
    pub canonical_url: String,
    /// The request that triggered the event.
    pub source: RequestRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xhr_spellings_fold_to_one_kind() {
        for s in ["xmlhttprequest", "xhr", "fetch", "XHR", " Fetch "] {
            assert_eq!(ResourceType::parse_lenient(s), ResourceType::XmlHttpRequest);
        }
        assert!(ResourceType::XmlHttpRequest.is_xhr());
        assert!(!ResourceType::Media.is_xhr());
    }

    #[test]
    fn unknown_type_is_other() {
        assert_eq!(ResourceType::parse_lenient("beacon"), ResourceType::Other);
        assert_eq!("".parse::<ResourceType>().unwrap(), ResourceType::Other);
    }

    #[test]
    fn display_uses_webrequest_names() {
        assert_eq!(ResourceType::XmlHttpRequest.to_string(), "xmlhttprequest");
        assert_eq!(ResourceType::MainFrame.to_string(), "main_frame");
        assert_eq!(Decision::Block.to_string(), "block");
    }

    #[test]
    fn decision_defaults_to_allow() {
        assert_eq!(Decision::default(), Decision::Allow);
        assert!(!Decision::Allow.is_blocked());
        assert!(Decision::Block.is_blocked());
    }
}
