//! HAR (HTTP Archive) input: recorded browser traffic as request records.
//!
//! A DevTools capture of a streaming session can be replayed through the
//! service to see which requests would be blocked and which audio streams
//! would be reported. The resource type comes from `_resourceType` (or the
//! `Sec-Fetch-Dest` header); the initiator from `Origin`, `Referer`, or
//! `_initiator.url`.

mod parse;
mod records;
mod replay;

pub use records::{har_records_from_slice, load_har_records};
pub use replay::{HarReplay, ReplayReport};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::{RequestFilter, RequestInterceptor};
    use crate::request::{Decision, RequestRecord, ResourceType};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[test]
    fn devtools_fields_are_used() {
        let har = r#"{
            "log": {
                "version": "1.2",
                "entries": [
                    {
                        "_resourceType": "xhr",
                        "request": {
                            "url": "https://r1.googlevideo.com/videoplayback?mime=audio%2Fwebm",
                            "headers": [ { "name": "origin", "value": "https://www.youtube.com" } ]
                        },
                        "response": { "status": 200, "headers": [] }
                    },
                    {
                        "_resourceType": "script",
                        "_initiator": { "type": "parser", "url": "https://www.youtube.com/watch?v=abc" },
                        "request": { "url": "https://www.youtube.com/s/player.js", "headers": [] },
                        "response": { "status": 200, "headers": [] }
                    }
                ]
            }
        }"#;
        let records = har_records_from_slice(har.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].resource_type, ResourceType::XmlHttpRequest);
        assert_eq!(records[0].initiator.as_deref(), Some("https://www.youtube.com"));
        assert_eq!(records[1].resource_type, ResourceType::Script);
        assert_eq!(records[1].initiator.as_deref(), Some("https://www.youtube.com"));
    }

    #[test]
    fn falls_back_to_referer_and_fetch_dest() {
        let har = r#"{
            "log": {
                "entries": [
                    {
                        "request": {
                            "url": "https://r1.googlevideo.com/videoplayback",
                            "headers": [
                                { "name": "Origin", "value": "null" },
                                { "name": "Referer", "value": "https://m.youtube.com/watch?v=x" },
                                { "name": "Sec-Fetch-Dest", "value": "empty" }
                            ]
                        }
                    },
                    {
                        "request": { "url": "https://cdn.example.com/a.png", "headers": [] }
                    }
                ]
            }
        }"#;
        let records = har_records_from_slice(har.as_bytes()).unwrap();
        assert_eq!(records[0].resource_type, ResourceType::XmlHttpRequest);
        assert_eq!(records[0].initiator.as_deref(), Some("https://m.youtube.com"));
        assert_eq!(records[1].resource_type, ResourceType::Other);
        assert_eq!(records[1].initiator, None);
    }

    #[test]
    fn load_from_file() {
        let har = r#"{"log":{"version":"1.2","entries":[
            {"request":{"url":"https://a.googlevideo.com/x","headers":[]},"response":{"status":200,"headers":[]}}
        ]}}"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(har.as_bytes()).unwrap();
        f.flush().unwrap();
        let records = load_har_records(f.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://a.googlevideo.com/x");
    }

    #[test]
    fn invalid_json_err() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"{ not json").unwrap();
        f.flush().unwrap();
        let err = load_har_records(f.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parse HAR JSON"));
    }

    #[test]
    fn replay_counts_scope_and_decisions() {
        let har = r#"{"log":{"entries":[
            {"request":{"url":"https://a.googlevideo.com/block-me","headers":[]}},
            {"request":{"url":"https://a.googlevideo.com/ok","headers":[]}},
            {"request":{"url":"https://www.youtube.com/","headers":[]}}
        ]}}"#;
        let records = har_records_from_slice(har.as_bytes()).unwrap();

        let replay = HarReplay::new();
        replay.register(
            RequestFilter::new(&["*://*.googlevideo.com/*"]).unwrap(),
            Arc::new(|r: &RequestRecord| {
                if r.url.ends_with("block-me") {
                    Decision::Block
                } else {
                    Decision::Allow
                }
            }),
        );
        let report = replay.replay(&records);
        assert_eq!(
            report,
            ReplayReport {
                total: 3,
                out_of_scope: 1,
                allowed: 1,
                blocked: 1,
            }
        );
    }
}
