//! Turn HAR entries into request records.

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

use crate::request::{RequestRecord, ResourceType};

use super::parse::{HarEntry, HarHeader, HarLog};

/// Reads a HAR file and returns one record per entry, in capture order.
pub fn load_har_records(path: &Path) -> Result<Vec<RequestRecord>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    har_records_from_slice(&bytes).with_context(|| format!("parse HAR JSON: {}", path.display()))
}

pub fn har_records_from_slice(bytes: &[u8]) -> Result<Vec<RequestRecord>> {
    let har: HarLog = serde_json::from_slice(bytes)?;
    Ok(har.log.entries.iter().map(record_from_entry).collect())
}

fn record_from_entry(entry: &HarEntry) -> RequestRecord {
    let headers = &entry.request.headers;
    let resource_type = match entry.resource_type.as_deref() {
        Some(ty) => ResourceType::parse_lenient(ty),
        None => get_header(headers, "Sec-Fetch-Dest")
            .map(resource_type_from_fetch_dest)
            .unwrap_or(ResourceType::Other),
    };

    RequestRecord {
        url: entry.request.url.clone(),
        initiator: initiator_origin(entry),
        resource_type,
    }
}

/// `Origin` header, else the origin of `Referer`, else the DevTools initiator URL.
fn initiator_origin(entry: &HarEntry) -> Option<String> {
    let headers = &entry.request.headers;
    if let Some(origin) = get_header(headers, "Origin") {
        if !origin.is_empty() && origin != "null" {
            return Some(origin.to_string());
        }
    }
    get_header(headers, "Referer")
        .and_then(origin_of)
        .or_else(|| {
            entry
                .initiator
                .as_ref()
                .and_then(|i| i.url.as_deref())
                .and_then(origin_of)
        })
}

fn origin_of(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

fn resource_type_from_fetch_dest(dest: &str) -> ResourceType {
    match dest {
        "empty" => ResourceType::XmlHttpRequest,
        "document" => ResourceType::MainFrame,
        "iframe" | "frame" => ResourceType::SubFrame,
        "script" => ResourceType::Script,
        "style" => ResourceType::Stylesheet,
        "image" => ResourceType::Image,
        "font" => ResourceType::Font,
        "audio" | "video" | "track" => ResourceType::Media,
        "object" | "embed" => ResourceType::Object,
        _ => ResourceType::Other,
    }
}

fn get_header<'a>(headers: &'a [HarHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}
