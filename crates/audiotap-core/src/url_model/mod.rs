//! Canonical audio stream URLs.
//!
//! A streaming player fetches one logical stream as many chunk requests that
//! differ only in byte-range, buffer and sequence parameters. Removing those
//! parameters and rebuilding the query yields one stable URL per stream, which
//! downstream consumers use to deduplicate and fetch.

mod query;

pub use query::unique_query_pairs;

use thiserror::Error;
use url::Url;

/// Query parameters that vary per chunk request without changing stream identity.
pub const DEFAULT_VOLATILE_PARAMS: [&str; 3] = ["range", "rbuf", "rn"];

#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("invalid stream URL {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Derives the canonical URL of an audio stream request.
///
/// Scheme, host and path are kept. The query is rebuilt from the key-unique
/// pair list with every key in `volatile_params` removed; the fragment is
/// dropped, and so is the `?` when no parameters remain. Keys and values are
/// percent-encoded (`%20` for space, `~` left as is), never form-encoded.
///
/// # Examples
///
/// - `…/videoplayback?mime=audio%2Fwebm&range=0-999&itag=251`
///   → `…/videoplayback?mime=audio%2Fwebm&itag=251`
pub fn canonical_audio_url<S: AsRef<str>>(
    raw: &str,
    volatile_params: &[S],
) -> Result<String, CanonicalError> {
    let mut url = Url::parse(raw).map_err(|source| CanonicalError::Parse {
        url: raw.to_string(),
        source,
    })?;

    let kept: Vec<(String, String)> = unique_query_pairs(&url)
        .into_iter()
        .filter(|(key, _)| !volatile_params.iter().any(|p| p.as_ref() == key))
        .collect();

    url.set_fragment(None);
    if kept.is_empty() {
        url.set_query(None);
    } else {
        let query = kept
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(query.as_str()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://r1---sn-x.googlevideo.com/videoplayback";

    fn canon(raw: &str) -> String {
        canonical_audio_url(raw, &DEFAULT_VOLATILE_PARAMS).unwrap()
    }

    #[test]
    fn strips_range_param() {
        assert_eq!(
            canon(&format!("{BASE}?mime=audio%2Fwebm&range=0-999&itag=251")),
            format!("{BASE}?mime=audio%2Fwebm&itag=251")
        );
    }

    #[test]
    fn chunk_requests_share_canonical_url() {
        let first = canon(&format!("{BASE}?mime=audio%2Fwebm&range=0-999&itag=251"));
        let later = canon(&format!(
            "{BASE}?mime=audio%2Fwebm&range=1000-1999&rbuf=5000&rn=3&itag=251"
        ));
        assert_eq!(first, later);
    }

    #[test]
    fn deterministic() {
        let raw = format!("{BASE}?itag=251&mime=audio%2Fwebm&clen=3456&rn=9&dur=212.3");
        assert_eq!(canon(&raw), canon(&raw));
        assert_eq!(
            canon(&raw),
            format!("{BASE}?itag=251&mime=audio%2Fwebm&clen=3456&dur=212.3")
        );
    }

    #[test]
    fn drops_fragment_and_empty_query() {
        assert_eq!(canon(&format!("{BASE}?range=0-1&rn=1#t=3")), BASE);
        assert_eq!(canon(&format!("{BASE}#frag")), BASE);
    }

    #[test]
    fn similar_names_are_kept() {
        assert_eq!(
            canon(&format!("{BASE}?ranges=1&rbuffer=2&rn=3")),
            format!("{BASE}?ranges=1&rbuffer=2")
        );
    }

    #[test]
    fn custom_volatile_list() {
        let out = canonical_audio_url(&format!("{BASE}?a=1&sig=xyz&b=2"), &["sig"]).unwrap();
        assert_eq!(out, format!("{BASE}?a=1&b=2"));
    }

    #[test]
    fn rebuilt_query_uses_percent_encoding() {
        assert_eq!(
            canon(&format!("{BASE}?mime=audio%2Fwebm&a=x%20y&b=c~d&rn=2")),
            format!("{BASE}?mime=audio%2Fwebm&a=x%20y&b=c~d")
        );
        assert_eq!(canon(&format!("{BASE}?q=a+b")), format!("{BASE}?q=a%20b"));
    }

    #[test]
    fn malformed_url_is_error() {
        assert!(canonical_audio_url("not a url", &DEFAULT_VOLATILE_PARAMS).is_err());
        assert!(canonical_audio_url("https://", &DEFAULT_VOLATILE_PARAMS).is_err());
    }
}
