//! Seam to the request interception layer.
//!
//! The interception layer owns the network hook. It is given a [`RequestFilter`]
//! scoping which requests it should report and a synchronous callback that
//! returns the [`Decision`] for each one.

use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::request::{Decision, RequestRecord};

/// Synchronous per-request callback; runs on the request dispatch path.
pub type RequestCallback = Arc<dyn Fn(&RequestRecord) -> Decision + Send + Sync>;

/// Implemented by whatever observes requests (browser hook, HAR replay, proxy).
pub trait RequestInterceptor {
    /// Registers `callback` for every blockable request whose URL matches `filter`.
    fn register(&self, filter: RequestFilter, callback: RequestCallback);
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid URL match pattern {0:?}")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemeMatch {
    /// `*`: http or https.
    Web,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostMatch {
    Any,
    /// `*.example.com`: the domain itself and any subdomain.
    Domain(String),
    Exact(String),
}

/// One browser match pattern, `<scheme>://<host><path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MatchPattern {
    scheme: SchemeMatch,
    host: HostMatch,
    path: String,
}

impl MatchPattern {
    fn parse(pattern: &str) -> Result<Self, FilterError> {
        let invalid = || FilterError::InvalidPattern(pattern.to_string());
        if pattern == "<all_urls>" {
            return Ok(Self {
                scheme: SchemeMatch::Web,
                host: HostMatch::Any,
                path: "/*".to_string(),
            });
        }

        let (scheme, rest) = pattern.split_once("://").ok_or_else(invalid)?;
        let (host, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => return Err(invalid()),
        };

        let scheme = match scheme {
            "*" => SchemeMatch::Web,
            s if !s.is_empty() && !s.contains('*') => SchemeMatch::Exact(s.to_ascii_lowercase()),
            _ => return Err(invalid()),
        };
        let host = match host {
            "*" => HostMatch::Any,
            h if h.starts_with("*.") && h.len() > 2 && !h[2..].contains('*') => {
                HostMatch::Domain(h[2..].to_ascii_lowercase())
            }
            h if !h.is_empty() && !h.contains('*') => HostMatch::Exact(h.to_ascii_lowercase()),
            _ => return Err(invalid()),
        };

        Ok(Self {
            scheme,
            host,
            path: path.to_string(),
        })
    }

    fn matches(&self, url: &Url) -> bool {
        let scheme_ok = match &self.scheme {
            SchemeMatch::Web => matches!(url.scheme(), "http" | "https"),
            SchemeMatch::Exact(s) => url.scheme() == s,
        };
        if !scheme_ok {
            return false;
        }

        let host = url.host_str().unwrap_or_default();
        let host_ok = match &self.host {
            HostMatch::Any => true,
            HostMatch::Domain(domain) => {
                host == domain
                    || (host.len() > domain.len()
                        && host.ends_with(domain.as_str())
                        && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
            }
            HostMatch::Exact(h) => host == h,
        };
        if !host_ok {
            return false;
        }

        let mut path = url.path().to_string();
        if let Some(q) = url.query() {
            path.push('?');
            path.push_str(q);
        }
        glob_match(&self.path, &path)
    }
}

/// Set of URL match patterns; a request is in scope if any pattern matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    patterns: Vec<MatchPattern>,
}

impl RequestFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterError> {
        let patterns = patterns
            .iter()
            .map(|p| MatchPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Unparsable URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.patterns.iter().any(|p| p.matches(&parsed)),
            Err(_) => false,
        }
    }
}

/// `*` matches any run of characters, everything else matches itself.
fn glob_match(pattern: &str, text: &str) -> bool {
    let (p, t) = (pattern.as_bytes(), text.as_bytes());
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && p[pi] == b'*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((star, start)) = backtrack {
            pi = star + 1;
            ti = start + 1;
            backtrack = Some((star, start + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn googlevideo() -> RequestFilter {
        RequestFilter::new(&["*://*.googlevideo.com/*"]).unwrap()
    }

    #[test]
    fn subdomain_wildcard() {
        let f = googlevideo();
        assert!(f.matches("https://r1---sn-x.googlevideo.com/videoplayback?mime=audio%2Fwebm"));
        assert!(f.matches("http://googlevideo.com/x"));
        assert!(!f.matches("https://notgooglevideo.com/x"));
        assert!(!f.matches("https://googlevideo.com.evil.net/x"));
    }

    #[test]
    fn scheme_wildcard_is_web_only() {
        let f = googlevideo();
        assert!(!f.matches("ftp://a.googlevideo.com/x"));
        assert!(!f.matches("wss://a.googlevideo.com/x"));
    }

    #[test]
    fn exact_host_and_path_glob() {
        let f = RequestFilter::new(&["https://example.com/api/*/stream"]).unwrap();
        assert!(f.matches("https://example.com/api/v1/stream"));
        assert!(!f.matches("https://example.com/api/v1/other"));
        assert!(!f.matches("http://example.com/api/v1/stream"));
        assert!(!f.matches("https://sub.example.com/api/v1/stream"));
    }

    #[test]
    fn all_urls() {
        let f = RequestFilter::new(&["<all_urls>"]).unwrap();
        assert!(f.matches("https://anything.test/"));
        assert!(!f.matches("not a url"));
    }

    #[test]
    fn invalid_patterns() {
        for bad in ["googlevideo.com", "*://*.googlevideo.com", "*://a*b.com/*", "h*://x/*"] {
            assert!(RequestFilter::new(&[bad]).is_err(), "{bad}");
        }
    }

    #[test]
    fn glob() {
        assert!(glob_match("/*", "/"));
        assert!(glob_match("/a*c*", "/abxcd"));
        assert!(!glob_match("/a*c", "/abxcd"));
        assert!(glob_match("*", ""));
    }
}
