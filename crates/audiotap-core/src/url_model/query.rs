//! Ordered, key-unique view of a URL query string.

use url::Url;

/// Decoded query pairs in order of first appearance. A key that repeats keeps
/// its first position and first value; later duplicates are dropped.
pub fn unique_query_pairs(url: &Url) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if pairs.iter().any(|(existing, _)| existing.as_str() == &*key) {
            continue;
        }
        pairs.push((key.into_owned(), value.into_owned()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_decodes() {
        let url = Url::parse("https://h/p?b=2&a=audio%2Fwebm&c=").unwrap();
        assert_eq!(
            unique_query_pairs(&url),
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "audio/webm".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let url = Url::parse("https://h/p?k=1&x=0&k=2").unwrap();
        assert_eq!(
            unique_query_pairs(&url),
            vec![
                ("k".to_string(), "1".to_string()),
                ("x".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn no_query() {
        let url = Url::parse("https://h/p").unwrap();
        assert!(unique_query_pairs(&url).is_empty());
    }
}
