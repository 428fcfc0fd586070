//! Link validation

use url::Url;

/// True only for absolute URLs with both a scheme and a host.
///
/// Malformed and relative links are rejected; this never panics.
pub fn is_valid_link(link: &str) -> bool {
    let link = link.trim();
    match Url::parse(link) {
        Ok(url) => {
            !url.scheme().is_empty()
                && url.host_str().map_or(false, |h| !h.is_empty())
                && has_authority(link, url.scheme())
        }
        Err(_) => false,
    }
}

/// `Url` fills in a host for `http:example.com`; require the written `//`.
fn has_authority(link: &str, scheme: &str) -> bool {
    link.get(scheme.len()..)
        .map_or(false, |rest| rest.starts_with("://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_are_valid() {
        for link in [
            "https://example.com",
            "http://example.com/path?q=1#frag",
            "https://sub.domain.example.org:8443/a/b",
            "http://127.0.0.1:8080/",
            "ftp://files.example.com/pub",
            "  HTTPS://Example.com/padded  ",
        ] {
            assert!(is_valid_link(link), "{link} should be valid");
        }
    }

    #[test]
    fn test_links_without_scheme_or_host_are_invalid() {
        for link in [
            "",
            "example.com",
            "/relative/path",
            "//example.com/no-scheme",
            "mailto:someone@example.com",
            "javascript:void(0)",
            "https://",
            "http://[::1",
            "not a url at all",
            "data:text/plain,hello",
            "http:example.com",
            "https:/example.com",
        ] {
            assert!(!is_valid_link(link), "{link} should be invalid");
        }
    }
}
