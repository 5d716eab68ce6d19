use std::fmt;

use url::Url;

/// Favicon lookup endpoint; the bookmark's origin is appended.
pub const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=32&domain_url=";

/// True only for absolute URLs with an `http` or `https` scheme.
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Display domain: the host without a leading `www.`.
///
/// Falls back to `raw` when it does not parse or carries no host.
pub fn domain_of(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    match parsed.host_str() {
        Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
        None => raw.to_string(),
    }
}

/// Favicon image URL for the bookmark's origin, or `None` when `raw` does not
/// parse. Callers render a fallback glyph for `None`.
pub fn favicon_url_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    Some(format!(
        "{FAVICON_SERVICE}{}",
        parsed.origin().ascii_serialization()
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    EmptyTitle,
    EmptyUrl,
    InvalidUrl,
}

impl DraftError {
    /// Whether the error belongs next to the url field rather than the title.
    pub fn is_url_error(self) -> bool {
        matches!(self, DraftError::EmptyUrl | DraftError::InvalidUrl)
    }
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::EmptyTitle => write!(f, "Please enter a title"),
            DraftError::EmptyUrl => write!(f, "Please enter a URL"),
            DraftError::InvalidUrl => {
                write!(f, "Please enter a valid URL (e.g., https://example.com)")
            }
        }
    }
}

/// A (title, url) pair that passed [`validate_draft`], trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub url: String,
}

/// Checks an edit buffer before it may be persisted.
pub fn validate_draft(title: &str, url: &str) -> Result<ValidDraft, DraftError> {
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() {
        return Err(DraftError::EmptyTitle);
    }
    if url.is_empty() {
        return Err(DraftError::EmptyUrl);
    }
    if !is_valid_url(url) {
        return Err(DraftError::InvalidUrl);
    }
    Ok(ValidDraft {
        title: title.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_must_be_http_or_https() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(!is_valid_url("ftp://x.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn domain_strips_only_leading_www() {
        assert_eq!(domain_of("https://www.example.com/a"), "example.com");
        assert_eq!(domain_of("https://docs.www.example.com"), "docs.www.example.com");
        assert_eq!(domain_of("http://localhost:8080"), "localhost");
        assert_eq!(domain_of("bad"), "bad");
    }

    #[test]
    fn favicon_uses_origin_and_keeps_port() {
        assert_eq!(
            favicon_url_of("https://www.example.com/deep/path?x=1").as_deref(),
            Some("https://www.google.com/s2/favicons?sz=32&domain_url=https://www.example.com")
        );
        assert_eq!(
            favicon_url_of("http://localhost:8080/x").as_deref(),
            Some("https://www.google.com/s2/favicons?sz=32&domain_url=http://localhost:8080")
        );
        assert_eq!(favicon_url_of("nope"), None);
    }

    #[test]
    fn draft_checks_title_before_url() {
        assert_eq!(validate_draft("  ", "bad"), Err(DraftError::EmptyTitle));
        assert_eq!(validate_draft("T", " "), Err(DraftError::EmptyUrl));
        assert_eq!(validate_draft("T", "ftp://x.com"), Err(DraftError::InvalidUrl));
        assert_eq!(
            validate_draft(" T ", " https://t.com "),
            Ok(ValidDraft {
                title: "T".to_string(),
                url: "https://t.com".to_string(),
            })
        );
    }
}
