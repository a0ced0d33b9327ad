use url::Url;

/// Returned when input cannot be turned into an http(s) article URL.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid URL format: {reason}")]
pub struct InvalidUrl {
    pub input: String,
    pub reason: &'static str,
}

impl InvalidUrl {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Validate and normalize a pasted URL.
///
/// ```
/// use gist_pipeline::sanitizer::sanitize;
///
/// let url = sanitize("  www.example.com/a ").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.com/a");
/// assert!(sanitize("ftp://x.com").is_err());
/// assert!(sanitize("<a href=\"https://x.com\">x</a>").is_err());
/// ```
pub fn sanitize(raw: &str) -> Result<Url, InvalidUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrl::new(raw, "please enter an article URL"));
    }
    if trimmed.contains('<') || trimmed.contains('>') {
        return Err(InvalidUrl::new(
            raw,
            "please paste a clean article URL (e.g., https://example.com/article), not HTML",
        ));
    }

    let candidate = if trimmed.starts_with("www.") {
        format!("https://{trimmed}")
    } else {
        trimmed.to_string()
    };

    let url = Url::parse(&candidate).map_err(|_| {
        InvalidUrl::new(
            raw,
            "please enter a valid article URL starting with http:// or https://",
        )
    })?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(InvalidUrl::new(
            raw,
            "please enter a valid article URL starting with http:// or https://",
        )),
    }
}
