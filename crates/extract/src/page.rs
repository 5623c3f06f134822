// ABOUTME: PageLoader fetches catalog pages over blocking HTTP and parses them into scraper documents.
// ABOUTME: LoaderBuilder provides a fluent API for user agent, timeout, and extra headers.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use scraper::Html;
use tracing::debug;

use crate::error::ExtractError;

const DEFAULT_USER_AGENT: &str = "haras/0.1";

/// Configuration for a [`PageLoader`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub headers: HashMap<String, String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            headers: HashMap::new(),
        }
    }
}

/// Builder for constructing PageLoader instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderBuilder {
    opts: LoaderOptions,
}

impl LoaderBuilder {
    /// Create a new LoaderBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set a whole-request timeout. Without one, the HTTP client's default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Build the loader.
    pub fn build(self) -> Result<PageLoader, ExtractError> {
        PageLoader::new(self.opts)
    }
}

/// Fetches a URL and hands back a parsed, traversable document.
///
/// Requests are blocking and sequential; there is no retry. Any network error
/// or non-success status is returned to the caller.
#[derive(Debug, Clone)]
pub struct PageLoader {
    http: HttpClient,
    headers: HashMap<String, String>,
}

impl PageLoader {
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    pub fn new(opts: LoaderOptions) -> Result<Self, ExtractError> {
        let mut builder = HttpClient::builder().user_agent(opts.user_agent);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            ExtractError::fetch("", "Build", Some(anyhow::anyhow!("http client: {}", e)))
        })?;
        Ok(Self {
            http,
            headers: opts.headers,
        })
    }

    /// Fetches `url` and returns the decoded body text.
    pub fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let parsed = url::Url::parse(url).map_err(|e| {
            ExtractError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ExtractError::invalid_url(
                url,
                "Fetch",
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        let mut request = self.http.get(parsed);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request.send().map_err(|e| {
            ExtractError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::status(url, "Fetch", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(|e| {
            ExtractError::fetch(url, "Fetch", Some(anyhow::anyhow!("reading body: {}", e)))
        })?;

        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched page");
        Ok(decode_body(&body, content_type.as_deref()))
    }

    /// Fetches and parses `url`.
    pub fn load(&self, url: &str) -> Result<Html, ExtractError> {
        let body = self.fetch(url)?;
        Ok(load_html(&body))
    }
}

/// Parses an HTML string. Parsing is tolerant and never fails.
pub fn load_html(html: &str) -> Html {
    Html::parse_document(html)
}

/// Parses raw page bytes, such as a saved page, detecting their charset.
pub fn load_html_bytes(body: &[u8]) -> Html {
    load_html(&decode_body(body, None))
}

/// Decode body bytes to a String using charset from content-type header or detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn charset_is_read_from_content_type() {
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn latin1_body_is_decoded_with_declared_charset() {
        // "Placés 3€" in windows-1252
        let body = b"Plac\xe9s 3\x80";
        assert_eq!(decode_body(body, Some("text/html; charset=windows-1252")), "Placés 3€");
    }

    #[test]
    fn utf8_body_without_charset_is_detected() {
        let body = "Gains 1 234€".as_bytes();
        assert_eq!(decode_body(body, None), "Gains 1 234€");
    }

    #[test]
    fn saved_latin1_page_is_detected_without_header() {
        let body: &[u8] =
            b"<html><body><h1 class=\"fiche\">Id\xe9al du Gazeau</h1><p>Plac\xe9s</p></body></html>";
        let doc = load_html_bytes(body);
        let text: String = doc.root_element().text().collect();
        assert!(text.contains("Idéal du Gazeau"), "decoded text was: {text}");
        assert!(text.contains("Placés"));
    }

    #[test]
    fn invalid_urls_are_rejected_before_any_request() {
        let loader = PageLoader::builder().build().unwrap();
        let err = loader.fetch("not a url").unwrap_err();
        assert!(err.is_invalid_url());
        let err = loader.fetch("ftp://example.com/file").unwrap_err();
        assert!(err.is_invalid_url());
    }
}
