//! HTTP fetcher implementation
//!
//! This module handles the single GET issued for every book page:
//! - Building the HTTP client with the browser User-Agent and timeout
//! - Rejecting URLs that cannot be requested at all
//! - Classifying transport failures into a readable message
//! - Decoding the body with the charset the server declares

use crate::config::ScraperConfig;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Decoded page body
        body: String,
    },

    /// The page arrived without a declared charset and is not valid UTF-8
    Undecodable {
        final_url: String,
        /// Error description
        error: String,
    },

    /// The request could not be completed (bad URL, timeout, connection
    /// error, non-2xx status, or a body that could not be read)
    RequestFailed {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use shelfscrape::config::ScraperConfig;
/// use shelfscrape::extractor::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once, without retries
///
/// Every failure is returned as [`FetchResult::RequestFailed`]; this function
/// never returns an error or panics.
///
/// | Condition | Message |
/// |-----------|---------|
/// | Unparseable URL / non-HTTP scheme | `invalid URL ...` |
/// | Timeout | `request timed out ...` |
/// | Connection refused / DNS failure | `connection failed ...` |
/// | Non-2xx status | `HTTP <code> ...` |
/// | Body read error | `failed to read response body ...` |
///
/// A body whose `Content-Type` names a charset is decoded with that charset.
/// Without one it must be UTF-8, otherwise [`FetchResult::Undecodable`] is
/// returned.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let target = match Url::parse(url) {
        Ok(target) if target.scheme() == "http" || target.scheme() == "https" => target,
        Ok(target) => {
            return FetchResult::RequestFailed {
                error: format!("invalid URL '{}': unsupported scheme '{}'", url, target.scheme()),
            };
        }
        Err(e) => {
            return FetchResult::RequestFailed {
                error: format!("invalid URL '{}': {}", url, e),
            };
        }
    };

    let response = match client.get(target).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::RequestFailed {
                error: describe_error(&e),
            };
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::RequestFailed {
            error: format!("HTTP {} for url ({})", status, final_url),
        };
    }

    let status_code = status.as_u16();

    if let Some(charset) = declared_charset(response.headers()) {
        tracing::trace!("Decoding {} as {}", final_url, charset);
        return match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code,
                body,
            },
            Err(e) => FetchResult::RequestFailed {
                error: format!("failed to read response body: {}", describe_error(&e)),
            },
        };
    }

    match response.bytes().await {
        Ok(bytes) => match decode_utf8(bytes.to_vec()) {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code,
                body,
            },
            Err(error) => FetchResult::Undecodable { final_url, error },
        },
        Err(e) => FetchResult::RequestFailed {
            error: format!("failed to read response body: {}", describe_error(&e)),
        },
    }
}

/// Returns the `charset` parameter of the `Content-Type` header, if any
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type
        .split(';')
        .skip(1)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
        .filter(|charset| !charset.is_empty())
}

/// Decodes an undeclared body as UTF-8, dropping a leading byte-order mark
fn decode_utf8(body: Vec<u8>) -> Result<String, String> {
    let mut html = String::from_utf8(body)
        .map_err(|e| format!("document is not valid UTF-8: {}", e.utf8_error()))?;
    if html.starts_with('\u{feff}') {
        html.remove(0);
    }
    Ok(html)
}

/// Classifies a reqwest error into a readable message
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
