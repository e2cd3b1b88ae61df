use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

/// Best-effort favicon lookup for newly created links.
pub trait IconFetcher: Send + Sync {
    /// Returns base64-encoded icon bytes for a host, or `None` when anything
    /// goes wrong. Absence of an icon is never an error.
    fn fetch_icon(&self, host: &str) -> Option<String>;
}

/// Fetches `https://{host}/favicon.ico` with a blocking HTTP client.
pub struct HttpIconFetcher;

impl IconFetcher for HttpIconFetcher {
    fn fetch_icon(&self, host: &str) -> Option<String> {
        let url = format!("https://{host}/favicon.ico");
        let response = match reqwest::blocking::get(&url) {
            Ok(response) => response,
            Err(err) => {
                debug!("icon fetch for {host} failed: {err}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("icon fetch for {host} returned {}", response.status());
            return None;
        }
        let bytes = response.bytes().ok()?;
        Some(STANDARD.encode(&bytes))
    }
}

/// Fetcher for offline use: links are created without icons.
pub struct NoIconFetcher;

impl IconFetcher for NoIconFetcher {
    fn fetch_icon(&self, _host: &str) -> Option<String> {
        None
    }
}
