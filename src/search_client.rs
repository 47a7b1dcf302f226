use std::time::Duration;

use log::info;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::{Config, ProviderKind};
use crate::error::ScrapeError;

const GOOGLE_API_URL: &str = "https://www.googleapis.com/customsearch/v1";
const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

pub const GOOGLE_RESULTS_PER_PAGE: usize = 10;
pub const BRAVE_RESULTS_PER_PAGE: usize = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One entry of a provider's result list, normalized across providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Adapter boundary over the search provider: one query, one page of typed
/// records. Both provider variants implement this so the collection loop is
/// provider-agnostic.
pub trait ResultSource {
    fn search(&self, query: &str, page: usize) -> Result<Vec<SearchResult>, ScrapeError>;
}

pub fn build_client(config: &Config) -> Result<Box<dyn ResultSource>, ScrapeError> {
    Ok(match config.provider {
        ProviderKind::Google => {
            let cx = config.cx.clone().ok_or_else(|| {
                ScrapeError::Config("GOOGLE_CX is required for the google provider".into())
            })?;
            Box::new(GoogleSearchClient::new(config.api_key.clone(), cx)?)
        }
        ProviderKind::Brave => Box::new(BraveSearchClient::new(config.api_key.clone())?),
    })
}

fn http_client(extra_headers: HeaderMap) -> Result<Client, ScrapeError> {
    let mut headers = extra_headers;
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

fn check_status(resp: Response) -> Result<Response, ScrapeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = error_detail(&resp.text().unwrap_or_default());
    match status.as_u16() {
        401 | 403 => Err(ScrapeError::Auth(format!("HTTP {}: {}", status, body))),
        429 => Err(ScrapeError::RateLimited(format!("HTTP 429: {}", body))),
        code => Err(ScrapeError::HttpStatus { status: code, body }),
    }
}

/// Both providers wrap failures in a JSON envelope; surface the message
/// when one is present, otherwise fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.pointer("/message"))
                .and_then(|message| message.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| truncate(body))
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    // Cut on a character boundary; provider error pages are not always
    // ASCII.
    match trimmed.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

// --- Google Custom Search ---

pub struct GoogleSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    cx: String,
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: String, cx: String) -> Result<Self, ScrapeError> {
        Self::with_base_url(api_key, cx, GOOGLE_API_URL.to_string())
    }

    fn with_base_url(api_key: String, cx: String, base_url: String) -> Result<Self, ScrapeError> {
        Ok(GoogleSearchClient {
            client: http_client(HeaderMap::new())?,
            base_url,
            api_key,
            cx,
        })
    }
}

impl ResultSource for GoogleSearchClient {
    fn search(&self, query: &str, page: usize) -> Result<Vec<SearchResult>, ScrapeError> {
        // Google pages via a 1-based result index, not a page number.
        let start = (page * GOOGLE_RESULTS_PER_PAGE + 1).to_string();
        let num = GOOGLE_RESULTS_PER_PAGE.to_string();
        info!("Google query: '{}' (page {})", query, page);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("key", &self.api_key),
                ("cx", &self.cx),
                ("num", &num),
                ("start", &start),
            ])
            .send()?;

        let body: GoogleResponse = check_status(resp)?.json()?;
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchResult {
                title: item.title,
                snippet: item.snippet,
                url: item.link,
            })
            .collect())
    }
}

// --- Brave Search ---

pub struct BraveSearchClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: BraveWeb,
}

#[derive(Deserialize, Default)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveItem>,
}

#[derive(Deserialize)]
struct BraveItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveSearchClient {
    pub fn new(api_key: String) -> Result<Self, ScrapeError> {
        Self::with_base_url(api_key, BRAVE_API_URL.to_string())
    }

    fn with_base_url(api_key: String, base_url: String) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&api_key).map_err(|_| {
            ScrapeError::Config("BRAVE_API_KEY contains characters not valid in a header".into())
        })?;
        headers.insert("X-Subscription-Token", token);

        Ok(BraveSearchClient {
            client: http_client(headers)?,
            base_url,
        })
    }
}

impl ResultSource for BraveSearchClient {
    fn search(&self, query: &str, page: usize) -> Result<Vec<SearchResult>, ScrapeError> {
        let count = BRAVE_RESULTS_PER_PAGE.to_string();
        let offset = page.to_string();
        info!("Brave query: '{}' (page {})", query, page);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("source", "api"),
                ("count", &count),
                ("offset", &offset),
            ])
            .send()?;

        let body: BraveResponse = check_status(resp)?.json()?;
        Ok(body
            .web
            .results
            .into_iter()
            .map(|item| SearchResult {
                title: item.title,
                snippet: item.description,
                url: item.url,
            })
            .collect())
    }
}
