use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::error::ScrapeError;

const DEFAULT_QUOTA: usize = 40;
const DEFAULT_MAX_PAGES: usize = 5;
const DEFAULT_OUTPUT: &str = "raw_links.csv";
const DEFAULT_DELAY_SECS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    Brave,
}

/// Run settings, read once at startup and passed explicitly into the
/// search client and collection loop.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: String,
    /// Google Custom Search engine id. Required for the google provider.
    pub cx: Option<String>,
    pub quota_per_profession: usize,
    pub max_pages_per_keyword: usize,
    pub output_path: PathBuf,
    pub request_delay: Duration,
}

impl Config {
    /// Reads configuration from the process environment (a `.env` file is
    /// loaded first if present). Fails before any network activity when a
    /// required credential is missing.
    pub fn from_env() -> Result<Self, ScrapeError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!(
            "Configured provider: {:?}, quota {} per profession, max {} pages per keyword",
            config.provider, config.quota_per_profession, config.max_pages_per_keyword
        );
        Ok(config)
    }

    fn from_lookup<F>(get: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match get("SEARCH_PROVIDER").as_deref().map(str::trim) {
            None | Some("") | Some("google") => ProviderKind::Google,
            Some("brave") => ProviderKind::Brave,
            Some(other) => {
                return Err(ScrapeError::Config(format!(
                    "unknown SEARCH_PROVIDER '{}', expected 'google' or 'brave'",
                    other
                )))
            }
        };

        let (api_key, cx) = match provider {
            ProviderKind::Google => {
                let key = require(&get, "GOOGLE_API_KEY")?;
                let cx = require(&get, "GOOGLE_CX")?;
                (key, Some(cx))
            }
            ProviderKind::Brave => (require(&get, "BRAVE_API_KEY")?, None),
        };

        Ok(Config {
            provider,
            api_key,
            cx,
            quota_per_profession: parse_or(&get, "TARGET_PER_PROFESSION", DEFAULT_QUOTA)?,
            max_pages_per_keyword: parse_or(&get, "MAX_PAGES_PER_KEYWORD", DEFAULT_MAX_PAGES)?,
            output_path: get("OUTPUT_CSV")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            request_delay: Duration::from_secs(parse_or(
                &get,
                "REQUEST_DELAY_SECS",
                DEFAULT_DELAY_SECS,
            )?),
        })
    }
}

fn require<F>(get: &F, key: &str) -> Result<String, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ScrapeError::Config(format!(
            "{} environment variable is required",
            key
        ))),
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(value) if !value.trim().is_empty() => value.trim().parse().map_err(|_| {
            ScrapeError::Config(format!("{} must be a non-negative integer, got '{}'", key, value))
        }),
        _ => Ok(default),
    }
}
