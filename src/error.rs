use thiserror::Error;

/// Failure taxonomy for a collection run. Transient variants are retried
/// once and then the current keyword variant is skipped; fatal variants
/// abort the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("search provider rejected the credential: {0}")]
    Auth(String),

    #[error("search provider rate limited the request: {0}")]
    RateLimited(String),

    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP {status} from search provider: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("output file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Fatal errors abort the run. A provider hiccup on one keyword must
    /// never take down collection for the remaining professions, so
    /// rate limits and network failures stay non-fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScrapeError::Config(_)
                | ScrapeError::Auth(_)
                | ScrapeError::Io(_)
                | ScrapeError::Csv(_)
        )
    }
}
