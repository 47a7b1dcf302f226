pub mod collector;
pub mod config;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod output;
pub mod professions;
pub mod search_client;

// Exporting types for convenience
pub use collector::{Collector, CollectorSettings, ProfessionOutcome, ProfessionReport};
pub use config::{Config, ProviderKind};
pub use error::ScrapeError;
pub use extractor::{CandidateProfile, ProfileExtractor};
pub use output::CsvSink;
pub use professions::{KeywordQuery, Profession, PROFESSIONS};
pub use search_client::{ResultSource, SearchResult};
