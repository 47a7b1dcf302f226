use regex::Regex;
use url::Url;

use crate::search_client::SearchResult;

/// A deduplicated, extracted profile record ready for output. Uniqueness
/// key is `linkedin_url`; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub name: String,
    pub linkedin_url: String,
    pub search_keyword: String,
    pub profession: String,
}

pub struct ProfileExtractor {
    // Personal profile path: /in/<slug>, nothing after the slug.
    profile_path: Regex,
}

impl ProfileExtractor {
    pub fn new() -> Self {
        ProfileExtractor {
            profile_path: Regex::new(r"^/in/[^/?#]+/?$").unwrap(),
        }
    }

    /// Turns one search result into a candidate, or filters it out.
    /// A `None` here is not an error: company/group/post pages and
    /// results without a usable name are simply skipped.
    pub fn extract(
        &self,
        result: &SearchResult,
        keyword: &str,
        profession: &str,
    ) -> Option<CandidateProfile> {
        let linkedin_url = self.canonical_profile_url(&result.url)?;
        let name = derive_name(&result.title, &result.snippet)?;
        Some(CandidateProfile {
            name,
            linkedin_url,
            search_keyword: keyword.to_string(),
            profession: profession.to_string(),
        })
    }

    /// Accepts only LinkedIn personal-profile URLs and canonicalizes them:
    /// tracking query parameters, fragments and trailing slashes are
    /// stripped so the same profile always compares equal for dedup.
    pub fn canonical_profile_url(&self, raw: &str) -> Option<String> {
        let mut url = Url::parse(raw).ok()?;
        let host = url.host_str()?;
        if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
            return None;
        }
        if !self.profile_path.is_match(url.path()) {
            return None;
        }
        url.set_query(None);
        url.set_fragment(None);
        let mut canonical = url.to_string();
        while canonical.ends_with('/') {
            canonical.pop();
        }
        Some(canonical)
    }
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a display name from the result title (snippet as fallback):
/// drop the "| LinkedIn" boilerplate, then keep the text before the first
/// role/company separator.
fn derive_name(title: &str, snippet: &str) -> Option<String> {
    let source = if title.trim().is_empty() { snippet } else { title };
    let mut text = source.trim();

    for suffix in ["| LinkedIn", "- LinkedIn"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.trim_end();
        }
    }

    let name = text
        .split(" - ")
        .next()
        .and_then(|part| part.split(" \u{2013} ").next())
        .and_then(|part| part.split(" | ").next())
        .map(str::trim)
        .unwrap_or_default();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
