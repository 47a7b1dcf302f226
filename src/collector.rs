use std::collections::HashSet;
use std::io::Write;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::config::Config;
use crate::delay_manager;
use crate::error::ScrapeError;
use crate::extractor::ProfileExtractor;
use crate::output::CsvSink;
use crate::professions::Profession;
use crate::search_client::{ResultSource, SearchResult};

const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Terminal state of one profession's collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfessionOutcome {
    /// Quota reached; remaining keyword variants were not consumed.
    Satisfied,
    /// Keyword variants ran out before the quota was met.
    Exhausted,
}

#[derive(Debug)]
pub struct ProfessionReport {
    pub outcome: ProfessionOutcome,
    pub collected: usize,
}

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub quota: usize,
    pub max_pages_per_keyword: usize,
    pub request_delay: Duration,
    pub retry_pause: Duration,
}

impl From<&Config> for CollectorSettings {
    fn from(config: &Config) -> Self {
        CollectorSettings {
            quota: config.quota_per_profession,
            max_pages_per_keyword: config.max_pages_per_keyword,
            request_delay: config.request_delay,
            retry_pause: DEFAULT_RETRY_PAUSE,
        }
    }
}

/// Drives the keyword loop for each profession: search, extract, dedup
/// against the per-profession seen set, append to the sink, and stop at
/// quota or keyword exhaustion.
pub struct Collector<'a> {
    client: &'a dyn ResultSource,
    extractor: ProfileExtractor,
    settings: CollectorSettings,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a dyn ResultSource, settings: CollectorSettings) -> Self {
        Collector {
            client,
            extractor: ProfileExtractor::new(),
            settings,
        }
    }

    pub fn collect_profession<W: Write>(
        &self,
        profession: &Profession,
        sink: &mut CsvSink<W>,
    ) -> Result<ProfessionReport, ScrapeError> {
        // A zero quota is already met: no requests, no rows.
        if self.settings.quota == 0 {
            return Ok(ProfessionReport {
                outcome: ProfessionOutcome::Satisfied,
                collected: 0,
            });
        }

        // Seen set lives only for this profession; no cross-profession or
        // cross-run dedup.
        let mut seen: HashSet<String> = HashSet::new();
        let mut collected = 0usize;
        let mut first_request = true;

        info!("Processing profession: {}", profession.label);

        for keyword_query in profession.queries() {
            for page in 0..self.settings.max_pages_per_keyword {
                if !first_request {
                    delay_manager::request_delay(self.settings.request_delay);
                }
                first_request = false;

                let results = match self.fetch_page(&keyword_query.query, page) {
                    Ok(results) => results,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(
                            "Skipping keyword '{}' after repeated failures: {}",
                            keyword_query.keyword, e
                        );
                        break;
                    }
                };

                if results.is_empty() {
                    break;
                }

                for result in &results {
                    let candidate = match self.extractor.extract(
                        result,
                        keyword_query.keyword,
                        profession.label,
                    ) {
                        Some(candidate) => candidate,
                        None => continue,
                    };

                    if !seen.insert(candidate.linkedin_url.clone()) {
                        continue;
                    }

                    sink.append(&candidate)?;
                    collected += 1;
                    info!("Added: {} ({})", candidate.name, profession.label);

                    if collected >= self.settings.quota {
                        info!(
                            "Quota of {} reached for {}",
                            self.settings.quota, profession.label
                        );
                        return Ok(ProfessionReport {
                            outcome: ProfessionOutcome::Satisfied,
                            collected,
                        });
                    }
                }
            }
        }

        warn!(
            "Keywords exhausted for {} with {}/{} profiles",
            profession.label, collected, self.settings.quota
        );
        Ok(ProfessionReport {
            outcome: ProfessionOutcome::Exhausted,
            collected,
        })
    }

    /// One page fetch with the transient-retry policy: pause and retry
    /// once, then let the caller skip the keyword. Fatal errors pass
    /// straight through.
    fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<SearchResult>, ScrapeError> {
        match self.client.search(query, page) {
            Ok(results) => Ok(results),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Transient search failure, retrying once: {}", e);
                thread::sleep(self.settings.retry_pause);
                self.client.search(query, page)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Returns canned pages in call order; empty page once the script
    /// runs out.
    struct ScriptedSource {
        pages: RefCell<VecDeque<Result<Vec<SearchResult>, ScrapeError>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Vec<SearchResult>, ScrapeError>>) -> Self {
            ScriptedSource {
                pages: RefCell::new(pages.into()),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl ResultSource for ScriptedSource {
        fn search(&self, _query: &str, _page: usize) -> Result<Vec<SearchResult>, ScrapeError> {
            *self.calls.borrow_mut() += 1;
            self.pages.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn profiles(range: std::ops::Range<usize>) -> Vec<SearchResult> {
        range
            .map(|i| SearchResult {
                title: format!("Person {} - Registered Nurse | LinkedIn", i),
                snippet: String::new(),
                url: format!("https://www.linkedin.com/in/person-{}", i),
            })
            .collect()
    }

    fn settings(quota: usize, max_pages: usize) -> CollectorSettings {
        CollectorSettings {
            quota,
            max_pages_per_keyword: max_pages,
            request_delay: Duration::ZERO,
            retry_pause: Duration::ZERO,
        }
    }

    const NURSE: Profession = Profession {
        label: "Nurse",
        keywords: &["Nurse", "Registered Nurse"],
    };

    fn rows(sink: CsvSink<Vec<u8>>) -> Vec<String> {
        let bytes = sink.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn stops_at_quota_mid_keyword() {
        // First keyword yields 25 uniques then an empty page; second
        // keyword's single page carries 20 more.
        let source = ScriptedSource::new(vec![
            Ok(profiles(0..25)),
            Ok(Vec::new()),
            Ok(profiles(25..45)),
        ]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();

        assert_eq!(report.outcome, ProfessionOutcome::Satisfied);
        assert_eq!(report.collected, 40);
        // Quota hit mid-page: no further requests after the third.
        assert_eq!(source.calls(), 3);

        let rows = rows(sink);
        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|row| row.ends_with(",Nurse")));
    }

    #[test]
    fn zero_quota_writes_no_rows() {
        let source = ScriptedSource::new(vec![Ok(profiles(0..5))]);
        let collector = Collector::new(&source, settings(0, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();

        assert_eq!(report.outcome, ProfessionOutcome::Satisfied);
        assert_eq!(report.collected, 0);
        assert_eq!(source.calls(), 0);
        assert!(rows(sink).is_empty());
    }

    #[test]
    fn exhaustion_reports_shortfall_without_error() {
        let source = ScriptedSource::new(vec![Ok(profiles(0..7)), Ok(Vec::new()), Ok(profiles(7..12))]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();

        assert_eq!(report.outcome, ProfessionOutcome::Exhausted);
        assert_eq!(report.collected, 12);
        assert_eq!(rows(sink).len(), 12);
    }

    #[test]
    fn duplicate_urls_across_keywords_are_written_once() {
        // Second keyword returns the same three profiles plus one new one.
        let mut overlap = profiles(0..3);
        overlap.extend(profiles(10..11));
        let source = ScriptedSource::new(vec![Ok(profiles(0..3)), Ok(Vec::new()), Ok(overlap)]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();

        assert_eq!(report.collected, 4);
        let rows = rows(sink);
        let urls: HashSet<&str> = rows
            .iter()
            .map(|row| row.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(urls.len(), rows.len(), "accepted URLs must be pairwise distinct");
    }

    #[test]
    fn tracking_params_do_not_defeat_dedup() {
        let same_profile = |suffix: &str| SearchResult {
            title: "Jane Doe - RN | LinkedIn".to_string(),
            snippet: String::new(),
            url: format!("https://www.linkedin.com/in/jane-doe{}", suffix),
        };
        let source = ScriptedSource::new(vec![Ok(vec![
            same_profile("?trk=abc"),
            same_profile("/"),
            same_profile(""),
        ])]);
        let collector = Collector::new(&source, settings(40, 1));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();
        assert_eq!(report.collected, 1);
    }

    #[test]
    fn repeated_transient_failure_skips_keyword_only() {
        // Keyword one fails twice (initial + retry); keyword two succeeds.
        let source = ScriptedSource::new(vec![
            Err(ScrapeError::RateLimited("HTTP 429".into())),
            Err(ScrapeError::RateLimited("HTTP 429".into())),
            Ok(profiles(0..2)),
            Ok(Vec::new()),
        ]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();

        assert_eq!(report.outcome, ProfessionOutcome::Exhausted);
        assert_eq!(report.collected, 2);
    }

    #[test]
    fn transient_failure_recovers_on_retry() {
        let source = ScriptedSource::new(vec![
            Err(ScrapeError::RateLimited("HTTP 429".into())),
            Ok(profiles(0..2)),
            Ok(Vec::new()),
        ]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();
        assert_eq!(report.collected, 2);
    }

    #[test]
    fn auth_failure_aborts_the_run() {
        let source = ScriptedSource::new(vec![Err(ScrapeError::Auth("HTTP 401".into()))]);
        let collector = Collector::new(&source, settings(40, 5));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let err = collector.collect_profession(&NURSE, &mut sink).unwrap_err();
        assert!(matches!(err, ScrapeError::Auth(_)));
        // No retry for fatal errors.
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn company_pages_are_filtered_not_counted() {
        let mut page = profiles(0..2);
        page.push(SearchResult {
            title: "Acme Corp | LinkedIn".to_string(),
            snippet: String::new(),
            url: "https://www.linkedin.com/company/acme".to_string(),
        });
        let source = ScriptedSource::new(vec![Ok(page)]);
        let collector = Collector::new(&source, settings(40, 1));
        let mut sink = CsvSink::from_writer(Vec::new(), false).unwrap();

        let report = collector.collect_profession(&NURSE, &mut sink).unwrap();
        assert_eq!(report.collected, 2);
    }
}
