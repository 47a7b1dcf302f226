use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::ScrapeError;
use crate::extractor::CandidateProfile;

pub const CSV_HEADER: [&str; 4] = ["name", "linkedin_url", "search_keyword", "profession"];

/// Streaming CSV appender for accepted profiles. Flushes after every row
/// so an interrupted run still leaves a valid, parseable file.
///
/// Dedup is per run only: reopening an existing output file appends
/// without inspecting its prior rows, so duplicates can accumulate
/// across runs.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Opens `path` in append mode, writing the header row only when the
    /// file does not exist yet or is empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if needs_header {
            info!("Created output file {:?}", path);
        } else {
            info!("Appending to existing output file {:?}", path);
        }
        Self::from_writer(file, needs_header)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W, write_header: bool) -> Result<Self, ScrapeError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        if write_header {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }
        Ok(CsvSink { writer })
    }

    pub fn append(&mut self, profile: &CandidateProfile) -> Result<(), ScrapeError> {
        self.writer.write_record([
            profile.name.as_str(),
            profile.linkedin_url.as_str(),
            profile.search_keyword.as_str(),
            profile.profession.as_str(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, ScrapeError> {
        self.writer
            .into_inner()
            .map_err(|e| ScrapeError::Io(e.into_error()))
    }
}
