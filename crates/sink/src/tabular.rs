// ABOUTME: CSV sinks for the link list and scraped records, flushed after every row.
// ABOUTME: Also reads both files back (the link list feeds the scrape stage).

use std::fs::File;
use std::path::{Path, PathBuf};

use haras_extract::{HorseRecord, RECORD_KEYS};
use serde::Deserialize;
use tracing::debug;

use crate::error::SinkError;

/// Header of the link list file.
pub const LINK_HEADER: [&str; 1] = ["link"];

/// A CSV file opened for writing with its header already on disk.
///
/// Every row is flushed as soon as it is written, so a crash mid-run loses at
/// most the row being written. The file closes when the sink is dropped.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl CsvSink {
    /// Creates (or truncates) `path` and writes `header`.
    pub fn create(path: impl AsRef<Path>, header: &[&str]) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| SinkError::io(&path, e))?;
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        let mut sink = Self {
            path,
            writer,
            rows: 0,
        };
        sink.write_fields(header)?;
        Ok(sink)
    }

    /// Appends one data row.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.write_fields(row)?;
        self.rows += 1;
        Ok(())
    }

    fn write_fields<I, T>(&mut self, fields: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.writer.flush().map_err(|e| SinkError::io(&self.path, e))
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes harvested identifiers under a `link` header.
pub struct LinkSink {
    inner: CsvSink,
}

impl LinkSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Ok(Self {
            inner: CsvSink::create(path, &LINK_HEADER)?,
        })
    }

    pub fn write_link(&mut self, identifier: &str) -> Result<(), SinkError> {
        self.inner.write_row([identifier])
    }

    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

/// Writes records as `Name,Gains,Courues,Victoires,Placés,Sexe,Age` rows.
pub struct RecordSink {
    inner: CsvSink,
}

impl RecordSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Ok(Self {
            inner: CsvSink::create(path, &RECORD_KEYS)?,
        })
    }

    pub fn write_record(&mut self, record: &HorseRecord) -> Result<(), SinkError> {
        self.inner.write_row(record.values())
    }

    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    link: String,
}

/// Reads the whole link list produced by a crawl.
pub fn read_links(path: impl AsRef<Path>) -> Result<Vec<String>, SinkError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SinkError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let mut links = Vec::new();
    for row in reader.deserialize::<LinkRow>() {
        links.push(row?.link);
    }
    debug!(path = %path.display(), links = links.len(), "read link list");
    Ok(links)
}

/// Reads a record file back into records.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<HorseRecord>, SinkError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SinkError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<HorseRecord>() {
        records.push(row?);
    }
    Ok(records)
}
