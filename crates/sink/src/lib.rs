// ABOUTME: Output side of the horse catalog pipeline: CSV files and a document store.
// ABOUTME: SinkWriter persists each record to whichever sinks are open and requested.

pub mod document;
pub mod error;
pub mod tabular;

pub use document::{
    DocumentSink, HorseDocument, MemorySink, MongoSink, CREATED_AT_FORMAT, DEFAULT_COLLECTION,
};
pub use error::SinkError;
pub use tabular::{read_links, read_records, CsvSink, LinkSink, RecordSink, LINK_HEADER};

use chrono::{Local, NaiveDate};
use haras_extract::HorseRecord;
use tracing::{debug, warn};

/// Which sinks a record should go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub tabular: bool,
    pub document: bool,
}

impl Targets {
    pub const BOTH: Targets = Targets {
        tabular: true,
        document: true,
    };

    pub fn any(&self) -> bool {
        self.tabular || self.document
    }
}

/// What happened to the document side of one persist call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    Inserted,
    /// The insert was attempted and failed; the failure has been logged.
    Failed,
    /// Not requested, or no document sink is open.
    Skipped,
}

/// Result of persisting one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persisted {
    pub row_written: bool,
    pub document: DocumentOutcome,
}

/// Holds the run's open sinks. A sink that failed to open is simply absent.
///
/// Dropping the writer closes the record file and the document client.
pub struct SinkWriter<'a> {
    records: Option<RecordSink>,
    documents: Option<Box<dyn DocumentSink + 'a>>,
}

impl<'a> SinkWriter<'a> {
    pub fn new(records: Option<RecordSink>, documents: Option<Box<dyn DocumentSink + 'a>>) -> Self {
        Self { records, documents }
    }

    pub fn has_tabular(&self) -> bool {
        self.records.is_some()
    }

    pub fn has_document(&self) -> bool {
        self.documents.is_some()
    }

    /// Persists `record`, stamping documents with today's local date.
    pub fn persist(&mut self, record: &HorseRecord, targets: Targets) -> Result<Persisted, SinkError> {
        self.persist_on(record, targets, Local::now().date_naive())
    }

    /// Persists `record` with an explicit capture date.
    ///
    /// A failed row write is returned as an error. A failed document insert
    /// is logged and reported as [`DocumentOutcome::Failed`] so the run can
    /// move on to the next horse.
    pub fn persist_on(
        &mut self,
        record: &HorseRecord,
        targets: Targets,
        captured_on: NaiveDate,
    ) -> Result<Persisted, SinkError> {
        let mut row_written = false;
        if targets.tabular {
            if let Some(sink) = self.records.as_mut() {
                sink.write_record(record)?;
                row_written = true;
            } else {
                debug!(name = %record.name, "record file not open, row skipped");
            }
        }

        let mut document = DocumentOutcome::Skipped;
        if targets.document {
            if let Some(sink) = self.documents.as_mut() {
                let doc = HorseDocument::from_record(record, captured_on);
                document = match sink.insert(&doc) {
                    Ok(()) => DocumentOutcome::Inserted,
                    Err(err) => {
                        warn!(name = %record.name, error = %err, "document insert failed, skipping");
                        DocumentOutcome::Failed
                    }
                };
            } else {
                debug!(name = %record.name, "document store not open, insert skipped");
            }
        }

        Ok(Persisted {
            row_written,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct FailingSink;

    impl DocumentSink for FailingSink {
        fn insert(&mut self, _document: &HorseDocument) -> Result<(), SinkError> {
            Err(SinkError::document("write concern error"))
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn persists_to_both_sinks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        let mut memory = MemorySink::new();
        {
            let mut writer = SinkWriter::new(
                Some(RecordSink::create(&path).unwrap()),
                Some(Box::new(&mut memory)),
            );
            let outcome = writer
                .persist_on(&HorseRecord::named("Hohneck"), Targets::BOTH, day())
                .unwrap();
            assert_eq!(
                outcome,
                Persisted {
                    row_written: true,
                    document: DocumentOutcome::Inserted
                }
            );
        }
        assert_eq!(read_records(&path).unwrap().len(), 1);
        assert_eq!(memory.documents()[0].created_at, "17/05/2024");
    }

    #[test]
    fn targets_toggle_each_sink() {
        let mut memory = MemorySink::new();
        let mut writer = SinkWriter::new(None, Some(Box::new(&mut memory)));
        let outcome = writer
            .persist_on(
                &HorseRecord::named("X"),
                Targets {
                    tabular: true,
                    document: false,
                },
                day(),
            )
            .unwrap();
        assert_eq!(outcome.document, DocumentOutcome::Skipped);
        assert!(!outcome.row_written);
        drop(writer);
        assert!(memory.documents().is_empty());
    }

    #[test]
    fn failed_insert_is_reported_not_raised() {
        let mut writer = SinkWriter::new(None, Some(Box::new(FailingSink)));
        let outcome = writer.persist_on(&HorseRecord::named("Y"), Targets::BOTH, day()).unwrap();
        assert_eq!(outcome.document, DocumentOutcome::Failed);
    }

    #[test]
    fn missing_sinks_are_no_ops() {
        let mut writer = SinkWriter::new(None, None);
        assert!(!writer.has_tabular());
        assert!(!writer.has_document());
        let outcome = writer.persist_on(&HorseRecord::default(), Targets::BOTH, day()).unwrap();
        assert_eq!(
            outcome,
            Persisted {
                row_written: false,
                document: DocumentOutcome::Skipped
            }
        );
    }
}
