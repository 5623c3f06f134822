// ABOUTME: Document sinks: one flat document per horse, stamped with its capture date.
// ABOUTME: MongoSink writes to a MongoDB collection; MemorySink keeps documents in process.

use chrono::NaiveDate;
use haras_extract::HorseRecord;
use mongodb::bson::doc;
use mongodb::sync::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SinkError;

/// `createdAt` format: day/month/year.
pub const CREATED_AT_FORMAT: &str = "%d/%m/%Y";

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "horse";

/// The stored shape of one horse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseDocument {
    #[serde(rename = "horseName")]
    pub horse_name: String,
    #[serde(rename = "Gains")]
    pub gains: String,
    #[serde(rename = "Courues")]
    pub courues: String,
    #[serde(rename = "Victoires")]
    pub victoires: String,
    #[serde(rename = "Placés")]
    pub places: String,
    #[serde(rename = "Sexe")]
    pub sexe: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl HorseDocument {
    pub fn from_record(record: &HorseRecord, captured_on: NaiveDate) -> Self {
        Self {
            horse_name: record.name.clone(),
            gains: record.gains.clone(),
            courues: record.courues.clone(),
            victoires: record.victoires.clone(),
            places: record.places.clone(),
            sexe: record.sexe.clone(),
            age: record.age.clone(),
            created_at: captured_on.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// A store accepting one independent insert per horse.
pub trait DocumentSink {
    fn insert(&mut self, document: &HorseDocument) -> Result<(), SinkError>;
}

/// Inserts documents into a MongoDB collection.
///
/// The client is created once and released when the sink is dropped.
pub struct MongoSink {
    collection: Collection<HorseDocument>,
}

impl MongoSink {
    /// Connects and pings the server so an unreachable store is reported up front.
    pub fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, SinkError> {
        let client = Client::with_uri_str(uri).map_err(SinkError::document)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .run()
            .map_err(SinkError::document)?;
        info!(database, collection, "connected to document store");
        Ok(Self {
            collection: db.collection(collection),
        })
    }
}

impl DocumentSink for MongoSink {
    fn insert(&mut self, document: &HorseDocument) -> Result<(), SinkError> {
        self.collection
            .insert_one(document)
            .run()
            .map_err(SinkError::document)?;
        Ok(())
    }
}

/// Keeps inserted documents in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Vec<HorseDocument>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[HorseDocument] {
        &self.documents
    }
}

impl DocumentSink for MemorySink {
    fn insert(&mut self, document: &HorseDocument) -> Result<(), SinkError> {
        self.documents.push(document.clone());
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn insert(&mut self, document: &HorseDocument) -> Result<(), SinkError> {
        (**self).insert(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn created_at_is_day_month_year() {
        let record = HorseRecord::named("Timoko");
        let doc = HorseDocument::from_record(&record, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(doc.created_at, "09/03/2024");
        assert_eq!(doc.horse_name, "Timoko");
    }

    #[test]
    fn document_copies_every_fact() {
        let record = HorseRecord {
            name: "Up And Quick".to_string(),
            gains: "1 000".to_string(),
            courues: "20".to_string(),
            victoires: "5".to_string(),
            places: "9".to_string(),
            sexe: "H".to_string(),
            age: "9 ".to_string(),
        };
        let doc = HorseDocument::from_record(&record, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(
            (doc.gains.as_str(), doc.courues.as_str(), doc.victoires.as_str()),
            ("1 000", "20", "5")
        );
        assert_eq!((doc.places.as_str(), doc.sexe.as_str(), doc.age.as_str()), ("9", "H", "9 "));
    }

    #[test]
    fn invalid_connection_string_is_a_document_error() {
        let err = MongoSink::connect("not-a-mongo-uri", "haras", DEFAULT_COLLECTION)
            .err()
            .unwrap();
        assert!(matches!(err, SinkError::Document(_)));
    }

    #[test]
    fn memory_sink_keeps_insertion_order() {
        let mut sink = MemorySink::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        sink.insert(&HorseDocument::from_record(&HorseRecord::named("A"), day)).unwrap();
        sink.insert(&HorseDocument::from_record(&HorseRecord::named("B"), day)).unwrap();
        let names: Vec<&str> = sink.documents().iter().map(|d| d.horse_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
