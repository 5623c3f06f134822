// ABOUTME: Library entry point for haras-extract: listing crawl and fact-sheet scraping primitives.
// ABOUTME: Re-exports PageLoader, LinkHarvester, DetailExtractor, the normalizer, and HorseRecord.

//! Extraction side of the horse catalog pipeline.
//!
//! - [`lookup`]: find-or-empty element lookups
//! - [`page`]: blocking fetch + parse
//! - [`harvest`]: listing page → detail links
//! - [`detail`]: detail page → name and fact pairs
//! - [`normalize`]: fact pairs → cleaned [`HorseRecord`]
//!
//! # Example
//!
//! ```no_run
//! use haras_extract::{normalize, DetailExtractor, ExtractError, PageLoader};
//!
//! fn main() -> Result<(), ExtractError> {
//!     let loader = PageLoader::builder().build()?;
//!     let doc = loader.load("https://example.com/fiche_42")?;
//!     let extractor = DetailExtractor::new();
//!     let record = normalize(extractor.name(&doc), extractor.facts(&doc));
//!     println!("{} won {} races", record.name, record.victoires);
//!     Ok(())
//! }
//! ```

pub mod detail;
pub mod error;
pub mod harvest;
pub mod lookup;
pub mod normalize;
pub mod page;
pub mod record;

pub use crate::detail::{DetailExtractor, FactPair, TrailingLabel, KNOWN_LABELS};
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::harvest::{to_identifier, Harvest, LinkHarvester, DEFAULT_ROW_MARKERS};
pub use crate::normalize::normalize;
pub use crate::page::{
    decode_body, load_html, load_html_bytes, LoaderBuilder, LoaderOptions, PageLoader,
};
pub use crate::record::{HorseRecord, FACT_KEYS, RECORD_KEYS};

// Parsed documents are scraper's; re-exported so callers don't need a direct dependency.
pub use scraper::Html;
