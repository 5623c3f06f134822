// ABOUTME: The crawl and scrape stages: listing page to link list, link list to persisted records.
// ABOUTME: Strictly sequential; each horse gets its own record value.

use std::fmt;

use haras_extract::{
    normalize, DetailExtractor, ExtractError, HorseRecord, LinkHarvester, PageLoader,
};
use haras_sink::{DocumentOutcome, LinkSink, SinkError, SinkWriter, Targets};
use tracing::{info, warn};

use crate::error::PipelineError;

/// What a crawl produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub links: usize,
    pub truncated_markers: Vec<String>,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crawled {} links", self.links)?;
        if !self.truncated_markers.is_empty() {
            write!(f, " (incomplete markers: {})", self.truncated_markers.join(", "))?;
        }
        Ok(())
    }
}

/// What a scrape produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub horses: usize,
    pub rows_written: usize,
    pub documents_inserted: usize,
    pub insert_failures: usize,
}

impl fmt::Display for ScrapeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scraped {} horses: {} rows, {} documents",
            self.horses, self.rows_written, self.documents_inserted
        )?;
        if self.insert_failures > 0 {
            write!(f, ", {} failed inserts", self.insert_failures)?;
        }
        Ok(())
    }
}

/// Loads the listing page once and writes every harvested identifier.
///
/// The link list is opened through `open_links` only after the page has
/// loaded, so a failed fetch leaves the previous list in place.
pub fn crawl<F>(
    loader: &PageLoader,
    harvester: &LinkHarvester,
    listing_url: &str,
    open_links: F,
) -> Result<CrawlSummary, PipelineError>
where
    F: FnOnce() -> Result<LinkSink, SinkError>,
{
    info!(url = listing_url, "loading listing page");
    let doc = loader.load(listing_url)?;
    let harvest = harvester.harvest(&doc);

    let mut links = open_links()?;
    for identifier in harvest.identifiers() {
        links.write_link(&identifier)?;
    }

    let summary = CrawlSummary {
        links: links.rows(),
        truncated_markers: harvest.truncated_markers,
    };
    if !summary.truncated_markers.is_empty() {
        warn!(markers = ?summary.truncated_markers, "harvest is partial");
    }
    info!(links = summary.links, path = %links.path().display(), "crawl finished");
    Ok(summary)
}

/// Detail page URL for an identifier: plain concatenation onto the base URL.
pub fn detail_url(base_url: &str, identifier: &str) -> String {
    format!("{}{}", base_url, identifier)
}

/// Loads one detail page and merges its facts into a fresh, uncleaned record.
pub fn extract_record(
    loader: &PageLoader,
    extractor: &DetailExtractor,
    url: &str,
) -> Result<HorseRecord, ExtractError> {
    let doc = loader.load(url)?;
    let mut record = HorseRecord::named(extractor.name(&doc));
    normalize::merge(&mut record, extractor.facts(&doc));
    Ok(record)
}

/// Visits every identifier in order and persists its record.
///
/// A page that fails to load ends the run. Records are cleaned only when
/// at least one sink is targeted.
pub fn scrape(
    loader: &PageLoader,
    extractor: &DetailExtractor,
    base_url: &str,
    identifiers: &[String],
    sinks: &mut SinkWriter<'_>,
    targets: Targets,
) -> Result<ScrapeSummary, PipelineError> {
    let mut summary = ScrapeSummary::default();

    for (i, identifier) in identifiers.iter().enumerate() {
        let url = detail_url(base_url, identifier);
        info!(n = i + 1, of = identifiers.len(), url = %url, "scraping horse");

        let mut record = extract_record(loader, extractor, &url)?;
        summary.horses += 1;
        if !targets.any() {
            continue;
        }

        normalize::clean(&mut record);
        let persisted = sinks.persist(&record, targets)?;
        if persisted.row_written {
            summary.rows_written += 1;
        }
        match persisted.document {
            DocumentOutcome::Inserted => summary.documents_inserted += 1,
            DocumentOutcome::Failed => summary.insert_failures += 1,
            DocumentOutcome::Skipped => {}
        }
    }

    info!(
        horses = summary.horses,
        rows = summary.rows_written,
        documents = summary.documents_inserted,
        failed_inserts = summary.insert_failures,
        "scrape finished"
    );
    Ok(summary)
}
