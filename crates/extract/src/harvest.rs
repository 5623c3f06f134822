// ABOUTME: Link harvesting for listing pages: collects anchor hrefs from marker-tagged table rows.
// ABOUTME: Also turns detail-page hrefs into bare identifiers for the link list.

use scraper::Html;
use tracing::{debug, warn};

use crate::lookup::{find_all, root, Query};

/// Row classes that mark real horse rows on a listing page, in scan order.
pub const DEFAULT_ROW_MARKERS: [&str; 2] = ["trOne", "trTwo"];

/// Token between a detail page's name and its horse id, e.g. `fiche.html?idcheval=42`.
const DETAIL_ID_TOKEN: &str = ".html?idcheval=";

/// Outcome of scanning one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    /// Raw hrefs in emission order.
    pub links: Vec<String>,
    /// Markers whose scan stopped early on a malformed anchor.
    pub truncated_markers: Vec<String>,
}

impl Harvest {
    pub fn is_complete(&self) -> bool {
        self.truncated_markers.is_empty()
    }

    /// Harvested links reduced to identifiers (see [`to_identifier`]).
    pub fn identifiers(&self) -> Vec<String> {
        self.links.iter().map(|l| to_identifier(l)).collect()
    }
}

/// Collects detail-page links from listing rows tagged with known markers.
#[derive(Debug, Clone)]
pub struct LinkHarvester {
    markers: Vec<String>,
}

impl Default for LinkHarvester {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_MARKERS)
    }
}

impl LinkHarvester {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Scans `doc` marker by marker.
    ///
    /// Links come out in marker order, then row order, then anchor order.
    /// An anchor without `href` ends that marker's scan; what was collected
    /// before it is kept and the next marker still runs.
    pub fn harvest(&self, doc: &Html) -> Harvest {
        let mut harvest = Harvest::default();

        for marker in &self.markers {
            let rows = find_all(root(doc), &Query::tag("tr").with_class(marker));
            debug!(marker = %marker, rows = rows.len(), "scanning listing rows");

            'rows: for row in rows {
                for anchor in find_all(row, &Query::tag("a")) {
                    match anchor.value().attr("href") {
                        Some(href) => harvest.links.push(href.to_string()),
                        None => {
                            warn!(marker = %marker, "anchor without href, stopping this marker");
                            harvest.truncated_markers.push(marker.clone());
                            break 'rows;
                        }
                    }
                }
            }
        }

        harvest
    }
}

/// Reduces a detail-page href to the identifier stored in the link list.
///
/// `fiche.html?idcheval=42` becomes `fiche_42`; hrefs without the token are
/// returned unchanged.
pub fn to_identifier(href: &str) -> String {
    href.replace(DETAIL_ID_TOKEN, "_")
}
