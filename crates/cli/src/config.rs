// ABOUTME: Command-line and environment configuration for the haras binary.
// ABOUTME: Every setting is a clap flag with an env fallback; per-mode validation names the missing key.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use haras_extract::TrailingLabel;
use haras_sink::DEFAULT_COLLECTION;

use crate::error::ConfigError;

/// Crawl a horse catalog and scrape each horse's fact sheet.
#[derive(Parser, Debug)]
#[command(name = "haras")]
#[command(about = "Crawl a horse catalog and scrape fact sheets into CSV and MongoDB", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    /// Mode to run (default: scrape)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The selected mode; scrape when no subcommand is given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Scrape(ScrapeArgs::default()))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Harvest detail links from the listing page into the link list
    Crawl,
    /// Scrape every horse in the link list into the record file and document store
    Scrape(ScrapeArgs),
    /// Crawl, then scrape the links just harvested
    Run(ScrapeArgs),
    /// Extract one detail page and print its record as JSON
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeArgs {
    /// Do not write the record CSV
    #[arg(long = "no-csv")]
    pub no_csv: bool,

    /// Do not insert into the document store
    #[arg(long = "no-db")]
    pub no_db: bool,

    #[command(flatten)]
    pub extraction: ExtractionArgs,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractArgs {
    /// Saved detail page to read instead of fetching
    #[arg(long = "html")]
    pub html: Option<PathBuf>,

    /// Print compact JSON instead of pretty
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    #[command(flatten)]
    pub extraction: ExtractionArgs,

    /// Detail page URL (fetch mode)
    #[arg()]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionArgs {
    /// What to do with a label that ends its table row
    #[arg(long = "trailing-label", value_enum, default_value_t = TrailingLabelArg::Skip)]
    pub trailing_label: TrailingLabelArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingLabelArg {
    /// Drop the label
    #[default]
    Skip,
    /// Keep the label with an empty value
    Empty,
}

impl From<TrailingLabelArg> for TrailingLabel {
    fn from(arg: TrailingLabelArg) -> Self {
        match arg {
            TrailingLabelArg::Skip => TrailingLabel::Skip,
            TrailingLabelArg::Empty => TrailingLabel::EmptyValue,
        }
    }
}

/// Settings shared by every mode.
#[derive(Args, Debug, Clone, Default)]
pub struct Settings {
    /// Listing page to crawl
    #[arg(long, env = "URL_CRAWLING", global = true)]
    pub listing_url: Option<String>,

    /// Link list written by crawl and read by scrape
    #[arg(long, env = "CSV_CRAWLING", global = true)]
    pub links_csv: Option<PathBuf>,

    /// Record CSV written by scrape
    #[arg(long, env = "CSV_SCRAPING", global = true)]
    pub records_csv: Option<PathBuf>,

    /// Prefix joined to each identifier to form its detail page URL
    #[arg(long, env = "BASE_URL_SCRAPING", global = true)]
    pub base_url: Option<String>,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_CLIENT", global = true)]
    pub mongo_uri: Option<String>,

    /// MongoDB database name
    #[arg(long, env = "MONGO_DATABASE", global = true)]
    pub mongo_database: Option<String>,

    /// MongoDB collection name
    #[arg(long, env = "MONGO_COLLECTION", global = true, default_value = DEFAULT_COLLECTION)]
    pub mongo_collection: String,

    /// Log file, truncated at the start of each run
    #[arg(long, env = "LOG_FILE", global = true, default_value = "crawler.log")]
    pub log_file: PathBuf,

    /// User-Agent sent with every request
    #[arg(long, env = "HARAS_USER_AGENT", global = true)]
    pub user_agent: Option<String>,
}

/// Validated settings for a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub listing_url: String,
    pub links_csv: PathBuf,
}

/// Validated settings for a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub links_csv: PathBuf,
    pub base_url: String,
    /// `None` when the record CSV is turned off.
    pub records_csv: Option<PathBuf>,
    /// `None` when the document store is turned off.
    pub mongo: Option<MongoConfig>,
    pub trailing_label: TrailingLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

fn required<T: Clone>(
    value: &Option<T>,
    env: &'static str,
    flag: &'static str,
) -> Result<T, ConfigError> {
    value.clone().ok_or(ConfigError::Missing { env, flag })
}

impl Settings {
    pub fn crawl(&self) -> Result<CrawlConfig, ConfigError> {
        Ok(CrawlConfig {
            listing_url: required(&self.listing_url, "URL_CRAWLING", "listing-url")?,
            links_csv: required(&self.links_csv, "CSV_CRAWLING", "links-csv")?,
        })
    }

    pub fn scrape(&self, args: &ScrapeArgs) -> Result<ScrapeConfig, ConfigError> {
        let records_csv = if args.no_csv {
            None
        } else {
            Some(required(&self.records_csv, "CSV_SCRAPING", "records-csv")?)
        };
        let mongo = if args.no_db {
            None
        } else {
            Some(MongoConfig {
                uri: required(&self.mongo_uri, "MONGO_CLIENT", "mongo-uri")?,
                database: required(&self.mongo_database, "MONGO_DATABASE", "mongo-database")?,
                collection: self.mongo_collection.clone(),
            })
        };
        Ok(ScrapeConfig {
            links_csv: required(&self.links_csv, "CSV_CRAWLING", "links-csv")?,
            base_url: required(&self.base_url, "BASE_URL_SCRAPING", "base-url")?,
            records_csv,
            mongo,
            trailing_label: args.extraction.trailing_label.into(),
        })
    }
}
