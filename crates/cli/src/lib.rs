// ABOUTME: Library side of the haras binary: configuration, logging, and the crawl/scrape orchestration.
// ABOUTME: Exposed as a library so the pipeline can be driven and tested without the process boundary.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod runner;

pub use crate::config::{Cli, Command, CrawlConfig, MongoConfig, ScrapeArgs, ScrapeConfig, Settings};
pub use crate::error::{exit, ConfigError, PipelineError};
pub use crate::logging::LogSession;
pub use crate::pipeline::{crawl, detail_url, extract_record, scrape, CrawlSummary, ScrapeSummary};
pub use crate::runner::{run, run_crawl, run_scrape};
