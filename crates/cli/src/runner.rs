// ABOUTME: Wires validated configuration into the pipeline: opens sinks, runs the selected mode.
// ABOUTME: Sink open failures are logged and the sink disabled; a run with no usable sink is refused.

use std::fs;

use anyhow::Context;
use haras_extract::{load_html_bytes, normalize, DetailExtractor, LinkHarvester, PageLoader};
use haras_sink::{read_links, DocumentSink, LinkSink, MongoSink, RecordSink, SinkError, SinkWriter, Targets};
use tracing::{error, info, warn};

use crate::config::{Cli, Command, CrawlConfig, ExtractArgs, ScrapeConfig, Settings};
use crate::error::PipelineError;
use crate::logging::LogSession;
use crate::pipeline::{self, CrawlSummary, ScrapeSummary};

/// Runs the mode selected on the command line and returns the text for stdout.
pub fn run(cli: &Cli) -> Result<String, PipelineError> {
    let session = LogSession::to_file(&cli.settings.log_file)?;
    session.scope(|| {
        let result = dispatch(cli);
        if let Err(ref err) = result {
            error!(error = %err, code = err.exit_code(), "run aborted");
        }
        result
    })
}

fn dispatch(cli: &Cli) -> Result<String, PipelineError> {
    let settings = &cli.settings;
    match cli.command() {
        Command::Crawl => {
            let config = settings.crawl()?;
            let loader = build_loader(settings)?;
            Ok(run_crawl(&loader, &config)?.to_string())
        }
        Command::Scrape(args) => {
            let config = settings.scrape(&args)?;
            let loader = build_loader(settings)?;
            Ok(run_scrape(&loader, &config)?.to_string())
        }
        Command::Run(args) => {
            let crawl_config = settings.crawl()?;
            let scrape_config = settings.scrape(&args)?;
            let loader = build_loader(settings)?;
            let crawled = run_crawl(&loader, &crawl_config)?;
            let scraped = run_scrape(&loader, &scrape_config)?;
            Ok(format!("{}\n{}", crawled, scraped))
        }
        Command::Extract(args) => run_extract(settings, &args),
    }
}

fn build_loader(settings: &Settings) -> Result<PageLoader, PipelineError> {
    let mut builder = PageLoader::builder();
    if let Some(ref ua) = settings.user_agent {
        builder = builder.user_agent(ua);
    }
    Ok(builder.build()?)
}

/// Crawl mode. The link list is the only sink, so failing to open it ends the run.
pub fn run_crawl(loader: &PageLoader, config: &CrawlConfig) -> Result<CrawlSummary, PipelineError> {
    let open_links = || {
        LinkSink::create(&config.links_csv).map_err(|err| {
            error!(path = %config.links_csv.display(), error = %err, "cannot open link list");
            err
        })
    };
    pipeline::crawl(loader, &LinkHarvester::default(), &config.listing_url, open_links)
}

/// Scrape mode: reads the link list, opens the requested sinks, visits every link.
pub fn run_scrape(loader: &PageLoader, config: &ScrapeConfig) -> Result<ScrapeSummary, PipelineError> {
    let identifiers = read_links(&config.links_csv)?;
    info!(links = identifiers.len(), "loaded link list");

    let records = config.records_csv.as_ref().and_then(|path| {
        RecordSink::create(path)
            .map_err(|err| warn!(path = %path.display(), error = %err, "record file unavailable, disabled"))
            .ok()
    });
    let documents = config.mongo.as_ref().and_then(|mongo| {
        MongoSink::connect(&mongo.uri, &mongo.database, &mongo.collection)
            .map(|sink| Box::new(sink) as Box<dyn DocumentSink>)
            .map_err(|err| warn!(error = %err, "document store unavailable, disabled"))
            .ok()
    });

    let targets = Targets {
        tabular: config.records_csv.is_some(),
        document: config.mongo.is_some(),
    };
    if targets.any() && records.is_none() && documents.is_none() {
        let err = SinkError::Unavailable("no requested sink could be opened".to_string());
        return Err(err.into());
    }

    let extractor = DetailExtractor::new().trailing_label(config.trailing_label);
    let mut sinks = SinkWriter::new(records, documents);
    pipeline::scrape(loader, &extractor, &config.base_url, &identifiers, &mut sinks, targets)
}

/// Extract mode: one page, from a file or a URL, printed as a cleaned JSON record.
pub fn run_extract(settings: &Settings, args: &ExtractArgs) -> Result<String, PipelineError> {
    let doc = match (&args.html, &args.url) {
        (Some(path), None) => {
            let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
            load_html_bytes(&bytes)
        }
        (None, Some(url)) => build_loader(settings)?.load(url)?,
        (Some(_), Some(_)) => {
            return Err(anyhow::anyhow!("cannot use both --html and a URL").into());
        }
        (None, None) => {
            return Err(anyhow::anyhow!("a URL or --html FILE is required").into());
        }
    };

    let extractor = DetailExtractor::new().trailing_label(args.extraction.trailing_label.into());
    let record = normalize(extractor.name(&doc), extractor.facts(&doc));
    let json = if args.compact {
        serde_json::to_string(&record)
    } else {
        serde_json::to_string_pretty(&record)
    };
    Ok(json.context("serializing record")?)
}
