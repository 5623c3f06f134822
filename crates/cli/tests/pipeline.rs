// ABOUTME: Integration tests driving the crawl and scrape stages as a library.
// ABOUTME: Uses a mock catalog, an in-memory document sink, and temporary CSV files.

use haras_cli::{crawl, scrape, ScrapeSummary};
use haras_extract::{DetailExtractor, LinkHarvester, PageLoader, TrailingLabel};
use haras_sink::{
    read_links, read_records, DocumentSink, HorseDocument, LinkSink, MemorySink, RecordSink,
    SinkError, SinkWriter, Targets,
};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn serve(server: &MockServer, path: &str, body: &str) {
    let body = body.to_string();
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(body);
    });
}

fn loader() -> PageLoader {
    PageLoader::builder().build().unwrap()
}

#[test]
fn crawl_keeps_partial_harvest_when_a_marker_breaks() {
    let server = MockServer::start();
    serve(
        &server,
        "/liste",
        r#"<table>
            <tr class="trOne"><td><a href="x.html?idcheval=1">1</a><a>broken</a></td></tr>
            <tr class="trOne"><td><a href="x.html?idcheval=2">2</a></td></tr>
            <tr class="trTwo"><td><a href="y.html?idcheval=3">3</a></td></tr>
        </table>"#,
    );
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.csv");

    let summary = crawl(&loader(), &LinkHarvester::default(), &server.url("/liste"), || {
        LinkSink::create(&path)
    })
    .unwrap();

    assert_eq!(summary.links, 2);
    assert_eq!(summary.truncated_markers, vec!["trOne"]);
    assert_eq!(read_links(&path).unwrap(), vec!["x_1", "y_3"]);
}

#[test]
fn crawl_of_page_without_markers_writes_header_only() {
    let server = MockServer::start();
    serve(&server, "/vide", "<html><body><p>Aucun cheval</p></body></html>");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.csv");

    let summary = crawl(&loader(), &LinkHarvester::default(), &server.url("/vide"), || {
        LinkSink::create(&path)
    })
    .unwrap();

    assert_eq!(summary.links, 0);
    assert!(read_links(&path).unwrap().is_empty());
}

#[test]
fn failed_listing_fetch_keeps_previous_link_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/liste");
        then.status(502);
    });
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.csv");
    fs::write(&path, "link\nfiche_1\nfiche_2\n").unwrap();

    let mut opened = false;
    let err = crawl(&loader(), &LinkHarvester::default(), &server.url("/liste"), || {
        opened = true;
        LinkSink::create(&path)
    })
    .unwrap_err();

    assert_eq!(err.exit_code(), haras_cli::exit::FETCH_FAILED);
    assert!(!opened);
    assert_eq!(fs::read_to_string(&path).unwrap(), "link\nfiche_1\nfiche_2\n");
}

#[test]
fn each_horse_starts_from_an_empty_record() {
    let server = MockServer::start();
    serve(
        &server,
        "/c/a_1",
        r#"<h1 class="fiche">Premier</h1><table><tbody>
            <tr><td>Gains</td><td>500€</td><td>Age</td><td>4 ans</td></tr>
        </tbody></table>"#,
    );
    serve(
        &server,
        "/c/b_2",
        r#"<h1 class="fiche">Second</h1><table><tbody>
            <tr><td>Sexe</td><td>F</td></tr>
        </tbody></table>"#,
    );

    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("records.csv");
    let mut memory = MemorySink::new();
    let summary = {
        let mut sinks = SinkWriter::new(
            Some(RecordSink::create(&records_path).unwrap()),
            Some(Box::new(&mut memory)),
        );
        scrape(
            &loader(),
            &DetailExtractor::new(),
            &server.url("/c/"),
            &["a_1".to_string(), "b_2".to_string()],
            &mut sinks,
            Targets::BOTH,
        )
        .unwrap()
    };

    assert_eq!(
        summary,
        ScrapeSummary {
            horses: 2,
            rows_written: 2,
            documents_inserted: 2,
            insert_failures: 0,
        }
    );

    let records = read_records(&records_path).unwrap();
    assert_eq!(records[0].values(), ["Premier", "500", "", "", "", "", "4 "]);
    assert_eq!(records[1].values(), ["Second", "", "", "", "", "F", ""]);

    let docs = memory.documents();
    assert_eq!(docs[1].horse_name, "Second");
    assert_eq!(docs[1].gains, "");
    assert_eq!(docs[1].age, "");
    assert_eq!(docs[0].created_at.len(), "DD/MM/YYYY".len());
    assert_eq!(docs[0].created_at.matches('/').count(), 2);
}

struct RejectingSink;

impl DocumentSink for RejectingSink {
    fn insert(&mut self, _document: &HorseDocument) -> Result<(), SinkError> {
        Err(SinkError::document("duplicate key"))
    }
}

#[test]
fn failed_inserts_are_counted_and_the_run_continues() {
    let server = MockServer::start();
    serve(&server, "/c/a_1", r#"<h1 class="fiche">A</h1>"#);
    serve(&server, "/c/b_2", r#"<h1 class="fiche">B</h1>"#);

    let mut sinks = SinkWriter::new(None, Some(Box::new(RejectingSink)));
    let summary = scrape(
        &loader(),
        &DetailExtractor::new(),
        &server.url("/c/"),
        &["a_1".to_string(), "b_2".to_string()],
        &mut sinks,
        Targets {
            tabular: false,
            document: true,
        },
    )
    .unwrap();

    assert_eq!(summary.horses, 2);
    assert_eq!(summary.insert_failures, 2);
    assert_eq!(summary.documents_inserted, 0);
}

fn scrape_with_policy(server: &MockServer, policy: TrailingLabel) -> HorseDocument {
    let mut memory = MemorySink::new();
    {
        let mut sinks = SinkWriter::new(None, Some(Box::new(&mut memory)));
        scrape(
            &loader(),
            &DetailExtractor::new().trailing_label(policy),
            &server.url("/c/"),
            &["t_1".to_string()],
            &mut sinks,
            Targets::BOTH,
        )
        .unwrap();
    }
    memory.documents()[0].clone()
}

#[test]
fn trailing_label_policy_flows_through_scrape() {
    let server = MockServer::start();
    serve(
        &server,
        "/c/t_1",
        r#"<h1 class="fiche">T</h1><table><tbody>
            <tr><td>Sexe</td><td>M</td></tr>
            <tr><td>Courues</td><td>-</td><td>Sexe</td></tr>
        </tbody></table>"#,
    );

    let skipped = scrape_with_policy(&server, TrailingLabel::Skip);
    assert_eq!(skipped.courues, "0");
    assert_eq!(skipped.sexe, "M");

    let emptied = scrape_with_policy(&server, TrailingLabel::EmptyValue);
    assert_eq!(emptied.courues, "0");
    assert_eq!(emptied.sexe, "");
}

#[test]
fn fetch_failure_stops_the_scrape() {
    let server = MockServer::start();
    serve(&server, "/c/ok_1", r#"<h1 class="fiche">Ok</h1>"#);
    server.mock(|when, then| {
        when.method(GET).path("/c/bad_2");
        then.status(503);
    });

    let mut memory = MemorySink::new();
    let result = {
        let mut sinks = SinkWriter::new(None, Some(Box::new(&mut memory)));
        scrape(
            &loader(),
            &DetailExtractor::new(),
            &server.url("/c/"),
            &["ok_1".to_string(), "bad_2".to_string(), "never_3".to_string()],
            &mut sinks,
            Targets::BOTH,
        )
    };

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), haras_cli::exit::FETCH_FAILED);
    assert_eq!(memory.documents().len(), 1);
}
