//! Tests for the failure retry pass

use crate::support::{
    book_urls, create_test_config, page_response, read_lines, write_sitemap, ScriptedOperator,
};
use shelfscrape::output::{CsvOutput, ErrorLog, ErrorLogEntry};
use shelfscrape::runner::{retry_only, Interrupt, RunController, RunOutcome};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retry_keeps_only_urls_that_failed_again() {
    let mock_server = MockServer::start().await;

    // /book/1 fails once, then recovers
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(page_response("Recovered Author", "Recovered Title"))
        .mount(&mock_server)
        .await;

    // /book/2 always fails
    Mock::given(method("GET"))
        .and(path("/book/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/3"))
        .respond_with(page_response("Author 3", "Title 3"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = book_urls(&mock_server, 3);
    let sitemap = write_sitemap(&dir, &urls);

    let operator = ScriptedOperator::fresh(&sitemap).with_retry();
    let mut controller = RunController::new(config.clone(), operator, Interrupt::never()).unwrap();
    let outcome = controller.run().await.unwrap();

    let retry = match outcome {
        RunOutcome::Completed { stats, retry } => {
            assert_eq!(stats.failed, 2);
            retry.expect("Retry pass should have run")
        }
        other => panic!("Expected completed run, got {:?}", other),
    };
    assert_eq!(retry.planned, 2);
    assert_eq!(retry.stats.succeeded, 1);
    assert_eq!(retry.stats.failed, 1);
    assert!(!retry.interrupted);

    // Retry results are appended after the original rows
    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    let scraped: Vec<_> = rows.iter().map(|row| row.url.as_str()).collect();
    assert_eq!(
        scraped,
        vec![
            urls[0].as_str(),
            urls[1].as_str(),
            urls[2].as_str(),
            urls[0].as_str(),
            urls[1].as_str()
        ]
    );
    assert_eq!(rows[3].author, "Recovered Author");
    assert_eq!(read_lines(&config.output.csv_path)[0], "url,author,title,status");
    assert_eq!(
        read_lines(&config.output.csv_path)
            .iter()
            .filter(|line| line.as_str() == "url,author,title,status")
            .count(),
        1
    );

    let remaining = ErrorLog::new(&config.output.error_log_path).urls().unwrap();
    assert_eq!(remaining, vec![urls[1].clone()]);
}

#[tokio::test]
async fn test_retry_only_reads_existing_log() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(page_response("Author 1", "Title 1"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = book_urls(&mock_server, 1);

    let errors = ErrorLog::new(&config.output.error_log_path);
    errors
        .rewrite(&[ErrorLogEntry::new(&urls[0], "Request error: request timed out")])
        .unwrap();

    let outcome = retry_only(
        config.clone(),
        ScriptedOperator::resuming(),
        Interrupt::never(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.planned, 1);
    assert_eq!(outcome.stats.succeeded, 1);
    assert!(errors.entries().unwrap().is_empty());

    // No CSV existed, so the retry pass writes the header
    let lines = read_lines(&config.output.csv_path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "url,author,title,status");
}

#[tokio::test]
async fn test_interrupted_retry_keeps_untried_urls() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let errors = ErrorLog::new(&config.output.error_log_path);
    let entries = vec![
        ErrorLogEntry::new("http://127.0.0.1:9/book/1", "Request error: connection failed"),
        ErrorLogEntry::new("http://127.0.0.1:9/book/2", "Request error: connection failed"),
    ];
    errors.rewrite(&entries).unwrap();

    let (handle, interrupt) = Interrupt::channel();
    handle.trigger();

    let outcome = retry_only(config.clone(), ScriptedOperator::resuming(), interrupt)
        .await
        .unwrap();

    assert!(outcome.interrupted);
    assert_eq!(outcome.stats.processed, 0);
    assert_eq!(errors.entries().unwrap(), entries);
}
