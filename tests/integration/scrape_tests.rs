//! End-to-end tests for a single scrape run

use crate::support::{
    book_urls, create_test_config, mount_books, read_lines, write_sitemap, ScriptedOperator,
};
use shelfscrape::output::{CsvOutput, ErrorLog};
use shelfscrape::runner::{Interrupt, RunController, RunOutcome};
use shelfscrape::RunPhase;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_scrape_three_books() {
    let mock_server = MockServer::start().await;
    mount_books(&mock_server, 3).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = book_urls(&mock_server, 3);
    let sitemap = write_sitemap(&dir, &urls);

    let mut controller =
        RunController::new(config.clone(), ScriptedOperator::fresh(&sitemap), Interrupt::never())
            .expect("Failed to create controller");
    let outcome = controller.run().await.expect("Run failed");

    match outcome {
        RunOutcome::Completed { stats, retry } => {
            assert_eq!(stats.processed, 3);
            assert_eq!(stats.succeeded, 3);
            assert_eq!(stats.failed, 0);
            assert!(retry.is_none());
        }
        other => panic!("Expected completed run, got {:?}", other),
    }
    assert_eq!(controller.phase(), RunPhase::Done);
    assert_eq!(controller.operator().retry_prompts, 0);

    let lines = read_lines(&config.output.csv_path);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "url,author,title,status");

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.url, urls[i]);
        assert_eq!(row.author, format!("Author {}", i + 1));
        assert_eq!(row.title, format!("Title {}", i + 1));
        assert_eq!(row.status, "Success");
    }

    assert!(!ErrorLog::new(&config.output.error_log_path).exists());
    assert!(!controller.progress().exists());
}

#[tokio::test]
async fn test_missing_elements_use_placeholders() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(
                r#"<html><body><span data-test-id="CONTENT_TITLE_MAIN">  The
                    Long   Title </span></body></html>"#,
            ),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let sitemap = write_sitemap(&dir, &book_urls(&mock_server, 1));

    let mut controller =
        RunController::new(config.clone(), ScriptedOperator::fresh(&sitemap), Interrupt::never())
            .unwrap();
    controller.run().await.unwrap();

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author, "Author not found");
    assert_eq!(rows[0].title, "The Long Title");
    assert_eq!(rows[0].status, "Success");
}

#[tokio::test]
async fn test_start_position_skips_leading_urls() {
    let mock_server = MockServer::start().await;
    mount_books(&mock_server, 4).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = book_urls(&mock_server, 4);
    let sitemap = write_sitemap(&dir, &urls);

    let operator = ScriptedOperator::fresh(&sitemap).starting_at(3);
    let mut controller = RunController::new(config.clone(), operator, Interrupt::never()).unwrap();
    controller.run().await.unwrap();

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    let scraped: Vec<_> = rows.iter().map(|row| row.url.clone()).collect();
    assert_eq!(scraped, urls[2..].to_vec());
}

#[tokio::test]
async fn test_timeout_is_logged_as_request_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = book_urls(&mock_server, 1);
    let sitemap = write_sitemap(&dir, &urls);

    let mut controller =
        RunController::new(config.clone(), ScriptedOperator::fresh(&sitemap), Interrupt::never())
            .unwrap();
    let outcome = controller.run().await.unwrap();

    match outcome {
        RunOutcome::Completed { stats, retry } => {
            assert_eq!(stats.failed, 1);
            assert!(retry.is_none());
        }
        other => panic!("Expected completed run, got {:?}", other),
    }
    assert_eq!(controller.operator().retry_prompts, 1);

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author, "");
    assert_eq!(rows[0].title, "");
    assert!(rows[0].status.starts_with("Request error"));

    let entries = ErrorLog::new(&config.output.error_log_path).entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, urls[0]);
    assert!(entries[0].message.starts_with("Request error"));
}

#[tokio::test]
async fn test_http_error_status_is_a_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let sitemap = write_sitemap(&dir, &book_urls(&mock_server, 1));

    let mut controller =
        RunController::new(config.clone(), ScriptedOperator::fresh(&sitemap), Interrupt::never())
            .unwrap();
    controller.run().await.unwrap();

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    assert!(rows[0].status.contains("404"));
}

#[tokio::test]
async fn test_missing_sitemap_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let operator = ScriptedOperator::fresh(&dir.path().join("nope.xml"));
    let mut controller = RunController::new(config.clone(), operator, Interrupt::never()).unwrap();
    let outcome = controller.run().await.unwrap();

    assert!(matches!(outcome, RunOutcome::Aborted { .. }));
    assert!(!CsvOutput::new(&config.output.csv_path).exists());
    assert!(!controller.progress().exists());
}

#[tokio::test]
async fn test_blank_loc_keeps_positions() {
    let mock_server = MockServer::start().await;
    mount_books(&mock_server, 3).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let urls = vec![
        format!("{}/book/1", mock_server.uri()),
        String::new(),
        format!("{}/book/3", mock_server.uri()),
    ];
    let sitemap = write_sitemap(&dir, &urls);

    let mut controller =
        RunController::new(config.clone(), ScriptedOperator::fresh(&sitemap), Interrupt::never())
            .unwrap();
    match controller.run().await.unwrap() {
        RunOutcome::Completed { stats, .. } => {
            assert_eq!(stats.processed, 3);
            assert_eq!(stats.failed, 1);
        }
        other => panic!("Expected completed run, got {:?}", other),
    }

    let rows = CsvOutput::new(&config.output.csv_path).read_rows().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].url, "");
    assert!(rows[1].status.starts_with("Request error"));
    assert_eq!(rows[2].author, "Author 3");
}
