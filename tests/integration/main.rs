//! Integration tests for Shelfscrape
//!
//! These tests use wiremock to serve book pages and run the full scrape cycle
//! end-to-end against temporary result files.

mod retry_tests;
mod scrape_tests;
mod support;
