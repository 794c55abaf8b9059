//! Shared fixtures for the integration tests

use shelfscrape::config::Config;
use shelfscrape::runner::Operator;
use shelfscrape::storage::ProgressCheckpoint;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Operator with fixed answers that counts how often it was asked
#[derive(Debug, Clone)]
pub struct ScriptedOperator {
    pub resume: bool,
    pub sitemap: PathBuf,
    pub start: usize,
    pub retry: bool,
    pub resume_prompts: usize,
    pub retry_prompts: usize,
}

impl ScriptedOperator {
    pub fn fresh(sitemap: &Path) -> Self {
        Self {
            resume: false,
            sitemap: sitemap.to_path_buf(),
            start: 1,
            retry: false,
            resume_prompts: 0,
            retry_prompts: 0,
        }
    }

    pub fn resuming() -> Self {
        Self {
            resume: true,
            ..Self::fresh(Path::new("unused.xml"))
        }
    }

    pub fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }

    pub fn starting_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }
}

impl Operator for ScriptedOperator {
    fn confirm_resume(&mut self, _checkpoint: &ProgressCheckpoint) -> shelfscrape::Result<bool> {
        self.resume_prompts += 1;
        Ok(self.resume)
    }

    fn sitemap_path(&mut self, _default: &Path) -> shelfscrape::Result<PathBuf> {
        Ok(self.sitemap.clone())
    }

    fn start_position(&mut self, _url_count: usize) -> shelfscrape::Result<usize> {
        Ok(self.start)
    }

    fn confirm_retry(&mut self, _failures: usize) -> shelfscrape::Result<bool> {
        self.retry_prompts += 1;
        Ok(self.retry)
    }
}

/// Creates a test configuration writing into `dir`
pub fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.scraper.request_timeout = 1;
    config.scraper.request_delay = 0;
    config.output.csv_path = dir.path().join("books_data.csv").display().to_string();
    config.output.error_log_path = dir.path().join("error_urls.txt").display().to_string();
    config.output.progress_path = dir
        .path()
        .join("parser_progress.json")
        .display()
        .to_string();
    config
}

/// Writes a sitemap listing `urls` and returns its path
pub fn write_sitemap(dir: &TempDir, urls: &[String]) -> PathBuf {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );
    for url in urls {
        xml.push_str(&format!("  <url><loc>{}</loc></url>\n", url));
    }
    xml.push_str("</urlset>\n");

    let path = dir.path().join("sitemap-books.xml");
    std::fs::write(&path, xml).expect("Failed to write sitemap");
    path
}

/// URLs `/book/1` through `/book/n` on the mock server
pub fn book_urls(server: &MockServer, n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| format!("{}/book/{}", server.uri(), i))
        .collect()
}

/// HTML of a book page using the default selectors
pub fn book_page(author: &str, title: &str) -> String {
    format!(
        r#"<html><head><title>Book</title></head><body>
        <a data-test-id="CONTENT_AUTHOR_AUTHOR_NAME" href="/author">{}</a>
        <h1><span data-test-id="CONTENT_TITLE_MAIN">{}</span></h1>
        </body></html>"#,
        author, title
    )
}

pub fn page_response(author: &str, title: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(book_page(author, title))
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Serves `/book/1` through `/book/n` as "Author i" / "Title i"
pub async fn mount_books(server: &MockServer, n: usize) {
    for i in 1..=n {
        Mock::given(method("GET"))
            .and(path(format!("/book/{}", i)))
            .respond_with(page_response(&format!("Author {}", i), &format!("Title {}", i)))
            .mount(server)
            .await;
    }
}

/// Raw lines of a text file, empty if it does not exist
pub fn read_lines(path: &str) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
