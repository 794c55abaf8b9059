use serde::Deserialize;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

/// Default pause between two requests in milliseconds
pub const DEFAULT_REQUEST_DELAY: u64 = 1000;

/// Default number of processed URLs between two checkpoints
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 10;

/// Desktop browser identification sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Shelfscrape
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Fixed pause after every processed URL (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Persist a checkpoint every N URLs (by absolute position)
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// CSS selectors used to locate book fields on a page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selector for the author name element
    pub author: String,

    /// Selector for the main title element
    pub title: String,

    /// Value written when the author element is missing
    #[serde(rename = "author-placeholder")]
    pub author_placeholder: String,

    /// Value written when the title element is missing
    #[serde(rename = "title-placeholder")]
    pub title_placeholder: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            author: r#"a[data-test-id="CONTENT_AUTHOR_AUTHOR_NAME"]"#.to_string(),
            title: r#"span[data-test-id="CONTENT_TITLE_MAIN"]"#.to_string(),
            author_placeholder: "Author not found".to_string(),
            title_placeholder: "Title not found".to_string(),
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV results file
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Path to the failure log
    #[serde(rename = "error-log-path")]
    pub error_log_path: String,

    /// Path to the JSON progress checkpoint
    #[serde(rename = "progress-path")]
    pub progress_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "books_data.csv".to_string(),
            error_log_path: "error_urls.txt".to_string(),
            progress_path: "parser_progress.json".to_string(),
        }
    }
}

/// Input defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Sitemap offered when the operator just presses Enter
    #[serde(rename = "default-sitemap")]
    pub default_sitemap: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default_sitemap: "sitemap-books.xml".to_string(),
        }
    }
}
