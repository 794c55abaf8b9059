//! HTML parser for extracting book fields
//!
//! This module locates the author and title of a book page by CSS selector.
//! A field whose element is absent falls back to a placeholder instead of
//! failing the page.

use crate::config::{check_selector, SelectorConfig};
use crate::ConfigResult;
use scraper::{Html, Selector};

/// Compiled selectors and placeholder values for one run
#[derive(Debug, Clone)]
pub struct BookSelectors {
    author: Selector,
    title: Selector,
    author_placeholder: String,
    title_placeholder: String,
}

impl BookSelectors {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(BookSelectors)` - Both selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - One of them is not valid CSS
    pub fn from_config(config: &SelectorConfig) -> ConfigResult<Self> {
        Ok(Self {
            author: check_selector("author", &config.author)?,
            title: check_selector("title", &config.title)?,
            author_placeholder: config.author_placeholder.clone(),
            title_placeholder: config.title_placeholder.clone(),
        })
    }
}

/// Fields extracted from a book page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBook {
    pub author: String,
    pub title: String,
}

/// Parses a book page and extracts its author and title
///
/// The author text is trimmed. The title additionally has every run of
/// whitespace collapsed to a single space.
///
/// # Example
///
/// ```
/// use shelfscrape::config::SelectorConfig;
/// use shelfscrape::extractor::{parse_book, BookSelectors};
///
/// let selectors = BookSelectors::from_config(&SelectorConfig::default()).unwrap();
/// let html = r#"<span data-test-id="CONTENT_TITLE_MAIN">  War and
///     Peace </span>"#;
/// let book = parse_book(html, &selectors);
/// assert_eq!(book.title, "War and Peace");
/// assert_eq!(book.author, "Author not found");
/// ```
pub fn parse_book(html: &str, selectors: &BookSelectors) -> ParsedBook {
    let document = Html::parse_document(html);

    let author = element_text(&document, &selectors.author)
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|| selectors.author_placeholder.clone());

    let title = element_text(&document, &selectors.title)
        .map(|text| normalize_whitespace(&text))
        .unwrap_or_else(|| selectors.title_placeholder.clone());

    ParsedBook { author, title }
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated text of the first element matching `selector`
fn element_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}
