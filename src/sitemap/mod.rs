//! Sitemap module
//!
//! Turns a sitemaps.org `urlset` document into the ordered list of page URLs
//! the scraper walks. The order of the returned URLs is the processing order
//! and is what checkpoint positions refer to.

mod reader;

pub use reader::{fingerprint, parse_sitemap, read_sitemap, SITEMAP_NAMESPACE};

use thiserror::Error;

/// Errors that can occur while reading a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to read sitemap: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed sitemap XML: {0}")]
    Xml(#[from] roxmltree::Error),
}
