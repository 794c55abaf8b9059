use crate::sitemap::SitemapError;
use roxmltree::Document;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Namespace of the sitemaps.org 0.9 schema
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Reads a sitemap file and returns its URLs in document order
///
/// A missing file, malformed XML, or a document without any `url/loc`
/// entries all yield an empty list. The reason is logged, and callers
/// treat an empty list as "nothing to do".
pub fn read_sitemap(path: &Path) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read sitemap {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match parse_sitemap(&content) {
        Ok(urls) => {
            if urls.is_empty() {
                tracing::warn!("Sitemap {} contains no url/loc entries", path.display());
            } else {
                tracing::debug!("Read {} URLs from {}", urls.len(), path.display());
            }
            urls
        }
        Err(e) => {
            tracing::warn!("Failed to parse sitemap {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Parses sitemap XML into the list of `<url><loc>` values
///
/// Only `url` elements that are direct children of the root and live in the
/// sitemaps.org namespace are considered. The first `loc` child of each is
/// taken, trimmed. An empty `loc` still yields an (empty) entry so positions
/// match the document; fetching it fails like any other bad URL.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, SitemapError> {
    let document = Document::parse(xml)?;

    let urls = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name((SITEMAP_NAMESPACE, "url")))
        .filter_map(|url| {
            url.children()
                .find(|node| node.has_tag_name((SITEMAP_NAMESPACE, "loc")))
        })
        .map(|loc| {
            let text = loc.text().map(str::trim).unwrap_or_default();
            if text.is_empty() {
                tracing::debug!("Empty <loc> element kept as a blank URL");
            }
            text.to_string()
        })
        .collect();

    Ok(urls)
}

/// Hex-encoded SHA-256 of a sitemap file, or `None` if it cannot be read
///
/// Stored alongside checkpoints so a resume against an edited sitemap can be
/// detected.
pub fn fingerprint(path: &Path) -> Option<String> {
    let content = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Some(hex::encode(hasher.finalize()))
}
