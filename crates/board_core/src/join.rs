use regex::Regex;

use crate::{EnrichmentRecord, MergedPageRecord, RankedPageRecord};

/// Substring a path must contain to count as a content page.
pub const DEFAULT_CONTENT_MARKER: &str = "html";

/// Decides which ranked paths are content pages worth enriching.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    marker: String,
    ignore: Option<Regex>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_MARKER)
    }
}

impl ContentFilter {
    /// An empty marker accepts every non-root path.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ignore: None,
        }
    }

    /// Paths matching `pattern` are never enriched nor displayed.
    pub fn with_ignore_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.ignore = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn accepts(&self, path: &str) -> bool {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return false;
        }
        if !self.marker.is_empty() && !trimmed.contains(self.marker.as_str()) {
            return false;
        }
        match &self.ignore {
            Some(ignore) => !ignore.is_match(trimmed),
            None => true,
        }
    }
}

/// Absolute URL the enrichment source is asked about for `path` on `host`.
pub fn page_url(host: &str, path: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    let path = path.trim();
    if path.starts_with('/') {
        format!("http://{host}{path}")
    } else {
        format!("http://{host}/{path}")
    }
}

/// URLs to enrich, in ranked order, for every content page of `ranked`.
pub fn enrichment_targets(
    ranked: &[RankedPageRecord],
    host: &str,
    filter: &ContentFilter,
) -> Vec<String> {
    ranked
        .iter()
        .filter(|page| filter.accepts(&page.path))
        .map(|page| page.path_url(host))
        .collect()
}

impl RankedPageRecord {
    pub fn path_url(&self, host: &str) -> String {
        page_url(host, &self.path)
    }
}

/// Aligns enrichment records with content pages positionally, in ranked order.
///
/// The n-th enrichment record belongs to the n-th ranked page accepted by
/// `filter`. Joining stops when enrichment runs out. A record without a
/// thumbnail still consumes its slot but produces no merged record.
pub fn join(
    ranked: &[RankedPageRecord],
    enrichment: &[EnrichmentRecord],
    filter: &ContentFilter,
) -> Vec<MergedPageRecord> {
    let mut pending = enrichment.iter();
    let mut merged = Vec::with_capacity(enrichment.len());

    for page in ranked.iter().filter(|page| filter.accepts(&page.path)) {
        let Some(enriched) = pending.next() else {
            break;
        };
        let Some(thumbnail) = enriched.thumbnail() else {
            board_logging::board_debug!("join: dropping {} (no thumbnail)", page.path);
            continue;
        };
        merged.push(MergedPageRecord {
            path: page.path.clone(),
            visitor_count: page.visitor_count,
            title: enriched.title.clone(),
            thumbnail_url: thumbnail.to_string(),
            embed_html: enriched.embed_html.clone(),
        });
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_never_content() {
        let filter = ContentFilter::new("");
        assert!(!filter.accepts(""));
        assert!(!filter.accepts("/"));
        assert!(filter.accepts("/about"));
    }

    #[test]
    fn marker_and_ignore_pattern_combine() {
        let filter = ContentFilter::default()
            .with_ignore_pattern("^/drafts/")
            .unwrap();
        assert!(filter.accepts("/talks/one.html"));
        assert!(!filter.accepts("/talks/one"));
        assert!(!filter.accepts("/drafts/two.html"));
    }

    #[test]
    fn page_url_normalises_slashes() {
        assert_eq!(page_url("ted.com", "/a.html"), "http://ted.com/a.html");
        assert_eq!(page_url("ted.com/", "a.html"), "http://ted.com/a.html");
    }
}
