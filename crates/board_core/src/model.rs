use std::fmt;

/// A page as reported by the ranked-pages source, in upstream rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPageRecord {
    pub path: String,
    pub visitor_count: u64,
}

impl RankedPageRecord {
    pub fn new(path: impl Into<String>, visitor_count: u64) -> Self {
        Self {
            path: path.into(),
            visitor_count,
        }
    }
}

/// Preview metadata for one page, as returned by the enrichment source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrichmentRecord {
    pub path: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub embed_html: Option<String>,
}

impl EnrichmentRecord {
    /// Placeholder for an entry the source returned but that could not be read.
    /// It keeps its slot in the batch so later entries stay aligned.
    pub fn unusable() -> Self {
        Self::default()
    }

    /// The usable thumbnail, if any. Blank URLs count as absent.
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn is_usable(&self) -> bool {
        self.thumbnail().is_some()
    }
}

/// A ranked page joined with its enrichment. Only built when a thumbnail exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPageRecord {
    pub path: String,
    pub visitor_count: u64,
    pub title: String,
    pub thumbnail_url: String,
    pub embed_html: Option<String>,
}

/// Opaque handle to the presentation-side element of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Monotonic identifier of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleSeq(pub u64);

impl CycleSeq {
    pub const FIRST: CycleSeq = CycleSeq(1);

    pub fn next(self) -> CycleSeq {
        CycleSeq(self.0 + 1)
    }
}

impl fmt::Display for CycleSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the last visitor-count change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `None` when the count did not change.
    pub fn between(old: u64, new: u64) -> Option<Trend> {
        match new.cmp(&old) {
            std::cmp::Ordering::Greater => Some(Trend::Up),
            std::cmp::Ordering::Less => Some(Trend::Down),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_thumbnail_is_unusable() {
        let record = EnrichmentRecord {
            thumbnail_url: Some("   ".to_string()),
            ..EnrichmentRecord::default()
        };
        assert!(!record.is_usable());
        assert!(!EnrichmentRecord::unusable().is_usable());
    }

    #[test]
    fn trend_follows_sign_of_change() {
        assert_eq!(Trend::between(120, 95), Some(Trend::Down));
        assert_eq!(Trend::between(10, 37), Some(Trend::Up));
        assert_eq!(Trend::between(5, 5), None);
    }
}
