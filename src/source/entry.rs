//! The values a single feed fetch produces.
//!
//! `Entry` is one syndicated item reduced to what the page needs: a title
//! and a link.  `SourceResult` is what one source contributes to an
//! aggregate: its top entries plus whether the fetch actually succeeded.

/// A single feed entry, normalised from RSS, Atom or JSON Feed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entry {
    /// Human-readable headline (anchor text).
    pub title: String,
    /// URL of the full item (anchor target).
    pub link: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Build an entry from optional raw fields.
    ///
    /// Returns `None` when either field is absent or blank, which marks the
    /// item as malformed.
    pub fn from_parts(title: Option<&str>, link: Option<&str>) -> Option<Self> {
        let title = title.map(str::trim).filter(|t| !t.is_empty())?;
        let link = link.map(str::trim).filter(|l| !l.is_empty())?;
        Some(Self::new(title, link))
    }
}

/// How the fetch for one source ended.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FetchStatus {
    /// The feed was retrieved and parsed (it may still have had no entries).
    Fetched,
    /// Transport or parse failure; the reason is kept for diagnostics.
    Failed(String),
}

/// One source's contribution to an aggregate.
///
/// Failure and "no entries" both present as an empty entry list to the
/// renderer; [`status`](SourceResult::status) keeps them apart for anyone
/// who cares.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceResult {
    entries: Vec<Entry>,
    status: FetchStatus,
}

impl SourceResult {
    pub fn fetched(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            status: FetchStatus::Fetched,
        }
    }

    /// No entries because the source could not be fetched; `reason` is
    /// usually a [`FeedError`](super::FeedError).
    pub fn failed(reason: impl ToString) -> Self {
        Self {
            entries: Vec::new(),
            status: FetchStatus::Failed(reason.to_string()),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FetchStatus::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FeedError;

    #[test]
    fn from_parts_trims_fields() {
        let entry = Entry::from_parts(Some("  Title \n"), Some(" https://example.com/1 "));
        assert_eq!(entry, Some(Entry::new("Title", "https://example.com/1")));
    }

    #[test]
    fn from_parts_rejects_missing_or_blank_fields() {
        assert!(Entry::from_parts(None, Some("https://example.com")).is_none());
        assert!(Entry::from_parts(Some("Title"), None).is_none());
        assert!(Entry::from_parts(Some("   "), Some("https://example.com")).is_none());
        assert!(Entry::from_parts(Some("Title"), Some("")).is_none());
    }

    #[test]
    fn failed_result_is_empty_and_keeps_reason() {
        let err = FeedError::Parse {
            reason: "not a feed".into(),
        };
        let result = SourceResult::failed(&err);

        assert!(result.is_empty());
        assert!(result.is_failed());
        assert_eq!(
            result.status(),
            &FetchStatus::Failed("could not parse feed: not a feed".into())
        );
    }

    #[test]
    fn fetched_empty_is_not_a_failure() {
        let result = SourceResult::fetched(Vec::new());
        assert!(result.is_empty());
        assert!(!result.is_failed());
    }
}
