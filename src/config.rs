//! Runtime configuration.
//!
//! Only the listening port comes from the environment (`PORT`, default
//! [`DEFAULT_PORT`]).  The source list is compiled in and checked once at
//! startup; a bad entry there is a programming error, so it aborts the
//! process instead of being skipped.

use std::collections::HashSet;
use std::env;

use anyhow::{bail, Context, Result};

use crate::source::Source;

pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 5000;

/// The feeds shown on the page, in display order.
const SOURCES: &[(&str, &str)] = &[
    ("technology", "https://www.reddit.com/r/technology/top/.rss?t=week"),
    ("nba", "https://www.reddit.com/r/nba/top/.rss?t=week"),
    ("news", "https://www.reddit.com/r/news/top/.rss?t=week"),
    ("unusual_whales", "https://www.reddit.com/r/unusual_whales/top/.rss?t=week"),
    ("PanIslamistPosting", "https://www.reddit.com/r/PanIslamistPosting/top/.rss?t=week"),
    ("Futurology", "https://www.reddit.com/r/Futurology/top/.rss?t=week"),
    ("geopolitics", "https://www.reddit.com/r/geopolitics/top/.rss?t=week"),
    ("bestof", "https://www.reddit.com/r/bestof/top/.rss?t=week"),
    ("truereddit", "https://www.reddit.com/r/truereddit/top/.rss?t=week"),
    ("thenation", "https://www.thenation.com/feed/?post_type=article&subject=politics"),
    ("muslimskeptic", "https://muslimskeptic.com/feed/"),
    ("theintercept", "https://theintercept.com/feed/"),
    ("slashdot", "http://rss.slashdot.org/Slashdot/slashdotMain"),
    ("aljazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub sources: Vec<Source>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{PORT_VAR} must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let sources = default_sources();
        validate_sources(&sources)?;

        Ok(Self { port, sources })
    }
}

pub fn default_sources() -> Vec<Source> {
    SOURCES
        .iter()
        .map(|(name, endpoint)| Source::new(*name, *endpoint))
        .collect()
}

/// Names must be non-empty and unique; endpoints absolute http(s) URLs.
pub fn validate_sources(sources: &[Source]) -> Result<()> {
    let mut seen = HashSet::new();

    for source in sources {
        if source.name.trim().is_empty() {
            bail!("source with endpoint {} has an empty name", source.endpoint);
        }
        if !seen.insert(source.name.as_str()) {
            bail!("duplicate source name {:?}", source.name);
        }

        let url = url::Url::parse(&source.endpoint)
            .with_context(|| format!("source {:?} has an invalid endpoint", source.name))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "source {:?} endpoint must be http or https, got {}",
                source.name,
                url.scheme()
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(port: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| match key {
            PORT_VAR => port.map(String::from),
            _ => None,
        }
    }

    #[test]
    fn port_defaults_when_unset() {
        let config = Config::from_lookup(lookup_with(None)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn port_read_from_environment() {
        let config = Config::from_lookup(lookup_with(Some(" 8080 "))).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup_with(Some("eighty"))).unwrap_err();
        assert!(err.to_string().contains(PORT_VAR));
    }

    #[test]
    fn default_sources_are_valid_and_ordered() {
        let sources = default_sources();
        validate_sources(&sources).unwrap();
        assert_eq!(sources.len(), 14);
        assert_eq!(sources[0].name, "technology");
        assert_eq!(sources[13].name, "aljazeera");
    }

    #[test]
    fn duplicate_names_rejected() {
        let sources = vec![
            Source::new("a", "https://example.com/1"),
            Source::new("a", "https://example.com/2"),
        ];
        assert!(validate_sources(&sources).is_err());
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let sources = vec![Source::new("a", "ftp://example.com/feed")];
        assert!(validate_sources(&sources).is_err());

        let sources = vec![Source::new("a", "not a url")];
        assert!(validate_sources(&sources).is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let sources = vec![Source::new(" ", "https://example.com/feed")];
        assert!(validate_sources(&sources).is_err());
    }
}
