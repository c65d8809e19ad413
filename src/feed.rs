//! Delegation feed parsing.
//!
//! RIR delegation files are plain text, pipe-delimited, one record per line:
//! `registry|cc|type|start|value|date|status[|extensions]`. A version header
//! line and per-type summary lines precede the records.

use std::fmt;

use tracing::warn;

use crate::error::GenerateError;

/// Address family of a delegation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Token used in the feed's type column.
    pub fn feed_token(self) -> &'static str {
        match self {
            AddressFamily::V4 => "ipv4",
            AddressFamily::V6 => "ipv6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
        })
    }
}

/// One qualifying line of the delegation feed.
///
/// `extent` is a host count for IPv4 records and a prefix length for IPv6
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRecord {
    pub registry: String,
    pub country: String,
    pub family: AddressFamily,
    pub start: String,
    pub extent: u64,
}

/// Selects which feed lines qualify. Comparison against the first three
/// columns is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    pub registry: String,
    pub country: String,
    pub family: AddressFamily,
}

impl FeedFilter {
    fn matches(&self, registry: &str, country: &str, kind: &str) -> bool {
        registry == self.registry && country == self.country && kind == self.family.feed_token()
    }
}

/// Structural sanity check on the whole feed.
///
/// An empty feed is unreadable. A feed without the leading version line
/// (`2|apnic|...`) is suspicious but still processable, so it only warns.
pub fn check_feed(feed: &str) -> Result<(), GenerateError> {
    if feed.trim().is_empty() {
        return Err(GenerateError::Parse("delegation feed is empty".to_string()));
    }

    let has_header = feed
        .lines()
        .find(|line| !line.starts_with('#') && !line.trim().is_empty())
        .and_then(|line| line.split('|').next())
        .is_some_and(|version| !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()));
    if !has_header {
        warn!("Delegation feed has no version header line");
    }

    Ok(())
}

/// Lazily yield the records matching `filter`.
///
/// Matching lines with fewer than 5 fields are skipped with a warning. A
/// matching line whose extent column is not an unsigned integer fails the
/// whole run.
pub fn qualifying_records<'a>(
    feed: &'a str,
    filter: &'a FeedFilter,
) -> impl Iterator<Item = Result<DelegationRecord, GenerateError>> + 'a {
    feed.lines().enumerate().filter_map(move |(idx, line)| {
        let mut fields = line.split('|');
        let registry = fields.next()?;
        let country = fields.next()?;
        let kind = fields.next()?;
        if !filter.matches(registry, country, kind) {
            return None;
        }

        let (Some(start), Some(extent_str)) = (fields.next(), fields.next()) else {
            warn!("Skipping malformed feed line {}: {:?}", idx + 1, line);
            return None;
        };

        match extent_str.parse::<u64>() {
            Ok(extent) => Some(Ok(DelegationRecord {
                registry: registry.to_string(),
                country: country.to_string(),
                family: filter.family,
                start: start.to_string(),
                extent,
            })),
            Err(_) => Some(Err(GenerateError::Validation(format!(
                "feed line {}: extent {:?} is not an unsigned integer",
                idx + 1,
                extent_str
            )))),
        }
    })
}
