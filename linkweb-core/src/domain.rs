//! Registrable-domain classification for scoping a crawl.

use std::fmt;
use tldextract::{TldExtractor, TldOption};
use tracing::debug;
use url::{Host, Url};

/// The registrable domain label of a URL, e.g. `example` for
/// `https://sub.example.co.uk/page`.
///
/// `Unknown` never matches anything, not even another `Unknown`, so links
/// whose domain cannot be determined are always out of scope.
#[derive(Debug, Clone)]
pub enum Domain {
    Known(String),
    Unknown,
}

impl Domain {
    pub fn matches(&self, other: &Domain) -> bool {
        match (self, other) {
            (Domain::Known(a), Domain::Known(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Domain::Known(_))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Known(label) => f.write_str(label),
            Domain::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// Extracts registrable domains using the bundled Public Suffix List snapshot.
pub struct DomainClassifier {
    extractor: TldExtractor,
}

impl DomainClassifier {
    pub fn new() -> Self {
        // Default options use the bundled snapshot and never touch the network.
        Self {
            extractor: TldExtractor::new(TldOption::default()),
        }
    }

    /// Domain label directly left of the public suffix, or `Unknown` when
    /// the URL has no host. IP hosts have no suffix and are their own
    /// domain. Hosts whose suffix is not in the list (`a.test`) treat their
    /// rightmost label as the suffix.
    pub fn domain_of(&self, url: &str) -> Domain {
        let Ok(parsed) = Url::parse(url) else {
            debug!("Unparseable URL {:?}, domain unknown", url);
            return Domain::Unknown;
        };

        let host = match parsed.host() {
            Some(Host::Domain(host)) => host,
            Some(Host::Ipv4(ip)) => return Domain::Known(ip.to_string()),
            Some(Host::Ipv6(ip)) => return Domain::Known(ip.to_string()),
            None => return Domain::Unknown,
        };

        match self.extractor.extract(url) {
            Ok(result) if result.suffix.as_deref().is_some_and(|s| !s.is_empty()) => {
                match result.domain {
                    Some(label) if !label.is_empty() => Domain::Known(label),
                    _ => Domain::Unknown,
                }
            }
            Ok(_) => label_left_of_last(host),
            Err(e) => {
                debug!("Domain extraction failed for {}: {:?}", url, e);
                label_left_of_last(host)
            }
        }
    }
}

/// Fallback for hosts without a listed suffix. A single-label host such as
/// `localhost` is its own domain.
fn label_left_of_last(host: &str) -> Domain {
    let mut labels = host.trim_end_matches('.').rsplit('.');
    let last = labels.next().filter(|label| !label.is_empty());

    match (labels.next(), last) {
        (Some(label), _) if !label.is_empty() => Domain::Known(label.to_string()),
        (None, Some(last)) => Domain::Known(last.to_string()),
        _ => Domain::Unknown,
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new()
    }
}
