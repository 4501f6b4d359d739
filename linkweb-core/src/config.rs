//! Crawl configuration: the seed URL and which graph, scraper and traversal
//! backends to use.
//!
//! Every backend is a closed set of named implementations. Unknown names and
//! bad seeds are rejected here, before a crawl starts.

use crate::crawl::{Crawler, DEFAULT_WORKERS, Strategy};
use crate::domain::DomainClassifier;
use crate::error::{ConfigError, CrawlError};
use crate::graph::{LinkGraph, MapGraph, PetGraph};
use linkweb_scanner::{HtmlScraper, RegexScraper, ScanError, Scraper};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphKind {
    #[default]
    Map,
    Petgraph,
}

impl GraphKind {
    pub const ALL: [GraphKind; 2] = [GraphKind::Map, GraphKind::Petgraph];

    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::Map => "map",
            GraphKind::Petgraph => "petgraph",
        }
    }

    pub fn build(&self) -> Box<dyn LinkGraph> {
        match self {
            GraphKind::Map => Box::new(MapGraph::new()),
            GraphKind::Petgraph => Box::new(PetGraph::new()),
        }
    }
}

impl FromStr for GraphKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "map" => Ok(GraphKind::Map),
            "petgraph" => Ok(GraphKind::Petgraph),
            _ => Err(ConfigError::UnknownGraph(s.to_string())),
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScraperKind {
    #[default]
    Html,
    Regex,
}

impl ScraperKind {
    pub const ALL: [ScraperKind; 2] = [ScraperKind::Html, ScraperKind::Regex];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScraperKind::Html => "html",
            ScraperKind::Regex => "regex",
        }
    }

    pub fn build(&self, timeout_secs: u64) -> Result<Arc<dyn Scraper>, ScanError> {
        let scraper: Arc<dyn Scraper> = match self {
            ScraperKind::Html => Arc::new(HtmlScraper::with_timeout(timeout_secs)?),
            ScraperKind::Regex => Arc::new(RegexScraper::with_timeout(timeout_secs)?),
        };
        Ok(scraper)
    }
}

impl FromStr for ScraperKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(ScraperKind::Html),
            "regex" => Ok(ScraperKind::Regex),
            _ => Err(ConfigError::UnknownScraper(s.to_string())),
        }
    }
}

impl fmt::Display for ScraperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Strategy {
    pub const NAMES: [&'static str; 3] = ["recursive", "iterative", "pool"];

    /// Every strategy, with `workers` used for the pool.
    pub fn all(workers: usize) -> [Strategy; 3] {
        [
            Strategy::Recursive,
            Strategy::Iterative,
            Strategy::Pool { workers },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Recursive => "recursive",
            Strategy::Iterative => "iterative",
            Strategy::Pool { .. } => "pool",
        }
    }

    /// Same strategy with a different pool size. No-op for the others.
    pub fn with_workers(self, workers: usize) -> Self {
        match self {
            Strategy::Pool { .. } => Strategy::Pool { workers },
            other => other,
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recursive" => Ok(Strategy::Recursive),
            "iterative" => Ok(Strategy::Iterative),
            "pool" => Ok(Strategy::Pool {
                workers: DEFAULT_WORKERS,
            }),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Pool { workers } => write!(f, "pool({})", workers),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse a seed URL, accepting only http(s) URLs with a host.
pub fn validate_seed(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(|host| host.is_empty()) {
        return Err(ConfigError::MissingHost(raw.to_string()));
    }

    Ok(url)
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: Url,
    pub graph: GraphKind,
    pub scraper: ScraperKind,
    pub strategy: Strategy,
    pub timeout_secs: u64,
}

impl CrawlConfig {
    /// Config with default backends for `seed`.
    pub fn new(seed: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            seed: validate_seed(seed)?,
            graph: GraphKind::default(),
            scraper: ScraperKind::default(),
            strategy: Strategy::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_graph(mut self, graph: GraphKind) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_scraper(mut self, scraper: ScraperKind) -> Self {
        self.scraper = scraper;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// One config per graph, scraper and strategy combination.
    pub fn every(seed: &Url, workers: usize, timeout_secs: u64) -> Vec<CrawlConfig> {
        let mut configs = Vec::new();
        for graph in GraphKind::ALL {
            for scraper in ScraperKind::ALL {
                for strategy in Strategy::all(workers) {
                    configs.push(CrawlConfig {
                        seed: seed.clone(),
                        graph,
                        scraper,
                        strategy,
                        timeout_secs,
                    });
                }
            }
        }
        configs
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Strategy::Pool { workers: 0 } = self.strategy {
            return Err(ConfigError::InvalidWorkers);
        }
        Ok(())
    }

    pub fn label(&self) -> String {
        format!(
            "Graph: {} | Scraper: {} | Strategy: {}",
            self.graph, self.scraper, self.strategy
        )
    }

    /// Construct fresh graph and scraper instances and wire them into a
    /// crawler.
    pub fn build_crawler(&self, classifier: Arc<DomainClassifier>) -> Result<Crawler, CrawlError> {
        self.validate()?;

        let scraper = self.scraper.build(self.timeout_secs)?;
        let graph = self.graph.build();

        Ok(Crawler::new(self.strategy, scraper, graph).with_classifier(classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_kind_from_str() {
        assert_eq!("map".parse::<GraphKind>().unwrap(), GraphKind::Map);
        assert_eq!("PetGraph".parse::<GraphKind>().unwrap(), GraphKind::Petgraph);
        assert!(matches!(
            "networkx".parse::<GraphKind>(),
            Err(ConfigError::UnknownGraph(name)) if name == "networkx"
        ));
    }

    #[test]
    fn test_scraper_kind_from_str() {
        assert_eq!("html".parse::<ScraperKind>().unwrap(), ScraperKind::Html);
        assert_eq!(" regex ".parse::<ScraperKind>().unwrap(), ScraperKind::Regex);
        assert!(matches!(
            "headless".parse::<ScraperKind>(),
            Err(ConfigError::UnknownScraper(_))
        ));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("recursive".parse::<Strategy>().unwrap(), Strategy::Recursive);
        assert_eq!("iterative".parse::<Strategy>().unwrap(), Strategy::Iterative);
        assert_eq!(
            "pool".parse::<Strategy>().unwrap(),
            Strategy::Pool {
                workers: DEFAULT_WORKERS
            }
        );
        assert!(matches!(
            "bfs".parse::<Strategy>(),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for kind in GraphKind::ALL {
            assert_eq!(kind.to_string().parse::<GraphKind>().unwrap(), kind);
        }
        for kind in ScraperKind::ALL {
            assert_eq!(kind.to_string().parse::<ScraperKind>().unwrap(), kind);
        }
        for name in Strategy::NAMES {
            assert_eq!(name.parse::<Strategy>().unwrap().name(), name);
        }
    }

    #[test]
    fn test_strategy_with_workers() {
        assert_eq!(
            Strategy::Pool { workers: 10 }.with_workers(3),
            Strategy::Pool { workers: 3 }
        );
        assert_eq!(Strategy::Iterative.with_workers(3), Strategy::Iterative);
        assert_eq!(Strategy::Pool { workers: 4 }.to_string(), "pool(4)");
    }

    #[test]
    fn test_validate_seed_accepts_http_and_https() {
        assert!(validate_seed("http://example.com").is_ok());
        assert!(validate_seed("https://sub.example.co.uk/path?q=1").is_ok());
        assert!(validate_seed("http://localhost:8080/").is_ok());
        assert!(validate_seed("http://127.0.0.1:3000").is_ok());
    }

    #[test]
    fn test_validate_seed_rejects_bad_input() {
        assert!(matches!(
            validate_seed("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_seed("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert!(matches!(
            validate_seed("mailto:someone@example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = CrawlConfig::new("http://example.com/").unwrap();
        assert_eq!(config.graph, GraphKind::Map);
        assert_eq!(config.scraper, ScraperKind::Html);
        assert_eq!(config.strategy, Strategy::Recursive);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            config.label(),
            "Graph: map | Scraper: html | Strategy: recursive"
        );
    }

    #[test]
    fn test_config_rejects_empty_pool() {
        let config = CrawlConfig::new("http://example.com/")
            .unwrap()
            .with_strategy(Strategy::Pool { workers: 0 });
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorkers)));
        assert!(matches!(
            config.build_crawler(Arc::new(DomainClassifier::new())),
            Err(CrawlError::Config(ConfigError::InvalidWorkers))
        ));
    }

    #[test]
    fn test_every_covers_all_combinations() {
        let seed = validate_seed("http://example.com").unwrap();
        let configs = CrawlConfig::every(&seed, 4, 5);

        assert_eq!(configs.len(), 2 * 2 * 3);
        let mut labels: Vec<String> = configs.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), configs.len());
        assert!(configs.iter().all(|c| c.timeout_secs == 5));
        assert!(
            configs
                .iter()
                .any(|c| c.strategy == Strategy::Pool { workers: 4 })
        );
    }
}
