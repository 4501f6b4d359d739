use linkweb_scanner::ScanError;
use thiserror::Error;

/// Problems with a crawl configuration, reported before any crawl starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No seed URL given")]
    MissingSeed,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Unknown graph type '{0}'")]
    UnknownGraph(String),

    #[error("Unknown scraper type '{0}'")]
    UnknownScraper(String),

    #[error("Unknown traversal strategy '{0}'")]
    UnknownStrategy(String),

    #[error("Worker pool needs at least one worker")]
    InvalidWorkers,
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanner setup failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Crawl task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Crawl state still shared after all tasks finished")]
    StateInUse,
}

pub type Result<T> = std::result::Result<T, CrawlError>;
