pub mod config;
pub mod crawl;
pub mod domain;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod report;

pub use config::{CrawlConfig, GraphKind, ScraperKind, validate_seed};
pub use crawl::{Crawler, ProgressCallback, Strategy};
pub use domain::{Domain, DomainClassifier};
pub use error::{ConfigError, CrawlError};
pub use graph::{LinkGraph, MapGraph, PetGraph};
pub use normalize::normalize;
