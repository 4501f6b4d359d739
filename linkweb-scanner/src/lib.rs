pub mod error;
pub mod links;
pub mod fetch;

pub use error::ScanError;
pub use fetch::{HtmlScraper, RegexScraper, Scraper, build_client};
